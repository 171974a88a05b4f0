//! Booking list filtering (search box + dropdown filters)

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::types::{Booking, CabdashError, CarType, Contact, PaymentStatus, RideStatus, ServiceType};

/// Journey/creation date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Journey date is the reference day
    Today,
    /// Journey date is the day after the reference day
    Tomorrow,
    /// Journey date falls in the Sunday..Saturday week of the reference day
    ThisWeek,
    /// Booking was created on the reference day
    CreatedToday,
}

impl DateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::ThisWeek => "this_week",
            Self::CreatedToday => "created_today",
        }
    }

    fn matches(self, booking: &Booking, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Today => booking.journey_date == today,
            Self::Tomorrow => booking.journey_date == today + Duration::days(1),
            Self::ThisWeek => {
                let week_start =
                    today - Duration::days(today.weekday().num_days_from_sunday() as i64);
                let week_end = week_start + Duration::days(6);
                booking.journey_date >= week_start && booking.journey_date <= week_end
            }
            Self::CreatedToday => booking.created_date() == today,
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFilter {
    type Err = CabdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "this_week" | "this-week" | "week" => Ok(Self::ThisWeek),
            "created_today" | "created-today" => Ok(Self::CreatedToday),
            other => Err(CabdashError::Parse(format!(
                "unknown date filter '{}' (expected one of: all, today, tomorrow, this_week, created_today)",
                other
            ))),
        }
    }
}

/// Filter criteria for the booking list. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub search: Option<String>,
    pub status: Option<RideStatus>,
    pub service_type: Option<ServiceType>,
    pub car_type: Option<CarType>,
    pub payment_status: Option<PaymentStatus>,
    pub date: DateFilter,
}

impl BookingFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(str::is_empty)
            && self.status.is_none()
            && self.service_type.is_none()
            && self.car_type.is_none()
            && self.payment_status.is_none()
            && self.date == DateFilter::All
    }

    /// Check a single booking against every criterion
    pub fn matches(&self, booking: &Booking, today: NaiveDate) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            if !search_matches(booking, term) {
                return false;
            }
        }
        if self.status.is_some_and(|s| booking.ride_status != s) {
            return false;
        }
        if self.service_type.is_some_and(|s| booking.service_type != s) {
            return false;
        }
        if self.car_type.is_some_and(|c| booking.car_type != c) {
            return false;
        }
        if self
            .payment_status
            .is_some_and(|p| booking.payment_status != Some(p))
        {
            return false;
        }
        self.date.matches(booking, today)
    }

    /// Bookings matching the filter, in input order.
    /// `today` anchors the relative date windows.
    pub fn apply<'a>(&self, bookings: &'a [Booking], today: NaiveDate) -> Vec<&'a Booking> {
        bookings.iter().filter(|b| self.matches(b, today)).collect()
    }
}

/// Case-insensitive match on text fields; phone numbers match verbatim
fn search_matches(booking: &Booking, term: &str) -> bool {
    let needle = term.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(&booking.booking_id)
        || contains(&booking.user_name)
        || booking.mobile_number.contains(term)
        || contains(&booking.user_email)
        || contains(&booking.pick_up_location)
        || booking.drop_location.as_deref().is_some_and(contains)
}

/// Contacts matching a free-text search, in input order
pub fn search_contacts<'a>(contacts: &'a [Contact], term: &str) -> Vec<&'a Contact> {
    if term.is_empty() {
        return contacts.iter().collect();
    }
    let needle = term.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contacts
        .iter()
        .filter(|c| {
            contains(&c.name)
                || contains(&c.email)
                || c.phone.contains(term)
                || contains(&c.subject)
                || contains(&c.message)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_booking(id: &str, journey: (i32, u32, u32)) -> Booking {
        Booking {
            booking_id: id.into(),
            user_name: "Asha Patil".into(),
            user_email: "asha@example.com".into(),
            mobile_number: "9876543210".into(),
            pick_up_location: "Mumbai".into(),
            drop_location: Some("Pune".into()),
            journey_date: NaiveDate::from_ymd_opt(journey.0, journey.1, journey.2).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            estimated_fare: 1000.0,
            ..Default::default()
        }
    }

    /// Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let bookings = vec![
            make_booking("B", (2024, 3, 1)),
            make_booking("A", (2024, 3, 2)),
        ];
        let filter = BookingFilter::default();

        assert!(filter.is_empty());
        let result = filter.apply(&bookings, today());
        let ids: Vec<&str> = result.iter().map(|b| b.booking_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_text() {
        let bookings = vec![make_booking("ZC-1001", (2024, 3, 1))];
        for term in ["zc-10", "ASHA", "EXAMPLE.COM", "mumbai", "pune"] {
            let filter = BookingFilter {
                search: Some(term.into()),
                ..Default::default()
            };
            assert_eq!(filter.apply(&bookings, today()).len(), 1, "term {}", term);
        }
    }

    #[test]
    fn test_search_phone_and_miss() {
        let bookings = vec![make_booking("ZC-1001", (2024, 3, 1))];
        let phone = BookingFilter {
            search: Some("98765".into()),
            ..Default::default()
        };
        assert_eq!(phone.apply(&bookings, today()).len(), 1);

        let miss = BookingFilter {
            search: Some("nagpur".into()),
            ..Default::default()
        };
        assert!(miss.apply(&bookings, today()).is_empty());
    }

    #[test]
    fn test_enum_filters_combine() {
        let mut a = make_booking("A", (2024, 3, 1));
        a.ride_status = RideStatus::Completed;
        a.car_type = CarType::Sedan;
        a.payment_status = Some(PaymentStatus::Paid);
        let mut b = make_booking("B", (2024, 3, 1));
        b.ride_status = RideStatus::Completed;
        b.car_type = CarType::Suv;
        let mut c = make_booking("C", (2024, 3, 1));
        c.ride_status = RideStatus::Cancelled;
        c.car_type = CarType::Sedan;
        let bookings = vec![a, b, c];

        let completed_sedans = BookingFilter {
            status: Some(RideStatus::Completed),
            car_type: Some(CarType::Sedan),
            ..Default::default()
        };
        let result = completed_sedans.apply(&bookings, today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].booking_id, "A");

        let paid = BookingFilter {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        // Missing payment status never matches a payment filter
        assert_eq!(paid.apply(&bookings, today()).len(), 1);

        let rentals = BookingFilter {
            service_type: Some(ServiceType::Rental),
            ..Default::default()
        };
        assert!(rentals.apply(&bookings, today()).is_empty());
    }

    #[test]
    fn test_date_filter_today_tomorrow() {
        let bookings = vec![
            make_booking("today", (2024, 3, 13)),
            make_booking("tomorrow", (2024, 3, 14)),
            make_booking("later", (2024, 3, 20)),
        ];
        let by = |date| BookingFilter {
            date,
            ..Default::default()
        };

        let today_hits = by(DateFilter::Today).apply(&bookings, today());
        assert_eq!(today_hits.len(), 1);
        assert_eq!(today_hits[0].booking_id, "today");

        let tomorrow_hits = by(DateFilter::Tomorrow).apply(&bookings, today());
        assert_eq!(tomorrow_hits.len(), 1);
        assert_eq!(tomorrow_hits[0].booking_id, "tomorrow");
    }

    #[test]
    fn test_date_filter_this_week_sunday_to_saturday() {
        let bookings = vec![
            make_booking("sat-before", (2024, 3, 9)),
            make_booking("sunday", (2024, 3, 10)),
            make_booking("saturday", (2024, 3, 16)),
            make_booking("sun-after", (2024, 3, 17)),
        ];
        let filter = BookingFilter {
            date: DateFilter::ThisWeek,
            ..Default::default()
        };
        let ids: Vec<&str> = filter
            .apply(&bookings, today())
            .iter()
            .map(|b| b.booking_id.as_str())
            .collect();
        assert_eq!(ids, vec!["sunday", "saturday"]);
    }

    #[test]
    fn test_date_filter_created_today() {
        let mut fresh = make_booking("fresh", (2024, 4, 1));
        fresh.created_at = Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap();
        let bookings = vec![fresh, make_booking("old", (2024, 3, 13))];
        let filter = BookingFilter {
            date: DateFilter::CreatedToday,
            ..Default::default()
        };
        let result = filter.apply(&bookings, today());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].booking_id, "fresh");
    }

    #[test]
    fn test_date_filter_from_str() {
        assert_eq!("this_week".parse::<DateFilter>().unwrap(), DateFilter::ThisWeek);
        assert_eq!("created-today".parse::<DateFilter>().unwrap(), DateFilter::CreatedToday);
        assert!("yesterday".parse::<DateFilter>().is_err());
    }

    #[test]
    fn test_search_contacts() {
        let contacts = vec![
            Contact {
                id: 1,
                name: "Ravi".into(),
                subject: "Airport pickup".into(),
                phone: "9000000000".into(),
                ..Default::default()
            },
            Contact {
                id: 2,
                name: "Meera".into(),
                message: "Need an SUV for Lonavala".into(),
                ..Default::default()
            },
        ];

        assert_eq!(search_contacts(&contacts, "").len(), 2);
        assert_eq!(search_contacts(&contacts, "AIRPORT")[0].id, 1);
        assert_eq!(search_contacts(&contacts, "lonavala")[0].id, 2);
        assert_eq!(search_contacts(&contacts, "90000")[0].id, 1);
        assert!(search_contacts(&contacts, "goa").is_empty());
    }
}
