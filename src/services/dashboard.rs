//! Landing-page counters

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{Booking, RideStatus, YearMonth};

/// Number of rows in the "recent bookings" list
pub const RECENT_BOOKINGS: usize = 5;

/// Headline counters for the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardStats {
    pub total_bookings: u64,
    /// Trips whose journey date is today
    pub today_bookings: u64,
    /// Fare total of bookings created this calendar month
    pub this_month_revenue: f64,
    pub pending_bookings: u64,
    pub completed_bookings: u64,
    /// Confirmed or in progress
    pub active_rides: u64,
    pub total_contacts: u64,
}

impl DashboardStats {
    pub fn compute(bookings: &[Booking], contact_count: usize, today: NaiveDate) -> Self {
        let this_month = YearMonth::of(today);
        let mut stats = Self {
            total_bookings: bookings.len() as u64,
            total_contacts: contact_count as u64,
            ..Self::default()
        };

        for booking in bookings {
            if booking.journey_date == today {
                stats.today_bookings += 1;
            }
            if this_month.contains(booking.created_date()) {
                stats.this_month_revenue += booking.estimated_fare;
            }
            match booking.ride_status {
                RideStatus::Pending => stats.pending_bookings += 1,
                RideStatus::Completed => stats.completed_bookings += 1,
                RideStatus::Confirmed | RideStatus::InProgress => stats.active_rides += 1,
                RideStatus::Cancelled => {}
            }
        }

        stats
    }
}

/// The `limit` most recently created bookings, newest first
pub fn recent_bookings(bookings: &[Booking], limit: usize) -> Vec<&Booking> {
    let mut sorted: Vec<&Booking> = bookings.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}
