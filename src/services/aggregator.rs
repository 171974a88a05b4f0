//! Aggregator service for computing booking analytics

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::types::{
    AnalyticsReport, Booking, CarType, CarTypePerformance, DailyPoint, MonthlySummary,
    RideStatus, ServiceRevenue, ServiceType, StatusCount, TopRoute, YearMonth,
};

/// Number of routes kept by the route ranking
pub const TOP_ROUTES_LIMIT: usize = 5;

/// Aggregator for computing booking analytics.
///
/// Every function is pure: it reads the booking slice, never mutates it,
/// and rebuilds its view from scratch on each call.
pub struct Aggregator;

impl Aggregator {
    /// Compute every analytics view for the selected month
    pub fn analyze(bookings: &[Booking], month: YearMonth) -> AnalyticsReport {
        AnalyticsReport {
            month,
            service_revenue: Self::service_revenue(bookings),
            status_counts: Self::status_counts(bookings),
            car_types: Self::car_types(bookings),
            daily: Self::daily(bookings, month),
            top_routes: Self::top_routes(bookings, TOP_ROUTES_LIMIT),
            monthly: Self::monthly(bookings, month),
        }
    }

    /// Revenue per service type, in order of first appearance
    pub fn service_revenue(bookings: &[Booking]) -> Vec<ServiceRevenue> {
        let mut order: Vec<ServiceType> = Vec::new();
        let mut totals: HashMap<ServiceType, (f64, u64)> = HashMap::new();

        for booking in bookings {
            let slot = totals.entry(booking.service_type).or_insert_with(|| {
                order.push(booking.service_type);
                (0.0, 0)
            });
            slot.0 += booking.estimated_fare;
            slot.1 = slot.1.saturating_add(1);
        }

        order
            .into_iter()
            .map(|service| {
                let (total_value, count) = totals[&service];
                ServiceRevenue {
                    name: service.label(),
                    total_value,
                    count,
                }
            })
            .collect()
    }

    /// Booking count per ride status (lifecycle order, empty buckets omitted)
    pub fn status_counts(bookings: &[Booking]) -> Vec<StatusCount> {
        RideStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                name: status.label(),
                value: bookings.iter().filter(|b| b.ride_status == status).count() as u64,
            })
            .filter(|s| s.value > 0)
            .collect()
    }

    /// Count and revenue per car type (fixed order, empty buckets omitted)
    pub fn car_types(bookings: &[Booking]) -> Vec<CarTypePerformance> {
        CarType::ALL
            .iter()
            .map(|&car| {
                let (count, revenue) = bookings
                    .iter()
                    .filter(|b| b.car_type == car)
                    .fold((0u64, 0.0), |(count, revenue), b| {
                        (count.saturating_add(1), revenue + b.estimated_fare)
                    });
                CarTypePerformance {
                    name: car.label(),
                    count,
                    revenue,
                }
            })
            .filter(|c| c.count > 0)
            .collect()
    }

    /// One point per calendar day of `month`, zero-filled
    pub fn daily(bookings: &[Booking], month: YearMonth) -> Vec<DailyPoint> {
        let mut by_date: HashMap<NaiveDate, (u64, f64)> = HashMap::new();
        for booking in bookings {
            let date = booking.created_date();
            if month.contains(date) {
                let slot = by_date.entry(date).or_default();
                slot.0 = slot.0.saturating_add(1);
                slot.1 += booking.estimated_fare;
            }
        }

        month
            .days()
            .enumerate()
            .map(|(i, date)| {
                let (bookings, revenue) = by_date.get(&date).copied().unwrap_or_default();
                DailyPoint {
                    day: i as u32 + 1,
                    bookings,
                    revenue,
                }
            })
            .collect()
    }

    /// Most frequent pickup → drop routes, highest count first.
    /// Ties keep first-seen order.
    pub fn top_routes(bookings: &[Booking], limit: usize) -> Vec<TopRoute> {
        let mut routes: Vec<TopRoute> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for label in bookings.iter().filter_map(Booking::route_label) {
            match index.get(&label) {
                Some(&i) => routes[i].count = routes[i].count.saturating_add(1),
                None => {
                    index.insert(label.clone(), routes.len());
                    routes.push(TopRoute {
                        route: label,
                        count: 1,
                    });
                }
            }
        }

        // sort_by is stable
        routes.sort_by(|a, b| b.count.cmp(&a.count));
        routes.truncate(limit);
        routes
    }

    /// Totals for bookings created within `month`
    pub fn monthly(bookings: &[Booking], month: YearMonth) -> MonthlySummary {
        let mut summary = MonthlySummary::default();

        for booking in bookings.iter().filter(|b| month.contains(b.created_date())) {
            summary.total_bookings = summary.total_bookings.saturating_add(1);
            summary.total_revenue += booking.estimated_fare;
            if booking.ride_status == RideStatus::Completed {
                summary.completed_trips = summary.completed_trips.saturating_add(1);
            }
        }

        if summary.total_bookings > 0 {
            summary.average_fare = summary.total_revenue / summary.total_bookings as f64;
        }
        summary
    }
}

/// Memoized analytics, keyed by collection identity and month.
///
/// Holding the `Arc` keeps the pointer comparison sound: the collection
/// cannot be freed and its address reused while it is cached.
#[derive(Debug, Default)]
pub struct AnalyticsCache {
    entry: Option<CacheEntry>,
    computations: u64,
}

#[derive(Debug)]
struct CacheEntry {
    bookings: Arc<[Booking]>,
    month: YearMonth,
    report: AnalyticsReport,
}

impl AnalyticsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report, recomputing only if the collection or month changed
    pub fn get(&mut self, bookings: &Arc<[Booking]>, month: YearMonth) -> &AnalyticsReport {
        let stale = match &self.entry {
            Some(entry) => !Arc::ptr_eq(&entry.bookings, bookings) || entry.month != month,
            None => true,
        };

        if stale {
            self.entry = None;
        }

        let computations = &mut self.computations;
        let entry = self.entry.get_or_insert_with(|| {
            *computations += 1;
            tracing::debug!(month = %month, bookings = bookings.len(), "recomputing analytics");
            CacheEntry {
                bookings: Arc::clone(bookings),
                month,
                report: Aggregator::analyze(bookings, month),
            }
        });
        &entry.report
    }

    /// Most recently computed report, without checking freshness
    pub fn current(&self) -> Option<&AnalyticsReport> {
        self.entry.as_ref().map(|entry| &entry.report)
    }

    /// Number of times a report has been computed
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
