//! Derived analytics views

use serde::Serialize;

use super::YearMonth;

/// Revenue for one service type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRevenue {
    pub name: String,
    pub total_value: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarTypePerformance {
    pub name: String,
    pub count: u64,
    pub revenue: f64,
}

/// One day of the selected month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    /// Day of month, 1-based
    pub day: u32,
    pub bookings: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopRoute {
    pub route: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlySummary {
    pub total_bookings: u64,
    pub total_revenue: f64,
    pub completed_trips: u64,
    pub average_fare: f64,
}

/// All analytics views for one (collection, month) input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub month: YearMonth,
    pub service_revenue: Vec<ServiceRevenue>,
    pub status_counts: Vec<StatusCount>,
    pub car_types: Vec<CarTypePerformance>,
    pub daily: Vec<DailyPoint>,
    pub top_routes: Vec<TopRoute>,
    pub monthly: MonthlySummary,
}

impl AnalyticsReport {
    /// True when the report was built from an empty collection.
    /// Every booking lands in exactly one status bucket.
    pub fn is_empty(&self) -> bool {
        self.status_counts.is_empty()
    }

    /// Highest single-day booking count (for chart scaling)
    pub fn daily_max_bookings(&self) -> u64 {
        self.daily.iter().map(|d| d.bookings).max().unwrap_or(0)
    }

    pub fn daily_max_revenue(&self) -> f64 {
        self.daily.iter().map(|d| d.revenue).fold(0.0, f64::max)
    }
}
