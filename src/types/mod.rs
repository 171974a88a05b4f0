//! Type definitions for cabdash

mod analytics;
mod booking;
mod error;
mod month;

pub use analytics::*;
pub use booking::*;
pub use error::*;
pub use month::YearMonth;

/// Booking load warning types
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    /// Backend unreachable or answered with a transport/HTTP error
    FetchFailed(String),
    /// Response envelope said `success: false` or carried no data
    Unsuccessful(String),
    /// Some records failed to decode and were dropped
    SkippedRecords { skipped: usize, total: usize },
}

impl LoadWarning {
    pub fn message(&self) -> String {
        match self {
            Self::FetchFailed(msg) => format!("Fetch failed: {}", msg),
            Self::Unsuccessful(msg) => format!("Backend returned no data: {}", msg),
            Self::SkippedRecords { skipped, total } => {
                format!("Skipped {} of {} malformed records", skipped, total)
            }
        }
    }
}
