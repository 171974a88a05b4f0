//! Services for loading, filtering and aggregating bookings

pub mod aggregator;
pub mod dashboard;
pub mod data_loader;
pub mod filter;

pub use aggregator::{AnalyticsCache, Aggregator};
pub use dashboard::{recent_bookings, DashboardStats};
pub use data_loader::{DataLoaderService, LoadResult};
pub use filter::{search_contacts, BookingFilter, DateFilter};
