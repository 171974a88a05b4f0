//! Unified data loading service for CLI and TUI
//!
//! Fetches whole collections from the backend once per activation.
//! Collection loads never fail: transport or envelope problems become a
//! `LoadWarning` plus an empty collection, so every downstream view
//! degrades to its empty state instead of an error.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{
    booking_path, ApiClient, Backend, HealthStatus, SnapshotBackend, BOOKINGS_PATH, CONTACTS_PATH,
    HEALTH_PATH,
};
use crate::config::Config;
use crate::types::{Booking, BookingUpdate, CabdashError, Contact, LoadWarning, Result};

/// Result of loading one collection
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult<T> {
    /// Records in server order
    pub records: Vec<T>,
    /// Set when the fetch failed or some records were dropped
    pub warning: Option<LoadWarning>,
}

impl<T> LoadResult<T> {
    fn failed(warning: LoadWarning) -> Self {
        Self {
            records: Vec::new(),
            warning: Some(warning),
        }
    }
}

/// Unified data loading service
pub struct DataLoaderService {
    backend: Box<dyn Backend>,
}

impl DataLoaderService {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// HTTP backend from config, or a snapshot file when `input` is given
    pub fn from_config(config: &Config, input: Option<PathBuf>) -> Result<Self> {
        let backend: Box<dyn Backend> = match input {
            Some(path) => Box::new(SnapshotBackend::new(path)),
            None => Box::new(ApiClient::new(config)?),
        };
        Ok(Self::new(backend))
    }

    pub fn source(&self) -> String {
        self.backend.describe()
    }

    /// Fetch the complete booking collection
    pub fn load_bookings(&self) -> LoadResult<Booking> {
        self.load_collection(BOOKINGS_PATH)
    }

    /// Fetch every contact-form submission
    pub fn load_contacts(&self) -> LoadResult<Contact> {
        self.load_collection(CONTACTS_PATH)
    }

    /// Fetch one booking by its human-readable id
    pub fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        let data = self.backend.get_data(&booking_path(booking_id)?)?;
        serde_json::from_value(data)
            .map_err(|e| CabdashError::Parse(format!("Booking {}: {}", booking_id, e)))
    }

    /// Apply a partial edit to one booking and return its new state.
    ///
    /// When the response body is not a full booking the record is fetched
    /// again, so callers always see what the server stored.
    pub fn update_booking(&self, booking_id: &str, update: &BookingUpdate) -> Result<Booking> {
        if update.is_empty() {
            return Err(CabdashError::Config(format!(
                "no fields to update for booking {}",
                booking_id
            )));
        }

        let path = booking_path(booking_id)?;
        let body = serde_json::to_value(update).map_err(|e| CabdashError::Parse(e.to_string()))?;
        let data = self.backend.put_data(&path, &body)?;
        tracing::info!(booking_id, source = %self.backend.describe(), "booking updated");

        match serde_json::from_value(data) {
            Ok(booking) => Ok(booking),
            Err(e) => {
                tracing::debug!(booking_id, error = %e, "update response is not a booking, refetching");
                self.get_booking(booking_id)
            }
        }
    }

    /// Backend liveness. The endpoint answers without the usual envelope.
    pub fn health(&self) -> Result<HealthStatus> {
        let body = self.backend.get_json(HEALTH_PATH)?;
        serde_json::from_value(body).map_err(|e| CabdashError::Parse(e.to_string()))
    }

    fn load_collection<T: DeserializeOwned>(&self, path: &str) -> LoadResult<T> {
        let data = match self.backend.get_data(path) {
            Ok(data) => data,
            Err(e) => {
                let warning = match e {
                    CabdashError::Api(msg) | CabdashError::Parse(msg) => {
                        LoadWarning::Unsuccessful(msg)
                    }
                    other => LoadWarning::FetchFailed(other.to_string()),
                };
                tracing::warn!(path, source = %self.backend.describe(), "{}", warning.message());
                return LoadResult::failed(warning);
            }
        };

        let Value::Array(items) = data else {
            let warning = LoadWarning::Unsuccessful("expected a list of records".into());
            tracing::warn!(path, "{}", warning.message());
            return LoadResult::failed(warning);
        };

        let (records, skipped) = decode_records::<T>(items);
        let total = records.len() + skipped;
        tracing::info!(path, loaded = records.len(), skipped, "collection loaded");

        let warning = (skipped > 0).then(|| {
            let warning = LoadWarning::SkippedRecords { skipped, total };
            tracing::warn!(path, "{}", warning.message());
            warning
        });

        LoadResult { records, warning }
    }
}

/// Decode each record on its own; returns (decoded, skipped count)
fn decode_records<T: DeserializeOwned>(items: Vec<Value>) -> (Vec<T>, usize) {
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                tracing::debug!(index, error = %e, "skipping malformed record");
            }
        }
    }

    (records, skipped)
}
