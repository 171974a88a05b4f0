//! Saved JSON snapshot standing in for the booking endpoints

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use super::{booking_path, unwrap_envelope, Backend, BOOKINGS_PATH, CONTACTS_PATH};
use crate::types::{CabdashError, Result};

/// Serves `GET /api/booking` (and single-booking lookups) from a file
/// holding either the listing envelope or a bare array.
/// Snapshots carry no contact messages; that listing is always empty.
/// Snapshots are read-only: every PUT fails with `Api`.
pub struct SnapshotBackend {
    path: PathBuf,
}

impl SnapshotBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<Value> {
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            CabdashError::Parse(format!("Invalid snapshot {}: {}", self.path.display(), e))
        })
    }
}

impl Backend for SnapshotBackend {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        if path == BOOKINGS_PATH {
            return self.read();
        }
        if path == CONTACTS_PATH {
            return Ok(Value::Array(Vec::new()));
        }

        if let Some(encoded_id) = path
            .strip_prefix(BOOKINGS_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            let records = unwrap_envelope(self.read()?)?;
            let found = records
                .as_array()
                .and_then(|items| {
                    items.iter().find(|item| {
                        item.get("booking_id")
                            .and_then(Value::as_str)
                            .and_then(|id| booking_path(id).ok())
                            .as_deref()
                            == Some(path)
                    })
                })
                .cloned()
                .ok_or_else(|| CabdashError::Api(format!("Booking {} not found", encoded_id)))?;
            return Ok(serde_json::json!({ "success": true, "data": found }));
        }

        Err(CabdashError::Api(format!("{} is not available from a snapshot", path)))
    }

    fn put_json(&self, path: &str, _body: &Value) -> Result<Value> {
        Err(CabdashError::Api(format!("{} is not available from a snapshot", path)))
    }
}
