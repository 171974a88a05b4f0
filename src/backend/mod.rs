//! Backend trait and implementations for the booking REST API

mod http;
mod snapshot;

pub use http::ApiClient;
pub use snapshot::SnapshotBackend;

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{CabdashError, Result};

/// Booking listing endpoint
pub const BOOKINGS_PATH: &str = "/api/booking";

/// Contact-form submissions endpoint
pub const CONTACTS_PATH: &str = "/api/contact";

pub const HEALTH_PATH: &str = "/health";

/// Single booking path, with the id percent-encoded as one path segment
pub fn booking_path(booking_id: &str) -> Result<String> {
    let mut url = Url::parse(&format!("http://localhost{}", BOOKINGS_PATH))
        .map_err(|e| CabdashError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| CabdashError::Parse("booking path cannot take segments".into()))?
        .push(booking_id);
    Ok(url.path().to_string())
}

/// `GET /health` response (minimal fields)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

/// Source of backend JSON documents
pub trait Backend: Send + Sync {
    /// Short human-readable description (URL or file path)
    fn describe(&self) -> String;

    /// GET `path` and return the decoded JSON body
    fn get_json(&self, path: &str) -> Result<Value>;

    /// PUT `body` to `path` and return the decoded JSON response
    fn put_json(&self, path: &str, body: &Value) -> Result<Value>;

    /// GET `path` and unwrap its `{success, data}` envelope
    fn get_data(&self, path: &str) -> Result<Value> {
        let body = self.get_json(path)?;
        unwrap_envelope(body)
    }

    /// PUT `body` to `path` and unwrap the `{success, data}` envelope
    fn put_data(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self.put_json(path, body)?;
        unwrap_envelope(response)
    }
}

/// Response envelope used by every listing endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract `data` from `{success, data}`.
/// A bare JSON array is accepted as-is (saved snapshots).
pub fn unwrap_envelope(body: Value) -> Result<Value> {
    if body.is_array() {
        return Ok(body);
    }

    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| CabdashError::Parse(format!("Unexpected response shape: {}", e)))?;

    if !envelope.success {
        return Err(CabdashError::Api(
            envelope
                .message
                .unwrap_or_else(|| "request was not successful".into()),
        ));
    }

    match envelope.data {
        Some(Value::Null) | None => Err(CabdashError::Api("response carried no data".into())),
        Some(data) => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_success() {
        let data = unwrap_envelope(json!({"success": true, "data": [1, 2]})).unwrap();
        assert_eq!(data, json!([1, 2]));
    }

    #[test]
    fn test_unwrap_envelope_bare_array() {
        let data = unwrap_envelope(json!([{"id": 1}])).unwrap();
        assert_eq!(data, json!([{"id": 1}]));
    }

    #[test]
    fn test_unwrap_envelope_unsuccessful() {
        let err = unwrap_envelope(json!({"success": false, "message": "db down"})).unwrap_err();
        assert!(matches!(err, CabdashError::Api(ref m) if m == "db down"));
    }

    #[test]
    fn test_unwrap_envelope_missing_data() {
        assert!(matches!(
            unwrap_envelope(json!({"success": true})),
            Err(CabdashError::Api(_))
        ));
        assert!(matches!(
            unwrap_envelope(json!({"success": true, "data": null})),
            Err(CabdashError::Api(_))
        ));
    }

    #[test]
    fn test_unwrap_envelope_garbage() {
        assert!(matches!(
            unwrap_envelope(json!("hello")),
            Err(CabdashError::Parse(_))
        ));
    }

    #[test]
    fn test_booking_path() {
        assert_eq!(booking_path("ZC-1").unwrap(), "/api/booking/ZC-1");
    }

    #[test]
    fn test_booking_path_encodes_id_as_one_segment() {
        assert_eq!(booking_path("A/B").unwrap(), "/api/booking/A%2FB");
        assert_eq!(booking_path("ZC 7?x").unwrap(), "/api/booking/ZC%207%3Fx");
    }

    #[test]
    fn test_health_status_decode() {
        let health: HealthStatus = serde_json::from_value(json!({"status": "OK", "uptime": 12})).unwrap();
        assert_eq!(health.status, "OK");
    }
}
