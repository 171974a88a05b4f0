//! Booking and contact records as served by the booking backend

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::CabdashError;

/// Trip category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    #[default]
    Oneway,
    Roundtrip,
    Airport,
    Rental,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Oneway,
        ServiceType::Roundtrip,
        ServiceType::Airport,
        ServiceType::Rental,
    ];

    /// Wire name (e.g. "roundtrip")
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oneway => "oneway",
            Self::Roundtrip => "roundtrip",
            Self::Airport => "airport",
            Self::Rental => "rental",
        }
    }

    pub fn label(self) -> String {
        capitalize(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarType {
    #[default]
    Hatchback,
    Sedan,
    Suv,
    Crysta,
    Scorpio,
}

impl CarType {
    /// Display order used by the car-type breakdown
    pub const ALL: [CarType; 5] = [
        CarType::Hatchback,
        CarType::Sedan,
        CarType::Suv,
        CarType::Crysta,
        CarType::Scorpio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hatchback => "hatchback",
            Self::Sedan => "sedan",
            Self::Suv => "suv",
            Self::Crysta => "crysta",
            Self::Scorpio => "scorpio",
        }
    }

    pub fn label(self) -> String {
        capitalize(self.as_str())
    }
}

/// Ride lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Lifecycle order, also the display order of the status breakdown
    pub const ALL: [RideStatus; 5] = [
        RideStatus::Pending,
        RideStatus::Confirmed,
        RideStatus::InProgress,
        RideStatus::Completed,
        RideStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Humanized label ("in_progress" → "In progress")
    pub fn label(self) -> String {
        capitalize(&self.as_str().replace('_', " "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    pub fn label(self) -> String {
        capitalize(self.as_str())
    }
}

/// Look up an enum value by its wire name
fn parse_wire<T: Copy>(
    all: &[T],
    as_str: fn(T) -> &'static str,
    s: &str,
    kind: &str,
) -> super::Result<T> {
    let wanted = s.trim().to_lowercase();
    all.iter()
        .copied()
        .find(|v| as_str(*v) == wanted)
        .ok_or_else(|| {
            let choices: Vec<&str> = all.iter().map(|v| as_str(*v)).collect();
            CabdashError::Parse(format!(
                "unknown {} '{}' (expected one of: {})",
                kind,
                s,
                choices.join(", ")
            ))
        })
}

impl std::str::FromStr for ServiceType {
    type Err = CabdashError;

    fn from_str(s: &str) -> super::Result<Self> {
        parse_wire(&Self::ALL, Self::as_str, s, "service type")
    }
}

impl std::str::FromStr for CarType {
    type Err = CabdashError;

    fn from_str(s: &str) -> super::Result<Self> {
        parse_wire(&Self::ALL, Self::as_str, s, "car type")
    }
}

impl std::str::FromStr for RideStatus {
    type Err = CabdashError;

    fn from_str(s: &str) -> super::Result<Self> {
        parse_wire(&Self::ALL, Self::as_str, s, "ride status")
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = CabdashError;

    fn from_str(s: &str) -> super::Result<Self> {
        parse_wire(&Self::ALL, Self::as_str, s, "payment status")
    }
}

/// One cab trip order.
///
/// Decoding is strict about the fields aggregation depends on
/// (`created_at`, `journey_date`, `estimated_fare` and the enums) and
/// lenient about everything else: nulls and empty strings become
/// empty/None instead of failing the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Booking {
    pub id: u64,
    pub booking_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub user_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub user_email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub mobile_number: String,
    pub service_type: ServiceType,
    pub car_type: CarType,
    pub ride_status: RideStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub pick_up_location: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub drop_location: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub pick_up_time: Option<String>,
    #[serde(deserialize_with = "calendar_date")]
    pub journey_date: NaiveDate,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub return_date: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub km_limit: Option<f64>,
    #[serde(deserialize_with = "amount")]
    pub estimated_fare: f64,
    #[serde(default, deserialize_with = "optional_amount")]
    pub advance_amount_paid: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub discount_amount: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub refund_amount: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub booking_source: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub driver_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub driver_mobile: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub vehicle_number: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Creation date on the user's local calendar.
    /// Day bucketing must agree with what the operator sees on their clock.
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }

    /// "{pickup} → {dropoff}", or None when the booking has no drop location
    pub fn route_label(&self) -> Option<String> {
        self.drop_location
            .as_deref()
            .filter(|drop| !drop.is_empty())
            .map(|drop| format!("{} → {}", self.pick_up_location, drop))
    }
}

/// Contact-form submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub message: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Partial booking edit sent as the `PUT /api/booking/{id}` body.
/// Only the fields that are set go over the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_status: Option<RideStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance_amount_paid: Option<f64>,
}

impl BookingUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00.000Z`), zone-less date-times
/// (`2024-01-15 10:30:00`, interpreted in local time) and bare dates
/// (UTC midnight).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a calendar date.
///
/// A full RFC 3339 timestamp names an instant, so it lands on the local
/// calendar day. Anything else keeps its leading `yyyy-mm-dd` as written.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn optional_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn calendar_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

/// Money arrives as a JSON number or, from DECIMAL columns, a numeric string
fn amount_from_value<E: de::Error>(value: Value) -> std::result::Result<Option<f64>, E> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => return Err(E::custom(format!("invalid amount: {other}"))),
    };
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(E::custom("amount must be a non-negative number")),
    }
}

fn amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    amount_from_value(value)?.ok_or_else(|| de::Error::custom("missing amount"))
}

fn optional_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    amount_from_value(value)
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        value => T::deserialize(value).map(Some).map_err(de::Error::custom),
    }
}
