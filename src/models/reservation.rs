use crate::error::AppError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Member of the `reservation_kind` database enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    /// Self-serve lane rental.
    Tunnel,
    /// Coach-led session.
    Lesson,
}

impl ReservationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationKind::Tunnel => "tunnel",
            ReservationKind::Lesson => "lesson",
        }
    }
}

impl fmt::Display for ReservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tunnel" => Ok(ReservationKind::Tunnel),
            "lesson" => Ok(ReservationKind::Lesson),
            other => Err(format!("unknown reservation kind '{}'", other)),
        }
    }
}

/// Member of the `reservation_status` database enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Held,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        ReservationStatus::Held,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Completed,
        ReservationStatus::NoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Held => "held",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReservationStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown reservation status '{}'", s))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub kind: ReservationKind,
    pub tunnel_id: Option<i32>,
    pub coach_id: Option<Uuid>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST body. `status` defaults to `held` when omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct NewReservation {
    pub kind: ReservationKind,
    #[serde(default)]
    pub tunnel_id: Option<i32>,
    #[serde(default)]
    pub coach_id: Option<Uuid>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// PUT body. Absent and `null` both mean "keep the stored value".
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReservationUpdates {
    #[serde(default)]
    pub kind: Option<ReservationKind>,
    #[serde(default)]
    pub tunnel_id: Option<i32>,
    #[serde(default)]
    pub coach_id: Option<Uuid>,
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub status: Option<ReservationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Raw query string of `GET /api/reservations/search`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub tunnel_id: Option<String>,
}

/// Validated half-open window `[from, to)` on `start_time`.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub tunnel_id: Option<i32>,
}

impl SearchWindow {
    pub fn parse(params: &SearchParams) -> Result<Self, AppError> {
        let from = required_instant("from", params.from.as_deref())?;
        let to = required_instant("to", params.to.as_deref())?;
        if from > to {
            return Err(AppError::BadRequest(format!(
                "'from' ({}) must not be after 'to' ({})",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        let tunnel_id = match params.tunnel_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                AppError::BadRequest(format!("tunnel_id must be an integer, got '{}'", raw))
            })?),
        };
        Ok(SearchWindow { from, to, tunnel_id })
    }
}

fn required_instant(name: &str, raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("query parameter '{}' is required", name)))?;
    parse_instant(raw).ok_or_else(|| {
        AppError::BadRequest(format!("'{}' is not an RFC-3339 timestamp: '{}'", name, raw))
    })
}

/// RFC-3339, plus the seconds-less form (`2025-08-09T11:00Z`) PostgreSQL also accepts.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Some(naive) = raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        return NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M")
            .ok()
            .map(|t| t.and_utc());
    }
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z")
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
