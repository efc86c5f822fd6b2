use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::calendar::time_range::{hhmm, parse_clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    /// Convert from string (case-insensitive). Accepts the Spanish labels too.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" | "programado" => Some(ShiftStatus::Scheduled),
            "completed" | "completado" => Some(ShiftStatus::Completed),
            "cancelled" | "canceled" | "cancelado" => Some(ShiftStatus::Cancelled),
            _ => None,
        }
    }

    /// Stored status; missing or unrecognised values read as scheduled.
    pub fn from_stored(s: Option<&str>) -> Self {
        s.and_then(Self::from_str).unwrap_or(ShiftStatus::Scheduled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> String {
        crate::i18n::t(&format!("status.{}", self.as_str()))
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::Scheduled
    }
}

/// Raw `shifts` row joined with court and professor names.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftRow {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub court_id: Option<String>,
    pub professor_id: Option<String>,
    pub group_name: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub created_at: NaiveDateTime,
    pub court_name: Option<String>,
    pub professor_name: Option<String>,
}

/// A one-off court reservation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shift {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub court_id: Option<String>,
    pub professor_id: Option<String>,
    pub group_name: Option<String>,
    pub status: ShiftStatus,
    pub price: Option<f64>,
    pub court_name: Option<String>,
    pub professor_name: Option<String>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = String;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let start_time = parse_clock(&row.start_time)
            .ok_or_else(|| format!("Invalid start_time: {}", row.start_time))?;
        let end_time = parse_clock(&row.end_time)
            .ok_or_else(|| format!("Invalid end_time: {}", row.end_time))?;

        Ok(Shift {
            id: row.id,
            date: row.date,
            start_time,
            end_time,
            court_id: row.court_id,
            professor_id: row.professor_id,
            group_name: row.group_name,
            status: ShiftStatus::from_stored(row.status.as_deref()),
            price: row.price,
            court_name: row.court_name,
            professor_name: row.professor_name,
        })
    }
}

/// Shift payload as sent by clients, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftInput {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub court_id: Option<String>,
    pub professor_id: Option<String>,
    pub group_name: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewShift {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub court_id: Option<String>,
    pub professor_id: Option<String>,
    pub group_name: Option<String>,
    pub status: ShiftStatus,
    pub price: Option<f64>,
}
