use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::calendar::time_range::{hhmm, parse_clock, DayOfWeek};

/// Raw `professor_schedules` row joined with professor and court names.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub professor_id: String,
    pub court_id: Option<String>,
    pub day_of_week: String,
    pub sport: String,
    pub start_time: String,
    pub end_time: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub professor_name: Option<String>,
    pub court_name: Option<String>,
}

/// A weekly recurring class. Occurrences are derived from it, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringSchedule {
    pub id: String,
    pub professor_id: String,
    pub court_id: Option<String>,
    pub day_of_week: DayOfWeek,
    pub sport: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub description: Option<String>,
    pub professor_name: Option<String>,
    pub court_name: Option<String>,
}

impl TryFrom<ScheduleRow> for RecurringSchedule {
    type Error = String;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let day_of_week = DayOfWeek::try_from(row.day_of_week.as_str())?;
        let start_time = parse_clock(&row.start_time)
            .ok_or_else(|| format!("Invalid start_time: {}", row.start_time))?;
        let end_time = parse_clock(&row.end_time)
            .ok_or_else(|| format!("Invalid end_time: {}", row.end_time))?;

        Ok(RecurringSchedule {
            id: row.id,
            professor_id: row.professor_id,
            court_id: row.court_id,
            day_of_week,
            sport: row.sport,
            start_time,
            end_time,
            description: row.description,
            professor_name: row.professor_name,
            court_name: row.court_name,
        })
    }
}

/// Schedule payload as sent by clients, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleInput {
    pub professor_id: Option<String>,
    pub day_of_week: Option<String>,
    pub sport: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub description: Option<String>,
    pub court_id: Option<String>,
}

/// Validated schedule ready to be written.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub professor_id: String,
    pub day_of_week: DayOfWeek,
    pub sport: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub description: Option<String>,
    pub court_id: Option<String>,
}
