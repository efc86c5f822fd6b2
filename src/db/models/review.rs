use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Attendance report for one occurrence of a recurring schedule.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ClassReview {
    pub id: String,
    pub schedule_id: String,
    pub date: NaiveDate,
    pub attendance: Option<i64>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub schedule_id: Option<String>,
    pub date: Option<String>,
    pub attendance: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpsertClassReview {
    pub schedule_id: String,
    pub date: NaiveDate,
    pub attendance: Option<i64>,
    pub notes: Option<String>,
}

/// Review joined with the schedule it reports on, for the weekly reports list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithSchedule {
    pub id: String,
    pub schedule_id: String,
    pub date: NaiveDate,
    pub attendance: Option<i64>,
    pub notes: Option<String>,
    pub sport: String,
    pub start_time: String,
    pub end_time: String,
    pub professor_name: Option<String>,
    pub court_name: Option<String>,
}
