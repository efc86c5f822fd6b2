use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::schedule::RecurringSchedule;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Professor {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfessor {
    #[serde(default)]
    pub full_name: String,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfessor {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<String>,
}

/// A professor together with the weekly schedules they teach.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessorWithSchedules {
    #[serde(flatten)]
    pub professor: Professor,
    pub schedules: Vec<RecurringSchedule>,
}
