use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::calendar::time_range::{minutes_of_day, week_range, DateRange, MINUTES_PER_DAY};
use crate::db::models::{ProfessorWithSchedules, RecurringSchedule};
use crate::i18n;

/// Length of one class in minutes. Legacy rows with an end before the start
/// wrap past midnight.
pub fn schedule_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let diff = minutes_of_day(end) - minutes_of_day(start);
    if diff < 0 {
        diff + MINUTES_PER_DAY
    } else {
        diff
    }
}

pub fn weekly_hours(schedules: &[RecurringSchedule]) -> f64 {
    let minutes: i64 = schedules
        .iter()
        .map(|s| schedule_minutes(s.start_time, s.end_time))
        .sum();
    minutes as f64 / 60.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl WorkloadLevel {
    pub fn classify(hours: f64) -> Self {
        if hours < 6.0 {
            WorkloadLevel::Low
        } else if hours < 12.0 {
            WorkloadLevel::Medium
        } else if hours < 20.0 {
            WorkloadLevel::High
        } else {
            WorkloadLevel::VeryHigh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadLevel::Low => "low",
            WorkloadLevel::Medium => "medium",
            WorkloadLevel::High => "high",
            WorkloadLevel::VeryHigh => "very_high",
        }
    }

    pub fn label(self) -> String {
        i18n::t(&format!("workload.{}", self.as_str()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfessorWorkload {
    pub professor_id: String,
    pub full_name: String,
    pub classes: usize,
    pub hours: f64,
    pub level: WorkloadLevel,
    pub level_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadChart {
    pub week: DateRange,
    pub week_label: String,
    pub max_hours: f64,
    pub professors: Vec<ProfessorWorkload>,
}

/// Professors with at least one schedule, heaviest first.
pub fn professor_workloads(roster: &[ProfessorWithSchedules]) -> Vec<ProfessorWorkload> {
    let mut rows: Vec<ProfessorWorkload> = roster
        .iter()
        .filter(|p| !p.schedules.is_empty())
        .map(|p| {
            let hours = weekly_hours(&p.schedules);
            let level = WorkloadLevel::classify(hours);
            ProfessorWorkload {
                professor_id: p.professor.id.clone(),
                full_name: p.professor.full_name.clone(),
                classes: p.schedules.len(),
                hours,
                level,
                level_label: level.label(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    rows
}

pub fn workload_chart(roster: &[ProfessorWithSchedules], anchor: NaiveDate) -> WorkloadChart {
    let week = week_range(anchor);
    let professors = professor_workloads(roster);
    let max_hours = professors.iter().map(|p| p.hours).fold(0.0, f64::max);

    WorkloadChart {
        week_label: week.short_label(),
        week,
        max_hours,
        professors,
    }
}
