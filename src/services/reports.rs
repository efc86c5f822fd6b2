use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::time_range::{day_heading, parse_clock, DateRange};
use crate::db::models::ReviewWithSchedule;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub id: String,
    pub schedule_id: String,
    pub sport: String,
    pub start_time: String,
    pub end_time: String,
    pub professor_name: Option<String>,
    pub court_name: Option<String>,
    pub attendance: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDay {
    pub date: NaiveDate,
    /// `"Lunes 4"`
    pub heading: String,
    pub reports: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReports {
    pub week: DateRange,
    pub week_label: String,
    pub total_attendance: i64,
    pub days: Vec<ReportDay>,
}

fn short_clock(raw: &str) -> String {
    parse_clock(raw)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Group joined report rows by date, ascending. Days without reports are omitted.
pub fn group_by_day(week: DateRange, rows: Vec<ReviewWithSchedule>) -> WeeklyReports {
    let mut by_date: BTreeMap<NaiveDate, Vec<ReportEntry>> = BTreeMap::new();
    let mut total_attendance = 0;

    for row in rows {
        total_attendance += row.attendance.unwrap_or(0);
        by_date.entry(row.date).or_default().push(ReportEntry {
            id: row.id,
            schedule_id: row.schedule_id,
            sport: row.sport,
            start_time: short_clock(&row.start_time),
            end_time: short_clock(&row.end_time),
            professor_name: row.professor_name,
            court_name: row.court_name,
            attendance: row.attendance,
            notes: row.notes,
        });
    }

    let days = by_date
        .into_iter()
        .map(|(date, mut reports)| {
            reports.sort_by(|a, b| a.start_time.cmp(&b.start_time));
            ReportDay {
                date,
                heading: day_heading(date),
                reports,
            }
        })
        .collect();

    WeeklyReports {
        week_label: week.short_label(),
        week,
        total_attendance,
        days,
    }
}
