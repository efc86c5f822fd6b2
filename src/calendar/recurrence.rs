//! Expansion of weekly schedules into dated class occurrences.

use chrono::NaiveDate;

use crate::calendar::event::{sport_emoji, DisplayableEvent, EventOrigin, EventReport};
use crate::calendar::reports::ReportLookup;
use crate::calendar::time_range::DayOfWeek;
use crate::db::models::{RecurringSchedule, ShiftStatus};
use crate::i18n;

pub const OCCURRENCE_PREFIX: &str = "sched-";

pub fn occurrence_id(schedule_id: &str, date: NaiveDate) -> String {
    format!("{}{}-{}", OCCURRENCE_PREFIX, schedule_id, date.format("%Y-%m-%d"))
}

/// One occurrence per `(date, schedule)` pair whose weekday matches, in date order.
pub fn materialize(
    schedules: &[RecurringSchedule],
    days: &[NaiveDate],
    reports: &ReportLookup,
) -> Vec<DisplayableEvent> {
    days.iter()
        .flat_map(|&date| {
            let weekday = DayOfWeek::from_date(date);
            schedules
                .iter()
                .filter(move |s| s.day_of_week == weekday)
                .map(move |s| occurrence(s, date, reports))
        })
        .collect()
}

fn occurrence(schedule: &RecurringSchedule, date: NaiveDate, reports: &ReportLookup) -> DisplayableEvent {
    let title_label = i18n::t_with("labels.class_of", &[("sport", schedule.sport.as_str())]);
    let staff_label = schedule
        .professor_name
        .clone()
        .unwrap_or_else(|| i18n::t("labels.no_professor"));
    let location_label = schedule
        .court_name
        .clone()
        .unwrap_or_else(|| schedule.sport.clone());

    DisplayableEvent {
        id: occurrence_id(&schedule.id, date),
        date,
        start_time: schedule.start_time,
        end_time: schedule.end_time,
        location_label,
        staff_label,
        emoji: sport_emoji(&schedule.sport),
        title_label,
        status: ShiftStatus::Scheduled,
        origin: EventOrigin::Recurring {
            schedule_id: schedule.id.clone(),
        },
        report: reports.get(&schedule.id, date).map(EventReport::from),
    }
}
