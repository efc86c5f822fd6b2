//! Week and month grid layout.
//!
//! Week columns position each event as a block whose offset and height are
//! fractions of the visible window. Overlapping events are not split into
//! lanes; `z_index` follows the sorted order so later events draw on top.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::calendar::event::DisplayableEvent;
use crate::calendar::reconcile::EventsByDate;
use crate::calendar::time_range::{minutes_of_day, DayOfWeek, MINUTES_PER_DAY};
use crate::config::CalendarConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleWindow {
    pub start_hour: u32,
    pub hours: u32,
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self {
            start_hour: 8,
            hours: 16,
        }
    }
}

impl From<&CalendarConfig> for VisibleWindow {
    fn from(config: &CalendarConfig) -> Self {
        Self {
            start_hour: config.start_hour,
            hours: config.visible_hours,
        }
    }
}

impl VisibleWindow {
    pub fn start_minutes(&self) -> i64 {
        self.start_hour as i64 * 60
    }

    pub fn total_minutes(&self) -> i64 {
        self.hours as i64 * 60
    }

    /// Row labels, one per visible hour: `"08:00" … "23:00"`.
    pub fn hour_labels(&self) -> Vec<String> {
        (self.start_hour..self.start_hour + self.hours)
            .map(|h| format!("{:02}:00", h))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockGeometry {
    pub offset: f64,
    pub height: f64,
    pub clipped: bool,
    pub visible: bool,
}

/// Position of an event inside the window.
///
/// Parts outside the window are cut off and the block is marked `clipped`.
/// An event entirely outside is not `visible` and has zero height. An end
/// earlier than the start runs to midnight.
pub fn block_geometry(start: NaiveTime, end: NaiveTime, window: VisibleWindow) -> BlockGeometry {
    let total = window.total_minutes() as f64;
    let win_start = window.start_minutes();
    let win_end = win_start + window.total_minutes();

    let start = minutes_of_day(start);
    let mut end = minutes_of_day(end);
    if end < start {
        end = MINUTES_PER_DAY;
    }

    let visible = (end > win_start && start < win_end)
        || (start == end && start >= win_start && start < win_end);
    let clamped_start = start.clamp(win_start, win_end);
    let clamped_end = end.clamp(win_start, win_end);

    BlockGeometry {
        offset: (clamped_start - win_start) as f64 / total,
        height: if visible {
            (clamped_end - clamped_start) as f64 / total
        } else {
            0.0
        },
        clipped: clamped_start != start || clamped_end != end,
        visible,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventBlock {
    #[serde(flatten)]
    pub event: DisplayableEvent,
    pub geometry: BlockGeometry,
    pub z_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekColumn {
    pub date: NaiveDate,
    pub day_name: DayOfWeek,
    pub day_number: u32,
    pub is_today: bool,
    pub blocks: Vec<EventBlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekLayout {
    pub window: VisibleWindow,
    pub hours: Vec<String>,
    pub columns: Vec<WeekColumn>,
}

pub fn week_layout(
    days: &[NaiveDate],
    events: &EventsByDate,
    window: VisibleWindow,
    today: NaiveDate,
) -> WeekLayout {
    let columns = days
        .iter()
        .map(|&date| {
            let blocks = events
                .get(&date)
                .map(|list| {
                    list.iter()
                        .enumerate()
                        .map(|(z_index, event)| EventBlock {
                            geometry: block_geometry(event.start_time, event.end_time, window),
                            event: event.clone(),
                            z_index,
                        })
                        .collect()
                })
                .unwrap_or_default();

            WeekColumn {
                date,
                day_name: DayOfWeek::from_date(date),
                day_number: date.day(),
                is_today: date == today,
                blocks,
            }
        })
        .collect();

    WeekLayout {
        window,
        hours: window.hour_labels(),
        columns,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub day_number: u32,
    pub in_current_month: bool,
    pub is_today: bool,
    pub events: Vec<DisplayableEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthLayout {
    pub year: i32,
    pub month: u32,
    pub headers: Vec<&'static str>,
    pub weeks: Vec<Vec<MonthCell>>,
}

/// Month grid: `days` must cover whole Monday–Sunday weeks.
pub fn month_layout(
    anchor: NaiveDate,
    days: &[NaiveDate],
    events: &EventsByDate,
    today: NaiveDate,
) -> MonthLayout {
    let cells: Vec<MonthCell> = days
        .iter()
        .map(|&date| MonthCell {
            date,
            day_number: date.day(),
            in_current_month: date.month() == anchor.month() && date.year() == anchor.year(),
            is_today: date == today,
            events: events.get(&date).cloned().unwrap_or_default(),
        })
        .collect();

    MonthLayout {
        year: anchor.year(),
        month: anchor.month(),
        headers: DayOfWeek::ALL.iter().map(|d| d.short_label()).collect(),
        weeks: cells.chunks(7).map(|w| w.to_vec()).collect(),
    }
}
