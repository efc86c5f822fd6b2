use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::time_range::{
    add_days, add_months, month_grid_range, month_label, month_range, week_range, DateRange,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" | "semana" => Some(ViewMode::Week),
            "month" | "mes" => Some(ViewMode::Month),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }
}

/// Anchor date plus view mode; everything else is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub anchor: NaiveDate,
    pub mode: ViewMode,
}

impl CalendarView {
    pub fn new(anchor: NaiveDate, mode: ViewMode) -> Self {
        Self { anchor, mode }
    }

    /// Dates rendered by the grid.
    pub fn range(&self) -> DateRange {
        match self.mode {
            ViewMode::Week => week_range(self.anchor),
            ViewMode::Month => month_grid_range(self.anchor),
        }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.range().days()
    }

    /// The week, or the calendar month without the padding days.
    pub fn period(&self) -> DateRange {
        match self.mode {
            ViewMode::Week => week_range(self.anchor),
            ViewMode::Month => month_range(self.anchor),
        }
    }

    /// Move by whole periods; negative steps go back.
    pub fn navigate(self, steps: i32) -> Self {
        let anchor = match self.mode {
            ViewMode::Week => add_days(self.anchor, 7 * steps as i64),
            ViewMode::Month => add_months(self.anchor, steps),
        };
        Self { anchor, ..self }
    }

    pub fn with_mode(self, mode: ViewMode) -> Self {
        Self { mode, ..self }
    }

    pub fn label(&self) -> String {
        match self.mode {
            ViewMode::Week => week_range(self.anchor).short_label(),
            ViewMode::Month => month_label(self.anchor),
        }
    }

    /// Identifies what is being shown; two views with the same key render the same grid.
    pub fn key(&self) -> String {
        format!("{}:{}", self.mode.as_str(), self.period().start.format("%Y-%m-%d"))
    }

    pub fn is_current_period(&self, today: NaiveDate) -> bool {
        match self.mode {
            ViewMode::Week => self.period().contains(today),
            ViewMode::Month => {
                self.anchor.year() == today.year() && self.anchor.month() == today.month()
            }
        }
    }
}
