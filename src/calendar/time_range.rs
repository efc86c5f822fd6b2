//! Date arithmetic for the calendar: week and month boundaries, inclusive day
//! enumeration and the canonical day-of-week names stored on recurring
//! schedules.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Day of the week as stored in `professor_schedules.day_of_week`.
///
/// The canonical form is the capitalised Spanish name (`"Miércoles"`).
/// Calendar dates are joined to schedules through this enum, never through a
/// locale-formatted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayOfWeek {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
    Sabado,
    Domingo,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Lunes,
        DayOfWeek::Martes,
        DayOfWeek::Miercoles,
        DayOfWeek::Jueves,
        DayOfWeek::Viernes,
        DayOfWeek::Sabado,
        DayOfWeek::Domingo,
    ];

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Lunes,
            Weekday::Tue => DayOfWeek::Martes,
            Weekday::Wed => DayOfWeek::Miercoles,
            Weekday::Thu => DayOfWeek::Jueves,
            Weekday::Fri => DayOfWeek::Viernes,
            Weekday::Sat => DayOfWeek::Sabado,
            Weekday::Sun => DayOfWeek::Domingo,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_weekday(date.weekday())
    }

    /// Parse a stored or user-supplied day name.
    ///
    /// Case-insensitive and tolerant of missing accents, so legacy rows such as
    /// `"miercoles"` or `"SABADO"` normalise to the same value.
    pub fn from_str(s: &str) -> Option<Self> {
        let folded: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();

        match folded.as_str() {
            "lunes" => Some(DayOfWeek::Lunes),
            "martes" => Some(DayOfWeek::Martes),
            "miercoles" => Some(DayOfWeek::Miercoles),
            "jueves" => Some(DayOfWeek::Jueves),
            "viernes" => Some(DayOfWeek::Viernes),
            "sabado" => Some(DayOfWeek::Sabado),
            "domingo" => Some(DayOfWeek::Domingo),
            _ => None,
        }
    }

    /// Canonical stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Lunes => "Lunes",
            DayOfWeek::Martes => "Martes",
            DayOfWeek::Miercoles => "Miércoles",
            DayOfWeek::Jueves => "Jueves",
            DayOfWeek::Viernes => "Viernes",
            DayOfWeek::Sabado => "Sábado",
            DayOfWeek::Domingo => "Domingo",
        }
    }

    /// Column header used by the month grid.
    pub fn short_label(self) -> &'static str {
        match self {
            DayOfWeek::Lunes => "LUN",
            DayOfWeek::Martes => "MAR",
            DayOfWeek::Miercoles => "MIE",
            DayOfWeek::Jueves => "JUE",
            DayOfWeek::Viernes => "VIE",
            DayOfWeek::Sabado => "SAB",
            DayOfWeek::Domingo => "DOM",
        }
    }
}

impl From<DayOfWeek> for String {
    fn from(day: DayOfWeek) -> Self {
        day.as_str().to_string()
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or_else(|| format!("Invalid day of week: {}", value))
    }
}

impl TryFrom<&str> for DayOfWeek {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value).ok_or_else(|| format!("Invalid day of week: {}", value))
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        days_in_range(self.start, self.end)
    }

    /// `"dd/MM - dd/MM"`, as shown above the week grid.
    pub fn short_label(&self) -> String {
        format!("{} - {}", self.start.format("%d/%m"), self.end.format("%d/%m"))
    }
}

/// `date` moved by `days`, pinned to chrono's representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Monday-based week containing `anchor`.
pub fn week_range(anchor: NaiveDate) -> DateRange {
    let start = add_days(anchor, -(anchor.weekday().num_days_from_monday() as i64));
    DateRange::new(start, add_days(start, 6))
}

/// First and last day of the month containing `anchor`.
pub fn month_range(anchor: NaiveDate) -> DateRange {
    let start = add_days(anchor, -(anchor.day0() as i64));
    let end = start
        .checked_add_months(Months::new(1))
        .map(|next| add_days(next, -1))
        .unwrap_or(NaiveDate::MAX);
    DateRange::new(start, end)
}

/// Range rendered by the month grid: the month widened to whole Monday–Sunday weeks.
pub fn month_grid_range(anchor: NaiveDate) -> DateRange {
    let month = month_range(anchor);
    DateRange::new(week_range(month.start).start, week_range(month.end).end)
}

/// Every date from `start` to `end`, both included. Empty if `end < start`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Move `date` by whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// `"marzo 2024"`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

/// `"Lunes 4"`, used as the heading of a day in the reports list.
pub fn day_heading(date: NaiveDate) -> String {
    format!("{} {}", DayOfWeek::from_date(date).as_str(), date.day())
}

/// Current date for a fixed offset from UTC.
pub fn today_at_offset(offset_hours: i32) -> NaiveDate {
    (Utc::now().naive_utc() + Duration::hours(offset_hours as i64)).date()
}

/// Parse a stored `HH:MM` or `HH:MM:SS` time.
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Minutes since midnight, seconds ignored.
pub fn minutes_of_day(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

/// Serde adapter writing times as `HH:MM` and accepting `HH:MM[:SS]`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_clock(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {}", raw)))
    }
}
