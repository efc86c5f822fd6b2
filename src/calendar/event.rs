use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::calendar::time_range::hhmm;
use crate::db::models::{ClassReview, ShiftStatus};

/// Where a displayable event came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventOrigin {
    Real { shift_id: String },
    Recurring { schedule_id: String },
}

/// Attendance data attached to a recurring occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub id: String,
    pub attendance: Option<i64>,
    pub notes: Option<String>,
}

impl From<&ClassReview> for EventReport {
    fn from(review: &ClassReview) -> Self {
        EventReport {
            id: review.id.clone(),
            attendance: review.attendance,
            notes: review.notes.clone(),
        }
    }
}

/// A calendar entry, either a real shift or a materialised class occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayableEvent {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub location_label: String,
    pub staff_label: String,
    pub title_label: String,
    pub status: ShiftStatus,
    pub origin: EventOrigin,
    pub report: Option<EventReport>,
    pub emoji: &'static str,
}

impl DisplayableEvent {
    pub fn is_recurring(&self) -> bool {
        matches!(self.origin, EventOrigin::Recurring { .. })
    }
}

const DEFAULT_EMOJI: &str = "🏅";

/// Emoji for a sport name, matched on keywords in Spanish and English.
pub fn sport_emoji(label: &str) -> &'static str {
    let label = label.to_lowercase();
    let table: [(&[&str], &'static str); 9] = [
        (&["fútbol", "futbol", "football", "soccer"], "⚽"),
        (&["básquet", "basquet", "básquetbol", "basketball"], "🏀"),
        (&["tenis", "tennis", "pádel", "padel"], "🎾"),
        (&["vóley", "voley", "voleibol", "volleyball"], "🏐"),
        (&["hockey"], "🏑"),
        (&["rugby"], "🏉"),
        (&["natación", "natacion", "swimming", "pileta"], "🏊"),
        (&["boxeo", "boxing"], "🥊"),
        (&["gimnasio", "funcional", "pesas", "gym"], "🏋️"),
    ];

    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| label.contains(k)))
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_EMOJI)
}
