use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::event::{sport_emoji, DisplayableEvent, EventOrigin};
use crate::calendar::recurrence::materialize;
use crate::calendar::reports::ReportLookup;
use crate::db::models::{ClassReview, RecurringSchedule, Shift};
use crate::i18n;

pub type EventsByDate = BTreeMap<NaiveDate, Vec<DisplayableEvent>>;

pub fn shift_event(shift: &Shift) -> DisplayableEvent {
    let location_label = shift
        .court_name
        .clone()
        .unwrap_or_else(|| i18n::t("labels.no_court"));
    let staff_label = shift
        .professor_name
        .clone()
        .unwrap_or_else(|| i18n::t("labels.no_professor"));
    let title_label = shift
        .group_name
        .clone()
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(|| location_label.clone());

    DisplayableEvent {
        id: shift.id.clone(),
        date: shift.date,
        start_time: shift.start_time,
        end_time: shift.end_time,
        emoji: sport_emoji(&title_label),
        location_label,
        staff_label,
        title_label,
        status: shift.status,
        origin: EventOrigin::Real {
            shift_id: shift.id.clone(),
        },
        report: None,
    }
}

/// Merge shifts and occurrences into one start-time-ordered list per day.
///
/// Every day in `days` gets an entry. Shifts go in before occurrences and the
/// sort is stable, so a shift and a class starting at the same time keep that
/// order. Items dated outside `days` are dropped; nothing is deduplicated.
pub fn reconcile(
    days: &[NaiveDate],
    shifts: &[Shift],
    occurrences: &[DisplayableEvent],
) -> EventsByDate {
    let mut by_date: EventsByDate = days.iter().map(|d| (*d, Vec::new())).collect();

    for shift in shifts {
        if let Some(bucket) = by_date.get_mut(&shift.date) {
            bucket.push(shift_event(shift));
        }
    }

    for occurrence in occurrences {
        if let Some(bucket) = by_date.get_mut(&occurrence.date) {
            bucket.push(occurrence.clone());
        }
    }

    for events in by_date.values_mut() {
        events.sort_by_key(|e| e.start_time);
    }

    by_date
}

/// Full pipeline from fetched snapshots to the per-day event map.
pub fn build_events(
    days: &[NaiveDate],
    shifts: &[Shift],
    schedules: &[RecurringSchedule],
    reviews: Vec<ClassReview>,
) -> EventsByDate {
    let lookup = ReportLookup::from_reviews(reviews);
    let occurrences = materialize(schedules, days, &lookup);
    reconcile(days, shifts, &occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::time_range::{week_range, DayOfWeek};
    use crate::db::models::ShiftStatus;
    use chrono::{NaiveTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn shift(id: &str, on: NaiveDate, start: NaiveTime, end: NaiveTime) -> Shift {
        Shift {
            id: id.to_string(),
            date: on,
            start_time: start,
            end_time: end,
            court_id: None,
            professor_id: None,
            group_name: None,
            status: ShiftStatus::Scheduled,
            price: None,
            court_name: None,
            professor_name: None,
        }
    }

    fn ana_voley() -> RecurringSchedule {
        RecurringSchedule {
            id: "s1".to_string(),
            professor_id: "p1".to_string(),
            court_id: None,
            day_of_week: DayOfWeek::Lunes,
            sport: "Voley".to_string(),
            start_time: hm(18, 0),
            end_time: hm(19, 0),
            description: None,
            professor_name: Some("Ana".to_string()),
            court_name: None,
        }
    }

    #[test]
    fn every_day_has_an_entry() {
        let days = week_range(date(2024, 3, 4)).days();
        let events = reconcile(&days, &[], &[]);
        assert_eq!(events.len(), 7);
        assert!(events.values().all(|v| v.is_empty()));
    }

    #[test]
    fn lists_are_sorted_by_start_time() {
        let days = week_range(date(2024, 3, 4)).days();
        let shifts = vec![
            shift("late", date(2024, 3, 4), hm(20, 0), hm(21, 0)),
            shift("early", date(2024, 3, 4), hm(9, 0), hm(10, 0)),
        ];
        let events = build_events(&days, &shifts, &[ana_voley()], Vec::new());

        let monday = &events[&date(2024, 3, 4)];
        let ids: Vec<_> = monday.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "sched-s1-2024-03-04", "late"]);
        assert!(monday.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn shifts_outside_range_are_dropped() {
        let days = week_range(date(2024, 3, 4)).days();
        let shifts = vec![shift("x", date(2024, 3, 11), hm(9, 0), hm(10, 0))];
        let events = reconcile(&days, &shifts, &[]);
        assert!(events.values().all(|v| v.is_empty()));
        assert!(!events.contains_key(&date(2024, 3, 11)));
    }

    #[test]
    fn shift_labels_fall_back() {
        let bare = shift_event(&shift("x", date(2024, 3, 4), hm(9, 0), hm(10, 0)));
        assert_eq!(bare.location_label, "Sin cancha");
        assert_eq!(bare.staff_label, "Sin profesor");
        assert_eq!(bare.title_label, "Sin cancha");
        assert_eq!(bare.origin, EventOrigin::Real { shift_id: "x".to_string() });

        let mut named = shift("y", date(2024, 3, 4), hm(9, 0), hm(10, 0));
        named.court_name = Some("Cancha 2".to_string());
        named.group_name = Some("Fútbol infantil".to_string());
        let event = shift_event(&named);
        assert_eq!(event.location_label, "Cancha 2");
        assert_eq!(event.title_label, "Fútbol infantil");
        assert_eq!(event.emoji, "⚽");
    }

    #[test]
    fn shift_and_occurrence_for_same_class_both_appear() {
        let days = week_range(date(2024, 3, 4)).days();
        let mut booked = shift("real-1", date(2024, 3, 4), hm(18, 0), hm(19, 0));
        booked.professor_name = Some("Ana".to_string());
        booked.group_name = Some("Voley".to_string());

        let events = build_events(&days, &[booked], &[ana_voley()], Vec::new());
        let monday = &events[&date(2024, 3, 4)];
        assert_eq!(monday.len(), 2);
        // equal start times keep insertion order: shift first
        assert_eq!(monday[0].id, "real-1");
        assert!(monday[1].is_recurring());
    }

    #[test]
    fn occurrence_ids_never_collide_with_shift_ids() {
        let days = week_range(date(2024, 3, 4)).days();
        let shifts = vec![shift(
            "0b8f6a2e-6c1d-4a4e-9a57-3c2f7f9d1e11",
            date(2024, 3, 4),
            hm(9, 0),
            hm(10, 0),
        )];
        let events = build_events(&days, &shifts, &[ana_voley()], Vec::new());
        let all: Vec<_> = events.values().flatten().collect();
        let ids: std::collections::HashSet<_> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let days = week_range(date(2024, 3, 4)).days();
        let shifts = vec![
            shift("a", date(2024, 3, 5), hm(18, 0), hm(19, 0)),
            shift("b", date(2024, 3, 5), hm(18, 0), hm(20, 0)),
        ];
        let occurrences = materialize(&[ana_voley()], &days, &ReportLookup::default());

        let first = reconcile(&days, &shifts, &occurrences);
        let second = reconcile(&days, &shifts, &occurrences);
        assert_eq!(first, second);
    }

    #[test]
    fn ana_voley_scenario() {
        let days = week_range(date(2024, 3, 4)).days();
        let reviews = vec![ClassReview {
            id: "r1".to_string(),
            schedule_id: "s1".to_string(),
            date: date(2024, 3, 4),
            attendance: Some(12),
            notes: Some("Buena".to_string()),
            created_at: Utc::now().naive_utc(),
        }];

        let events = build_events(&days, &[], &[ana_voley()], reviews);

        let monday = &events[&date(2024, 3, 4)];
        assert_eq!(monday.len(), 1);
        let occ = &monday[0];
        assert_eq!(occ.id, "sched-s1-2024-03-04");
        assert_eq!(occ.title_label, "Clase de Voley");
        assert_eq!(occ.staff_label, "Ana");
        assert_eq!(occ.location_label, "Voley");
        assert_eq!(occ.status, ShiftStatus::Scheduled);
        assert_eq!(occ.report.as_ref().and_then(|r| r.attendance), Some(12));

        let others: usize = events
            .iter()
            .filter(|(d, _)| **d != date(2024, 3, 4))
            .map(|(_, v)| v.len())
            .sum();
        assert_eq!(others, 0);
    }
}
