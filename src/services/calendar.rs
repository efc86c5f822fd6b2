use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::calendar::layout::{month_layout, week_layout, MonthLayout, VisibleWindow, WeekLayout};
use crate::calendar::reconcile::build_events;
use crate::calendar::time_range::DateRange;
use crate::calendar::view::{CalendarView, ViewMode};
use crate::db::models::{ClassReview, RecurringSchedule, Shift};
use crate::db::{or_empty, ReviewRepository, ScheduleRepository, ShiftRepository};
use crate::error::AppResult;
use crate::AppState;

/// Everything the calendar needs for one range, read in one go.
#[derive(Debug, Default)]
pub struct CalendarSnapshot {
    pub shifts: Vec<Shift>,
    pub schedules: Vec<RecurringSchedule>,
    pub reviews: Vec<ClassReview>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CalendarGrid {
    Week(WeekLayout),
    Month(MonthLayout),
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    /// Clients drop responses whose key no longer matches the view they asked for.
    pub key: String,
    pub view: ViewMode,
    pub anchor: NaiveDate,
    pub label: String,
    pub range: DateRange,
    pub today: NaiveDate,
    pub is_current_period: bool,
    pub previous: NaiveDate,
    pub next: NaiveDate,
    pub layout: CalendarGrid,
}

/// Calendar renderer:
///
/// - Reads shifts, schedules and reports for the view's range concurrently.
/// - A failed read degrades to an empty set so the grid still renders.
/// - Reconciliation and layout run synchronously over the snapshot.
pub struct CalendarService;

impl CalendarService {
    pub async fn fetch_snapshot(state: &Arc<AppState>, range: DateRange) -> CalendarSnapshot {
        let (shifts, schedules, reviews) = futures::join!(
            ShiftRepository::find_in_range(&state.db, range.start, range.end),
            ScheduleRepository::list_all(&state.db),
            ReviewRepository::find_in_range(&state.db, range.start, range.end),
        );

        CalendarSnapshot {
            shifts: or_empty("shifts", shifts),
            schedules: or_empty("schedules", schedules),
            reviews: or_empty("class reviews", reviews),
        }
    }

    pub fn render(
        view: CalendarView,
        snapshot: CalendarSnapshot,
        window: VisibleWindow,
        today: NaiveDate,
    ) -> CalendarResponse {
        let range = view.range();
        let days = range.days();
        let events = build_events(&days, &snapshot.shifts, &snapshot.schedules, snapshot.reviews);

        let layout = match view.mode {
            ViewMode::Week => CalendarGrid::Week(week_layout(&days, &events, window, today)),
            ViewMode::Month => CalendarGrid::Month(month_layout(view.anchor, &days, &events, today)),
        };

        CalendarResponse {
            key: view.key(),
            view: view.mode,
            anchor: view.anchor,
            label: view.label(),
            range,
            today,
            is_current_period: view.is_current_period(today),
            previous: view.navigate(-1).anchor,
            next: view.navigate(1).anchor,
            layout,
        }
    }

    pub async fn load(state: &Arc<AppState>, view: CalendarView, today: NaiveDate) -> CalendarResponse {
        let snapshot = Self::fetch_snapshot(state, view.range()).await;
        debug!(
            "Calendar {}: {} shifts, {} schedules, {} reports",
            view.key(),
            snapshot.shifts.len(),
            snapshot.schedules.len(),
            snapshot.reviews.len()
        );
        Self::render(view, snapshot, VisibleWindow::from(&state.config.calendar), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::time_range::DayOfWeek;
    use crate::db::models::ShiftStatus;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> CalendarSnapshot {
        CalendarSnapshot {
            shifts: vec![Shift {
                id: "shift-1".to_string(),
                date: date(2024, 3, 6),
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
                court_id: None,
                professor_id: None,
                group_name: None,
                status: ShiftStatus::Completed,
                price: None,
                court_name: Some("Cancha 1".to_string()),
                professor_name: None,
            }],
            schedules: vec![RecurringSchedule {
                id: "s1".to_string(),
                professor_id: "p1".to_string(),
                court_id: None,
                day_of_week: DayOfWeek::Lunes,
                sport: "Voley".to_string(),
                start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                description: None,
                professor_name: Some("Ana".to_string()),
                court_name: None,
            }],
            reviews: Vec::new(),
        }
    }

    #[test]
    fn week_render_serializes_blocks() {
        let view = CalendarView::new(date(2024, 3, 6), ViewMode::Week);
        let response = CalendarService::render(view, snapshot(), VisibleWindow::default(), date(2024, 3, 6));

        assert_eq!(response.key, "week:2024-03-04");
        assert!(response.is_current_period);
        assert_eq!(response.previous, date(2024, 2, 28));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["view"], "week");
        let columns = json["layout"]["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 7);

        let monday = &columns[0]["blocks"][0];
        assert_eq!(monday["id"], "sched-s1-2024-03-04");
        assert_eq!(monday["start_time"], "18:00");
        assert_eq!(monday["origin"]["kind"], "recurring");

        let wednesday = &columns[2]["blocks"][0];
        assert_eq!(wednesday["status"], "completed");
        assert_eq!(wednesday["geometry"]["offset"], 0.125);
        assert_eq!(wednesday["geometry"]["height"], 0.09375);
    }

    #[test]
    fn month_render_uses_grid_range() {
        let view = CalendarView::new(date(2024, 3, 6), ViewMode::Month);
        let response = CalendarService::render(view, snapshot(), VisibleWindow::default(), date(2024, 3, 6));

        assert_eq!(response.range.start, date(2024, 2, 26));
        assert_eq!(response.range.end, date(2024, 3, 31));
        assert_eq!(response.label, "marzo 2024");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["layout"]["headers"][0], "LUN");
        assert_eq!(json["layout"]["weeks"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn empty_snapshot_still_renders_every_day() {
        let view = CalendarView::new(date(2024, 3, 6), ViewMode::Week);
        let response = CalendarService::render(
            view,
            CalendarSnapshot::default(),
            VisibleWindow::default(),
            date(2024, 3, 6),
        );
        let CalendarGrid::Week(week) = response.layout else {
            panic!("expected week layout");
        };
        assert_eq!(week.columns.len(), 7);
        assert!(week.columns.iter().all(|c| c.blocks.is_empty()));
    }

    #[tokio::test]
    async fn broken_relation_still_renders_the_week() {
        use crate::db::{CreateProfessor, NewSchedule, ProfessorRepository};

        let state = crate::test_support::test_state().await;
        let professor = ProfessorRepository::create(
            &state.db,
            CreateProfessor {
                full_name: "Ana".to_string(),
                email: None,
                specialty: None,
                status: None,
            },
        )
        .await
        .unwrap();
        let schedule = ScheduleRepository::create(
            &state.db,
            NewSchedule {
                professor_id: professor.id,
                day_of_week: DayOfWeek::Lunes,
                sport: "Voley".to_string(),
                start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                description: None,
                court_id: None,
            },
        )
        .await
        .unwrap();
        sqlx::query("DROP TABLE class_reviews")
            .execute(&state.db)
            .await
            .unwrap();

        let view = CalendarView::new(date(2024, 3, 6), ViewMode::Week);
        let response = CalendarService::load(&state, view, date(2024, 3, 6)).await;

        let json = serde_json::to_value(&response).unwrap();
        let columns = json["layout"]["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 7);
        let monday = columns[0]["blocks"].as_array().unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0]["id"], format!("sched-{}-2024-03-04", schedule.id));
        assert!(monday[0]["report"].is_null());
    }
}
