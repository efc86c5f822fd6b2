use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::calendar::time_range::{week_range, DayOfWeek};
use crate::db::{or_empty, ClassReview, ReviewInput, ReviewRepository, ScheduleRepository};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::anchor_or_today;
use crate::routes::auth::{AdminUser, AuthUser};
use crate::services::reports::{group_by_day, WeeklyReports};
use crate::services::validation;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(weekly_reports).post(save_report))
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<String>,
}

async fn weekly_reports(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<WeeklyReports>> {
    let week = week_range(anchor_or_today(&state, query.week.as_deref())?);
    let rows = or_empty(
        "class reports",
        ReviewRepository::find_with_schedule_in_range(&state.db, week.start, week.end).await,
    );
    Ok(Json(group_by_day(week, rows)))
}

/// Create or overwrite the report for one class on one date.
async fn save_report(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<ReviewInput>,
) -> AppResult<Json<ClassReview>> {
    let review = validation::review(input)?;
    let schedule = ScheduleRepository::find_by_id(&state.db, &review.schedule_id)
        .await?
        .ok_or_else(|| AppError::NotFound(i18n::t("not_found.schedule")))?;
    if DayOfWeek::from_date(review.date) != schedule.day_of_week {
        return Err(AppError::Validation(i18n::t_with(
            "validation.report_wrong_day",
            &[("day", schedule.day_of_week.as_str())],
        )));
    }

    let saved = ReviewRepository::upsert(&state.db, review).await?;
    tracing::info!(
        "Profile {} saved report for schedule {} on {}",
        admin.id,
        saved.schedule_id,
        saved.date
    );
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::NaiveTime;
    use serde_json::json;

    use crate::calendar::time_range::DayOfWeek;
    use crate::db::{CreateProfessor, NewSchedule, ProfessorRepository, ScheduleRepository, UserRole};
    use crate::routes::test_app;
    use crate::test_support::{json_request, send, signed_in, test_state};

    async fn seed_schedule(state: &crate::AppState) -> String {
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
        ScheduleRepository::create(
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
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn upsert_overwrites_and_week_groups_by_day() {
        let state = test_state().await;
        let (_, admin) = signed_in(&state, "admin@club.org", UserRole::Admin).await;
        let schedule_id = seed_schedule(&state).await;

        for attendance in [8, 12] {
            let (status, saved) = send(
                test_app(state.clone()),
                json_request(
                    "POST",
                    "/api/reportes",
                    Some(&admin),
                    Some(json!({
                        "schedule_id": schedule_id,
                        "date": "2024-03-04",
                        "attendance": attendance
                    })),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(saved["attendance"], attendance);
        }

        let (status, week) = send(
            test_app(state),
            json_request("GET", "/api/reportes?week=2024-03-07", Some(&admin), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(week["total_attendance"], 12);
        let days = week["days"].as_array().unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0]["heading"], "Lunes 4");
        assert_eq!(days[0]["reports"][0]["sport"], "Voley");
        assert_eq!(days[0]["reports"][0]["professor_name"], "Ana");
    }

    #[tokio::test]
    async fn report_validation_and_unknown_schedule() {
        let state = test_state().await;
        let (_, admin) = signed_in(&state, "admin@club.org", UserRole::Admin).await;
        let schedule_id = seed_schedule(&state).await;

        let (status, body) = send(
            test_app(state.clone()),
            json_request(
                "POST",
                "/api/reportes",
                Some(&admin),
                Some(json!({ "schedule_id": schedule_id, "date": "2024-03-04", "attendance": -2 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "La asistencia no puede ser negativa");

        let (status, body) = send(
            test_app(state.clone()),
            json_request(
                "POST",
                "/api/reportes",
                Some(&admin),
                Some(json!({ "schedule_id": schedule_id, "date": "2024-03-05", "attendance": 9 })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "La clase se dicta los Lunes");

        let (status, week) = send(
            test_app(state.clone()),
            json_request("GET", "/api/reportes?week=2024-03-04", Some(&admin), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(week["total_attendance"], 0);

        let (status, _) = send(
            test_app(state),
            json_request(
                "POST",
                "/api/reportes",
                Some(&admin),
                Some(json!({ "schedule_id": "ghost", "date": "2024-03-04" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_read_answers_empty_week() {
        let state = test_state().await;
        let (_, user) = signed_in(&state, "user@club.org", UserRole::Common).await;
        sqlx::query("DROP TABLE class_reviews").execute(&state.db).await.unwrap();

        let (status, week) = send(
            test_app(state),
            json_request("GET", "/api/reportes?week=2024-03-04", Some(&user), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(week["total_attendance"], 0);
        assert!(week["days"].as_array().unwrap().is_empty());
    }
}
