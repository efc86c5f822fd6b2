use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};

use crate::db::{
    CourtRepository, NewSchedule, ProfessorRepository, RecurringSchedule, ScheduleInput,
    ScheduleRepository,
};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::auth::AdminUser;
use crate::services::validation;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_schedule))
        .route("/:id", put(update_schedule).delete(delete_schedule))
}

/// Referenced professor and court must exist before the row is written.
async fn check_references(state: &AppState, schedule: &NewSchedule) -> AppResult<()> {
    if ProfessorRepository::find_by_id(&state.db, &schedule.professor_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(i18n::t("not_found.professor")));
    }
    if let Some(court_id) = &schedule.court_id {
        if CourtRepository::find_by_id(&state.db, court_id).await?.is_none() {
            return Err(AppError::NotFound(i18n::t("not_found.court")));
        }
    }
    Ok(())
}

async fn create_schedule(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<ScheduleInput>,
) -> AppResult<(StatusCode, Json<RecurringSchedule>)> {
    let schedule = validation::schedule(input)?;
    check_references(&state, &schedule).await?;

    let created = ScheduleRepository::create(&state.db, schedule).await?;
    tracing::info!(
        "Profile {} added schedule {} ({} {})",
        admin.id,
        created.id,
        created.day_of_week.as_str(),
        created.sport
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_schedule(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(input): Json<ScheduleInput>,
) -> AppResult<Json<RecurringSchedule>> {
    let schedule = validation::schedule(input)?;
    check_references(&state, &schedule).await?;

    let updated = ScheduleRepository::update(&state.db, &id, schedule)
        .await?
        .ok_or_else(|| AppError::NotFound(i18n::t("not_found.schedule")))?;
    Ok(Json(updated))
}

async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if !ScheduleRepository::delete(&state.db, &id).await? {
        return Err(AppError::NotFound(i18n::t("not_found.schedule")));
    }
    tracing::info!("Profile {} deleted schedule {}", admin.id, id);
    Ok(Json(serde_json::json!({ "message": i18n::t("schedule.deleted") })))
}
