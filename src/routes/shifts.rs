use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::calendar::view::{CalendarView, ViewMode};
use crate::db::{CourtRepository, NewShift, ProfessorRepository, Shift, ShiftInput, ShiftRepository};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::auth::{AdminUser, AuthUser};
use crate::routes::{anchor_or_today, today};
use crate::services::calendar::{CalendarResponse, CalendarService};
use crate::services::validation;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(calendar).post(create_shift))
        .route("/:id", put(update_shift).delete(delete_shift))
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub week: Option<String>,
    pub view: Option<String>,
}

fn view_mode(raw: Option<&str>) -> AppResult<ViewMode> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ViewMode::default()),
        Some(raw) => ViewMode::from_str(raw).ok_or_else(|| {
            AppError::Validation(i18n::t_with("validation.invalid_view", &[("view", raw)]))
        }),
    }
}

/// Shifts and schedule occurrences for the requested week or month, laid out.
async fn calendar(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let mode = view_mode(query.view.as_deref())?;
    let anchor = anchor_or_today(&state, query.week.as_deref())?;
    let view = CalendarView::new(anchor, mode);
    Ok(Json(CalendarService::load(&state, view, today(&state)).await))
}

async fn check_references(state: &AppState, shift: &NewShift) -> AppResult<()> {
    if let Some(court_id) = &shift.court_id {
        if CourtRepository::find_by_id(&state.db, court_id).await?.is_none() {
            return Err(AppError::NotFound(i18n::t("not_found.court")));
        }
    }
    if let Some(professor_id) = &shift.professor_id {
        if ProfessorRepository::find_by_id(&state.db, professor_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(i18n::t("not_found.professor")));
        }
    }
    Ok(())
}

async fn create_shift(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<ShiftInput>,
) -> AppResult<(StatusCode, Json<Shift>)> {
    let shift = validation::shift(input)?;
    check_references(&state, &shift).await?;

    let created = ShiftRepository::create(&state.db, shift).await?;
    tracing::info!("Profile {} booked shift {} on {}", admin.id, created.id, created.date);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_shift(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(input): Json<ShiftInput>,
) -> AppResult<Json<Shift>> {
    let shift = validation::shift(input)?;
    check_references(&state, &shift).await?;

    let updated = ShiftRepository::update(&state.db, &id, shift)
        .await?
        .ok_or_else(|| AppError::NotFound(i18n::t("not_found.shift")))?;
    Ok(Json(updated))
}

async fn delete_shift(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if !ShiftRepository::delete(&state.db, &id).await? {
        return Err(AppError::NotFound(i18n::t("not_found.shift")));
    }
    tracing::info!("Profile {} deleted shift {}", admin.id, id);
    Ok(Json(serde_json::json!({ "message": i18n::t("shift.deleted") })))
}
