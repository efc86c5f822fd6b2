use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::calendar::workload::{workload_chart, WorkloadChart};
use crate::db::{
    or_empty, CreateProfessor, Professor, ProfessorRepository, ProfessorWithSchedules,
    UpdateProfessor,
};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::anchor_or_today;
use crate::routes::auth::{AdminUser, AuthUser};
use crate::services::validation;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_professors).post(create_professor))
        .route("/workload", get(workload))
        .route("/:id", put(update_professor).delete(delete_professor))
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub week: Option<String>,
}

async fn list_professors(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> AppResult<Json<Vec<ProfessorWithSchedules>>> {
    let roster = ProfessorRepository::list_with_schedules(&state.db).await;
    Ok(Json(or_empty("professors", roster)))
}

async fn create_professor(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<CreateProfessor>,
) -> AppResult<(StatusCode, Json<Professor>)> {
    let input = validation::professor(input)?;
    let professor = ProfessorRepository::create(&state.db, input).await?;
    tracing::info!("Profile {} created professor {}", admin.id, professor.id);
    Ok((StatusCode::CREATED, Json(professor)))
}

async fn update_professor(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateProfessor>,
) -> AppResult<Json<Professor>> {
    let input = validation::professor_update(input)?;
    let professor = ProfessorRepository::update(&state.db, &id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(i18n::t("not_found.professor")))?;
    Ok(Json(professor))
}

async fn delete_professor(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if !ProfessorRepository::delete(&state.db, &id).await? {
        return Err(AppError::NotFound(i18n::t("not_found.professor")));
    }
    tracing::info!("Profile {} deleted professor {}", admin.id, id);
    Ok(Json(serde_json::json!({ "message": i18n::t("professor.deleted") })))
}

async fn workload(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<WorkloadChart>> {
    let anchor = anchor_or_today(&state, query.week.as_deref())?;
    let roster = or_empty(
        "professors",
        ProfessorRepository::list_with_schedules(&state.db).await,
    );
    Ok(Json(workload_chart(&roster, anchor)))
}
