use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{or_empty, Court, CourtRepository};
use crate::error::AppResult;
use crate::routes::auth::AuthUser;
use crate::AppState;

/// Courts are read-only over the API; they are provisioned with the database.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_courts))
}

async fn list_courts(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> AppResult<Json<Vec<Court>>> {
    Ok(Json(or_empty("courts", CourtRepository::list(&state.db).await)))
}
