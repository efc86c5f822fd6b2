use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;

use crate::calendar::time_range::today_at_offset;
use crate::error::AppResult;
use crate::services::validation;
use crate::AppState;

pub mod auth;
pub mod chat;
pub mod courts;
pub mod health;
pub mod inventory;
pub mod professors;
pub mod reports;
pub mod schedules;
pub mod shifts;

/// Every `/api` resource except `/auth`, which `main` nests separately behind
/// the rate limiter.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/profesores", professors::router())
        .nest("/horarios", schedules::router())
        .nest("/turnos", shifts::router())
        .nest("/reportes", reports::router())
        .nest("/inventario", inventory::router())
        .nest("/canchas", courts::router())
        .nest("/chat", chat::router())
}

/// "Today" for the complex, in its configured UTC offset.
pub fn today(state: &AppState) -> NaiveDate {
    today_at_offset(state.config.calendar.utc_offset_hours)
}

/// Parse an optional `?week=` anchor, defaulting to today.
pub fn anchor_or_today(state: &AppState, raw: Option<&str>) -> AppResult<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => validation::parse_date(raw),
        None => Ok(today(state)),
    }
}

/// Full application router without rate limiting, for handler tests.
#[cfg(test)]
pub fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health::health_check))
        .nest("/api/auth", auth::router())
        .nest("/api", api_router())
        .with_state(state)
}
