use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::db::{or_empty, InventoryInput, InventoryItem, InventoryRepository};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::auth::{AdminUser, AuthUser};
use crate::services::validation;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", put(update_item).delete(delete_item))
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    Ok(Json(or_empty(
        "inventory",
        InventoryRepository::list(&state.db).await,
    )))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Json(input): Json<InventoryInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let item = validation::inventory_item(input)?;
    let created = InventoryRepository::create(&state.db, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(input): Json<InventoryInput>,
) -> AppResult<Json<InventoryItem>> {
    let item = validation::inventory_item(input)?;
    InventoryRepository::update(&state.db, &id, item)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(i18n::t("not_found.inventory_item")))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    if !InventoryRepository::delete(&state.db, &id).await? {
        return Err(AppError::NotFound(i18n::t("not_found.inventory_item")));
    }
    Ok(Json(serde_json::json!({ "message": i18n::t("inventory.deleted") })))
}
