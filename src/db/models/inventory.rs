use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Inventory payload as sent by clients. `quantity` may arrive as a number or a
/// numeric string (form posts).
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryInput {
    pub name: Option<String>,
    pub quantity: Option<serde_json::Value>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: i64,
    pub description: Option<String>,
}
