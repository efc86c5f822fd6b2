pub mod models;
pub mod repository;

pub use models::*;
pub use repository::{
    CourtRepository, InventoryRepository, ProfessorRepository, ProfileRepository,
    ReviewRepository, ScheduleRepository, ShiftRepository,
};

use crate::error::AppResult;

/// Rows from a read, or an empty list when the read failed. The failure is
/// logged; callers render "nothing yet" instead of an error.
pub fn or_empty<T>(what: &str, result: AppResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Failed to load {}, answering with an empty list: {:?}", what, e);
        Vec::new()
    })
}

/// Fresh in-memory database with all migrations applied.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}
