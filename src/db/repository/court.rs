use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::Court;
use crate::error::{AppError, AppResult};

pub struct CourtRepository;

impl CourtRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Court>> {
        sqlx::query_as::<_, Court>(
            r#"
            SELECT id, name, type, created_at
            FROM courts
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Court>> {
        sqlx::query_as::<_, Court>(
            r#"
            SELECT id, name, type, created_at
            FROM courts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Courts are provisioned out of band; this is used by seeding and tests.
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        court_type: Option<&str>,
    ) -> AppResult<Court> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query("INSERT INTO courts (id, name, type, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(court_type)
            .bind(now)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Court vanished after insert")))
    }
}
