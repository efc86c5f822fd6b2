use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{UserProfile, UserRole};
use crate::error::{AppError, AppResult};

// ============================================================================
// User Profile Repository
// ============================================================================

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM user_profiles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Lookup by email, case-insensitive.
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM user_profiles
            WHERE lower(email) = lower(?)
            "#,
        )
        .bind(email.trim())
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn create(
        pool: &SqlitePool,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> AppResult<UserProfile> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO user_profiles (id, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(email.trim())
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Profile vanished after insert")))
    }

    pub async fn update_password(
        pool: &SqlitePool,
        id: &str,
        password_hash: &str,
    ) -> AppResult<()> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            r#"
            UPDATE user_profiles
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }
}
