use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{
    CreateProfessor, Professor, ProfessorWithSchedules, RecurringSchedule, UpdateProfessor,
};
use crate::db::repository::ScheduleRepository;
use crate::error::{AppError, AppResult};

// ============================================================================
// Professor Repository
// ============================================================================

pub struct ProfessorRepository;

impl ProfessorRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Professor>> {
        sqlx::query_as::<_, Professor>(
            r#"
            SELECT id, full_name, email, specialty, status, created_at
            FROM professors
            ORDER BY full_name
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Professor>> {
        sqlx::query_as::<_, Professor>(
            r#"
            SELECT id, full_name, email, specialty, status, created_at
            FROM professors
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Roster ordered by name, each professor with their schedules attached.
    pub async fn list_with_schedules(pool: &SqlitePool) -> AppResult<Vec<ProfessorWithSchedules>> {
        let professors = Self::list(pool).await?;
        let schedules = ScheduleRepository::list_all(pool).await?;
        Ok(attach_schedules(professors, schedules))
    }

    pub async fn create(pool: &SqlitePool, create: CreateProfessor) -> AppResult<Professor> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO professors (id, full_name, email, specialty, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(create.full_name.trim())
        .bind(create.email)
        .bind(create.specialty)
        .bind(create.status.unwrap_or_else(|| "active".to_string()))
        .bind(now)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Professor vanished after insert")))
    }

    /// Apply a partial update. Returns `None` if the professor does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        update: UpdateProfessor,
    ) -> AppResult<Option<Professor>> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE professors
            SET full_name = ?, email = ?, specialty = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(update.full_name.unwrap_or(existing.full_name))
        .bind(update.email.or(existing.email))
        .bind(update.specialty.or(existing.specialty))
        .bind(update.status.or(existing.status))
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a professor; their schedules go with them. Returns whether a row was removed.
    pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM professors WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

/// Group schedules under their professor, keeping the roster order.
pub fn attach_schedules(
    professors: Vec<Professor>,
    schedules: Vec<RecurringSchedule>,
) -> Vec<ProfessorWithSchedules> {
    let mut by_professor: HashMap<String, Vec<RecurringSchedule>> = HashMap::new();
    for schedule in schedules {
        by_professor
            .entry(schedule.professor_id.clone())
            .or_default()
            .push(schedule);
    }

    professors
        .into_iter()
        .map(|professor| {
            let schedules = by_professor.remove(&professor.id).unwrap_or_default();
            ProfessorWithSchedules {
                professor,
                schedules,
            }
        })
        .collect()
}
