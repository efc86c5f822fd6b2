use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{ClassReview, ReviewWithSchedule, UpsertClassReview};
use crate::error::{AppError, AppResult};

pub struct ReviewRepository;

impl ReviewRepository {
    pub async fn find_in_range(
        pool: &SqlitePool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ClassReview>> {
        sqlx::query_as::<_, ClassReview>(
            r#"
            SELECT id, schedule_id, date, attendance, notes, created_at
            FROM class_reviews
            WHERE date >= ? AND date <= ?
            ORDER BY date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_key(
        pool: &SqlitePool,
        schedule_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ClassReview>> {
        sqlx::query_as::<_, ClassReview>(
            r#"
            SELECT id, schedule_id, date, attendance, notes, created_at
            FROM class_reviews
            WHERE schedule_id = ? AND date = ?
            "#,
        )
        .bind(schedule_id)
        .bind(date)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Insert or overwrite the report for `(schedule_id, date)`.
    pub async fn upsert(pool: &SqlitePool, review: UpsertClassReview) -> AppResult<ClassReview> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO class_reviews (id, schedule_id, date, attendance, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(schedule_id, date) DO UPDATE SET
                attendance = excluded.attendance,
                notes = excluded.notes
            "#,
        )
        .bind(&id)
        .bind(&review.schedule_id)
        .bind(review.date)
        .bind(review.attendance)
        .bind(&review.notes)
        .bind(now)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_key(pool, &review.schedule_id, review.date)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Review vanished after upsert")))
    }

    /// Reports in range joined with their schedule, professor and court.
    pub async fn find_with_schedule_in_range(
        pool: &SqlitePool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ReviewWithSchedule>> {
        sqlx::query_as::<_, ReviewWithSchedule>(
            r#"
            SELECT
                r.id, r.schedule_id, r.date, r.attendance, r.notes,
                s.sport, s.start_time, s.end_time,
                p.full_name AS professor_name,
                c.name AS court_name
            FROM class_reviews r
            JOIN professor_schedules s ON s.id = r.schedule_id
            LEFT JOIN professors p ON p.id = s.professor_id
            LEFT JOIN courts c ON c.id = s.court_id
            WHERE r.date >= ? AND r.date <= ?
            ORDER BY r.date, s.start_time
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }
}
