use chrono::{NaiveTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{NewSchedule, RecurringSchedule, ScheduleRow};
use crate::error::{AppError, AppResult};

const SELECT_SCHEDULE: &str = r#"
    SELECT
        s.id, s.professor_id, s.court_id, s.day_of_week, s.sport,
        s.start_time, s.end_time, s.description, s.created_at,
        p.full_name AS professor_name,
        c.name AS court_name
    FROM professor_schedules s
    LEFT JOIN professors p ON p.id = s.professor_id
    LEFT JOIN courts c ON c.id = s.court_id
"#;

pub(crate) fn clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Convert rows at the boundary; malformed rows are logged and skipped.
fn parse_rows(rows: Vec<ScheduleRow>) -> Vec<RecurringSchedule> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match RecurringSchedule::try_from(row) {
                Ok(schedule) => Some(schedule),
                Err(e) => {
                    tracing::warn!("Skipping malformed schedule {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

pub struct ScheduleRepository;

impl ScheduleRepository {
    /// Every schedule, ordered by weekday then start time.
    pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<RecurringSchedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(SELECT_SCHEDULE)
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)?;

        let mut schedules = parse_rows(rows);
        schedules.sort_by_key(|s| (s.day_of_week, s.start_time));
        Ok(schedules)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<RecurringSchedule>> {
        let sql = format!("{} WHERE s.id = ?", SELECT_SCHEDULE);
        let row = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row.and_then(|r| parse_rows(vec![r]).pop()))
    }

    pub async fn create(pool: &SqlitePool, new: NewSchedule) -> AppResult<RecurringSchedule> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO professor_schedules (
                id, professor_id, court_id, day_of_week, sport,
                start_time, end_time, description, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.professor_id)
        .bind(&new.court_id)
        .bind(new.day_of_week.as_str())
        .bind(new.sport.trim())
        .bind(clock(new.start_time))
        .bind(clock(new.end_time))
        .bind(&new.description)
        .bind(now)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Schedule vanished after insert")))
    }

    /// Replace a schedule's fields. Returns `None` if it does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        new: NewSchedule,
    ) -> AppResult<Option<RecurringSchedule>> {
        let result = sqlx::query(
            r#"
            UPDATE professor_schedules
            SET professor_id = ?, court_id = ?, day_of_week = ?, sport = ?,
                start_time = ?, end_time = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(&new.professor_id)
        .bind(&new.court_id)
        .bind(new.day_of_week.as_str())
        .bind(new.sport.trim())
        .bind(clock(new.start_time))
        .bind(clock(new.end_time))
        .bind(&new.description)
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM professor_schedules WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::time_range::DayOfWeek;
    use crate::db::models::CreateProfessor;
    use crate::db::repository::{CourtRepository, ProfessorRepository};
    use crate::db::test_pool;

    async fn seed_professor(pool: &SqlitePool) -> String {
        ProfessorRepository::create(
            pool,
            CreateProfessor {
                full_name: "Ana".to_string(),
                email: None,
                specialty: None,
                status: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn create_joins_professor_and_court_names() {
        let pool = test_pool().await;
        let professor_id = seed_professor(&pool).await;
        let court = CourtRepository::create(&pool, "Cancha 1", None).await.unwrap();

        let schedule = ScheduleRepository::create(
            &pool,
            NewSchedule {
                professor_id,
                day_of_week: DayOfWeek::Miercoles,
                sport: "Voley".to_string(),
                start_time: hm(18, 0),
                end_time: hm(19, 30),
                description: None,
                court_id: Some(court.id),
            },
        )
        .await
        .unwrap();

        assert_eq!(schedule.day_of_week, DayOfWeek::Miercoles);
        assert_eq!(schedule.professor_name.as_deref(), Some("Ana"));
        assert_eq!(schedule.court_name.as_deref(), Some("Cancha 1"));
        assert_eq!(schedule.end_time, hm(19, 30));
    }

    #[tokio::test]
    async fn legacy_rows_are_normalised_and_malformed_rows_skipped() {
        let pool = test_pool().await;
        let professor_id = seed_professor(&pool).await;
        let now = Utc::now().naive_utc();

        for (id, day, start) in [
            ("legacy", "miercoles", "09:00:00"),
            ("broken-day", "Someday", "09:00"),
            ("broken-time", "Lunes", "9am"),
        ] {
            sqlx::query(
                "INSERT INTO professor_schedules (id, professor_id, day_of_week, sport, start_time, end_time, created_at) VALUES (?, ?, ?, 'Futbol', ?, '10:00', ?)",
            )
            .bind(id)
            .bind(&professor_id)
            .bind(day)
            .bind(start)
            .bind(now)
            .execute(&pool)
            .await
            .unwrap();
        }

        let schedules = ScheduleRepository::list_all(&pool).await.unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].id, "legacy");
        assert_eq!(schedules[0].day_of_week, DayOfWeek::Miercoles);
        assert_eq!(schedules[0].start_time, hm(9, 0));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let pool = test_pool().await;
        let professor_id = seed_professor(&pool).await;
        let new = NewSchedule {
            professor_id,
            day_of_week: DayOfWeek::Lunes,
            sport: "Voley".to_string(),
            start_time: hm(18, 0),
            end_time: hm(19, 0),
            description: None,
            court_id: None,
        };
        let created = ScheduleRepository::create(&pool, new.clone()).await.unwrap();

        let moved = ScheduleRepository::update(
            &pool,
            &created.id,
            NewSchedule {
                day_of_week: DayOfWeek::Viernes,
                ..new.clone()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(moved.day_of_week, DayOfWeek::Viernes);

        assert!(ScheduleRepository::update(&pool, "missing", new)
            .await
            .unwrap()
            .is_none());
        assert!(ScheduleRepository::delete(&pool, &created.id).await.unwrap());
        assert!(!ScheduleRepository::delete(&pool, &created.id).await.unwrap());
    }
}
