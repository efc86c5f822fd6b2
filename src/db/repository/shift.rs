use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{NewShift, Shift, ShiftRow};
use crate::db::repository::schedule::clock;
use crate::error::{AppError, AppResult};

const SELECT_SHIFT: &str = r#"
    SELECT
        sh.id, sh.date, sh.start_time, sh.end_time, sh.court_id, sh.professor_id,
        sh.group_name, sh.status, sh.price, sh.created_at,
        c.name AS court_name,
        p.full_name AS professor_name
    FROM shifts sh
    LEFT JOIN courts c ON c.id = sh.court_id
    LEFT JOIN professors p ON p.id = sh.professor_id
"#;

fn parse_rows(rows: Vec<ShiftRow>) -> Vec<Shift> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match Shift::try_from(row) {
                Ok(shift) => Some(shift),
                Err(e) => {
                    tracing::warn!("Skipping malformed shift {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

pub struct ShiftRepository;

impl ShiftRepository {
    /// Shifts dated between `start` and `end` inclusive, ordered by date and start time.
    pub async fn find_in_range(
        pool: &SqlitePool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Shift>> {
        let sql = format!(
            "{} WHERE sh.date >= ? AND sh.date <= ? ORDER BY sh.date, sh.start_time",
            SELECT_SHIFT
        );
        let rows = sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(parse_rows(rows))
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Shift>> {
        let sql = format!("{} WHERE sh.id = ?", SELECT_SHIFT);
        let row = sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(row.and_then(|r| parse_rows(vec![r]).pop()))
    }

    pub async fn create(pool: &SqlitePool, new: NewShift) -> AppResult<Shift> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, date, start_time, end_time, court_id, professor_id,
                group_name, status, price, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(new.date)
        .bind(clock(new.start_time))
        .bind(clock(new.end_time))
        .bind(&new.court_id)
        .bind(&new.professor_id)
        .bind(&new.group_name)
        .bind(new.status.as_str())
        .bind(new.price)
        .bind(now)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Shift vanished after insert")))
    }

    pub async fn update(pool: &SqlitePool, id: &str, new: NewShift) -> AppResult<Option<Shift>> {
        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET date = ?, start_time = ?, end_time = ?, court_id = ?, professor_id = ?,
                group_name = ?, status = ?, price = ?
            WHERE id = ?
            "#,
        )
        .bind(new.date)
        .bind(clock(new.start_time))
        .bind(clock(new.end_time))
        .bind(&new.court_id)
        .bind(&new.professor_id)
        .bind(&new.group_name)
        .bind(new.status.as_str())
        .bind(new.price)
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
        let result = sqlx::query("DELETE FROM shifts WHERE id = ?")
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
    use crate::db::models::ShiftStatus;
    use crate::db::repository::CourtRepository;
    use crate::db::test_pool;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shift_on(day: NaiveDate, hour: u32) -> NewShift {
        NewShift {
            date: day,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
            court_id: None,
            professor_id: None,
            group_name: Some("Escuelita".to_string()),
            status: ShiftStatus::Scheduled,
            price: Some(1500.0),
        }
    }

    #[tokio::test]
    async fn find_in_range_is_inclusive_and_sorted() {
        let pool = test_pool().await;
        ShiftRepository::create(&pool, shift_on(date(2024, 3, 10), 9))
            .await
            .unwrap();
        ShiftRepository::create(&pool, shift_on(date(2024, 3, 4), 20))
            .await
            .unwrap();
        ShiftRepository::create(&pool, shift_on(date(2024, 3, 4), 10))
            .await
            .unwrap();
        ShiftRepository::create(&pool, shift_on(date(2024, 3, 11), 10))
            .await
            .unwrap();

        let shifts = ShiftRepository::find_in_range(&pool, date(2024, 3, 4), date(2024, 3, 10))
            .await
            .unwrap();
        assert_eq!(shifts.len(), 3);
        assert_eq!(shifts[0].date, date(2024, 3, 4));
        assert_eq!(shifts[0].start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(shifts[2].date, date(2024, 3, 10));
    }

    #[tokio::test]
    async fn unknown_status_reads_as_scheduled() {
        let pool = test_pool().await;
        let now = Utc::now().naive_utc();
        sqlx::query(
            "INSERT INTO shifts (id, date, start_time, end_time, status, created_at) VALUES ('s1', '2024-03-05', '10:00', '11:00', 'pending', ?)",
        )
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO shifts (id, date, start_time, end_time, status, created_at) VALUES ('s2', '2024-03-05', '12:00', '13:00', NULL, ?)",
        )
        .bind(now)
        .execute(&pool)
        .await
        .unwrap();

        let shifts = ShiftRepository::find_in_range(&pool, date(2024, 3, 4), date(2024, 3, 10))
            .await
            .unwrap();
        assert_eq!(shifts.len(), 2);
        assert!(shifts.iter().all(|s| s.status == ShiftStatus::Scheduled));
    }

    #[tokio::test]
    async fn joins_court_name_and_updates() {
        let pool = test_pool().await;
        let court = CourtRepository::create(&pool, "Cancha 1", None).await.unwrap();
        let mut new = shift_on(date(2024, 3, 5), 18);
        new.court_id = Some(court.id.clone());
        let created = ShiftRepository::create(&pool, new.clone()).await.unwrap();
        assert_eq!(created.court_name.as_deref(), Some("Cancha 1"));

        new.status = ShiftStatus::Cancelled;
        let updated = ShiftRepository::update(&pool, &created.id, new)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ShiftStatus::Cancelled);

        assert!(ShiftRepository::delete(&pool, &created.id).await.unwrap());
        assert!(ShiftRepository::find_by_id(&pool, &created.id)
            .await
            .unwrap()
            .is_none());
    }
}
