use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{InventoryItem, NewInventoryItem};
use crate::error::{AppError, AppResult};

pub struct InventoryRepository;

impl InventoryRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, description, created_at, updated_at
            FROM inventory
            ORDER BY name
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, description, created_at, updated_at
            FROM inventory
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn create(pool: &SqlitePool, item: NewInventoryItem) -> AppResult<InventoryItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO inventory (id, name, quantity, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(item.name.trim())
        .bind(item.quantity)
        .bind(&item.description)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Item vanished after insert")))
    }

    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        item: NewInventoryItem,
    ) -> AppResult<Option<InventoryItem>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE inventory
            SET name = ?, quantity = ?, description = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(item.name.trim())
        .bind(item.quantity)
        .bind(&item.description)
        .bind(now)
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
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?")
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
    use crate::db::test_pool;

    fn item(name: &str, quantity: i64) -> NewInventoryItem {
        NewInventoryItem {
            name: name.to_string(),
            quantity,
            description: None,
        }
    }

    #[tokio::test]
    async fn crud_round() {
        let pool = test_pool().await;
        let pelotas = InventoryRepository::create(&pool, item("Pelotas", 20))
            .await
            .unwrap();
        InventoryRepository::create(&pool, item("Conos", 15))
            .await
            .unwrap();

        let names: Vec<_> = InventoryRepository::list(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Conos", "Pelotas"]);

        let updated = InventoryRepository::update(&pool, &pelotas.id, item("Pelotas", 18))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, 18);

        assert!(InventoryRepository::delete(&pool, &pelotas.id).await.unwrap());
        assert!(InventoryRepository::update(&pool, &pelotas.id, item("x", 1))
            .await
            .unwrap()
            .is_none());
    }
}
