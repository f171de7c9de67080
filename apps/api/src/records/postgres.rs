use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::records::{keyed_item, KeyedItem, RecordStore};

/// Résumé entries in the `resume_entries` table, one JSONB item per row.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch(&self, user: &str) -> Result<Vec<Value>, AppError> {
        let items: Vec<Value> = sqlx::query_scalar(
            "SELECT item FROM resume_entries WHERE user_name = $1 ORDER BY entry_id",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        if items.is_empty() {
            return Err(AppError::NotFound(format!("No résumé entries for user '{user}'")));
        }
        Ok(items)
    }

    async fn put(&self, user: &str, item: Value) -> Result<(), AppError> {
        let KeyedItem {
            entry_id,
            kind,
            item,
        } = keyed_item(user, item)?;

        sqlx::query(
            r#"
            INSERT INTO resume_entries (user_name, entry_id, entry_type, item)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_name, entry_id)
            DO UPDATE SET entry_type = EXCLUDED.entry_type,
                          item = EXCLUDED.item,
                          updated_at = now()
            "#,
        )
        .bind(user)
        .bind(&entry_id)
        .bind(kind.as_str())
        .bind(&item)
        .execute(&self.pool)
        .await?;

        info!("Stored {kind} entry {entry_id} for user {user}");
        Ok(())
    }
}
