use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Record;
use crate::store::RecordStore;

pub struct SqliteRecordStore {
    db: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let records = sqlx::query_as::<_, Record>(
            "SELECT id, title, time FROM study_records ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(&self.db)
        .await?;

        debug!("fetched {} records", records.len());
        Ok(records)
    }

    async fn insert(&self, title: &str, time: &str) -> Result<(), StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO study_records (id, title, time, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&id)
            .bind(title)
            .bind(time)
            .bind(&now)
            .execute(&self.db)
            .await?;

        info!("inserted record {}", id);
        Ok(())
    }

    async fn update_by_id(&self, id: &str, title: &str, time: &str) -> Result<(), StoreError> {
        let affected = sqlx::query("UPDATE study_records SET title = ?1, time = ?2 WHERE id = ?3")
            .bind(title)
            .bind(time)
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::RowNotAffected(id.to_string()));
        }
        info!("updated record {}", id);
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let affected = sqlx::query("DELETE FROM study_records WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::RowNotAffected(id.to_string()));
        }
        info!("deleted record {}", id);
        Ok(())
    }
}
