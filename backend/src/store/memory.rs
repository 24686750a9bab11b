use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::Record;
use crate::store::RecordStore;

/// Process-local store with sequential ids. Useful for development and tests.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Record>,
    next_id: u64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows. Ids keep counting past the largest
    /// numeric id present.
    pub fn with_records(rows: Vec<Record>) -> Self {
        let next_id = rows
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: Mutex::new(Inner { rows, next_id }),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.inner.lock().await.rows.clone())
    }

    async fn insert(&self, title: &str, time: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = inner.next_id.to_string();
        inner.rows.push(Record::new(id, title, time));
        Ok(())
    }

    async fn update_by_id(&self, id: &str, title: &str, time: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::RowNotAffected(id.to_string()))?;
        row.title = title.to_string();
        row.time = time.to_string();
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.rows.len();
        inner.rows.retain(|r| r.id != id);
        if inner.rows.len() == before {
            return Err(StoreError::RowNotAffected(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_continue_after_seeded_rows() {
        let store = MemoryRecordStore::with_records(vec![Record::new("4", "Rust", "1")]);
        store.insert("Go", "2").await.unwrap();

        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows[1], Record::new("5", "Go", "2"));
    }

    #[tokio::test]
    async fn missing_rows_are_reported() {
        let store = MemoryRecordStore::new();
        assert!(matches!(
            store.delete_by_id("1").await,
            Err(StoreError::RowNotAffected(id)) if id == "1"
        ));
        assert!(store.update_by_id("1", "a", "1").await.is_err());
    }
}
