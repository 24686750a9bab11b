pub mod dto;
pub mod memory;
pub mod rest;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreBackend;
use crate::db;
use crate::error::StoreError;
use crate::models::Record;

pub use memory::MemoryRecordStore;
pub use rest::RestRecordStore;
pub use sqlite::SqliteRecordStore;

/// Typed access to the remote record collection.
///
/// Every call is a fresh round trip; implementations keep no cache. Writes
/// return nothing, so callers refetch to observe store-assigned ids.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError>;
    async fn insert(&self, title: &str, time: &str) -> Result<(), StoreError>;
    async fn update_by_id(&self, id: &str, title: &str, time: &str) -> Result<(), StoreError>;
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// Builds the store selected by configuration.
pub async fn connect(backend: &StoreBackend) -> Result<Arc<dyn RecordStore>, StoreError> {
    let store: Arc<dyn RecordStore> = match backend {
        StoreBackend::Rest(config) => Arc::new(RestRecordStore::new(config.clone())?),
        StoreBackend::Sqlite { database_url } => {
            let pool = db::connect(database_url).await?;
            Arc::new(SqliteRecordStore::new(pool))
        }
        StoreBackend::Memory => Arc::new(MemoryRecordStore::new()),
    };
    Ok(store)
}
