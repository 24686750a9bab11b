#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use study_records::error::StoreError;
use study_records::models::Record;
use study_records::store::{MemoryRecordStore, RecordStore};
use tokio::sync::Notify;

/// Holds a fetch after it has read its rows, until the test releases it.
#[derive(Default)]
pub struct FetchGate {
    pub reached: Notify,
    pub release: Notify,
}

/// In-memory store with failure injection, call logging and gated fetches.
pub struct ScriptedStore {
    pub inner: MemoryRecordStore,
    pub fail_fetch: AtomicBool,
    pub fail_writes: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
    gates: Mutex<VecDeque<Arc<FetchGate>>>,
}

impl ScriptedStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            inner: MemoryRecordStore::with_records(records),
            fail_fetch: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(VecDeque::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c != "fetch_all").count()
    }

    /// The next fetch without a gate of its own will wait on the returned one.
    pub fn gate_next_fetch(&self) -> Arc<FetchGate> {
        let gate = Arc::new(FetchGate::default());
        self.gates.lock().unwrap().push_back(gate.clone());
        gate
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_writes(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                status: 503,
                body: "write rejected".to_string(),
            });
        }
        Ok(())
    }
}

pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new("1", "TypeScript", "3"),
        Record::new("2", "React", "2"),
    ]
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        self.log("fetch_all");
        let gate = self.gates.lock().unwrap().pop_front();
        let rows = self.inner.fetch_all().await;

        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                status: 500,
                body: "fetch failed".to_string(),
            });
        }
        rows
    }

    async fn insert(&self, title: &str, time: &str) -> Result<(), StoreError> {
        self.log("insert");
        self.check_writes()?;
        self.inner.insert(title, time).await
    }

    async fn update_by_id(&self, id: &str, title: &str, time: &str) -> Result<(), StoreError> {
        self.log("update_by_id");
        self.check_writes()?;
        self.inner.update_by_id(id, title, time).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.log("delete_by_id");
        self.check_writes()?;
        self.inner.delete_by_id(id).await
    }
}
