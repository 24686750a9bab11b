//! Authoritative record list and its loading/error status.
//!
//! # Invariants
//! - Every write is followed by a full refetch; the list is never patched
//!   locally.
//! - Store failures end up in `ListStatus::Failed` and are never returned.
//! - A refetch response older than one already applied is discarded.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::controller::form::FormMode;
use crate::error::StoreError;
use crate::models::{Record, RecordFields};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListState {
    pub records: Vec<Record>,
    pub status: ListStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    FetchStarted,
    FetchSucceeded(Vec<Record>),
    FetchFailed(String),
    WriteFailed(String),
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            status: ListStatus::Loading,
        }
    }
}

impl ListState {
    pub fn apply(&mut self, event: ListEvent) {
        match event {
            ListEvent::FetchStarted => self.status = ListStatus::Loading,
            ListEvent::FetchSucceeded(records) => {
                self.records = records;
                self.status = ListStatus::Ready;
            }
            // Records stay as the last good fetch.
            ListEvent::FetchFailed(message) | ListEvent::WriteFailed(message) => {
                self.status = ListStatus::Failed(message);
            }
        }
    }

    /// Rows to show in the table. A failure message replaces the table
    /// rather than composing with it, and nothing is shown while loading.
    pub fn table(&self) -> Option<&[Record]> {
        match self.status {
            ListStatus::Ready => Some(&self.records),
            _ => None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Result of a delete or submit as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// The same write was already in flight.
    Skipped,
    Failed(String),
}

pub struct RecordListController {
    store: Arc<dyn RecordStore>,
    state: watch::Sender<ListState>,
    issued: AtomicU64,
    applied: AtomicU64,
    pending_deletes: Mutex<HashSet<String>>,
    submitting: AtomicBool,
}

impl RecordListController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            store,
            state,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            pending_deletes: Mutex::new(HashSet::new()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub async fn mount(&self) {
        info!("loading study records");
        self.refresh().await;
    }

    pub async fn refresh(&self) {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.apply(ListEvent::FetchStarted));

        let result = self.store.fetch_all().await;

        self.state.send_if_modified(|state| {
            if token < self.applied.load(Ordering::SeqCst) {
                debug!("discarding stale fetch #{}", token);
                return false;
            }
            self.applied.store(token, Ordering::SeqCst);

            match result {
                Ok(records) => {
                    debug!("fetch #{} returned {} records", token, records.len());
                    state.apply(ListEvent::FetchSucceeded(records));
                }
                Err(e) => {
                    warn!("fetch #{} failed: {}", token, e);
                    state.apply(ListEvent::FetchFailed(e.to_string()));
                }
            }
            if token < self.issued.load(Ordering::SeqCst) {
                state.status = ListStatus::Loading;
            }
            true
        });
    }

    pub async fn request_delete(&self, id: &str) -> WriteOutcome {
        let Some(_pending) = PendingDelete::claim(&self.pending_deletes, id) else {
            debug!("delete of {} already in flight", id);
            return WriteOutcome::Skipped;
        };

        match self.store.delete_by_id(id).await {
            Ok(()) => {
                self.refresh().await;
                WriteOutcome::Applied
            }
            Err(e) => self.write_failed("delete", e),
        }
    }

    /// Inserts or updates depending on `mode`, then refetches. `Applied` tells
    /// the form it may close; anything else means it stays open.
    pub async fn request_submit(&self, mode: &FormMode, fields: &RecordFields) -> WriteOutcome {
        if self.submitting.swap(true, Ordering::SeqCst) {
            debug!("submit already in flight");
            return WriteOutcome::Skipped;
        }
        let _submitting = ClearOnDrop(&self.submitting);

        // Validation reads `time` trimmed; store it the same way.
        let time = fields.time.trim();
        let result = match mode {
            FormMode::Create => self.store.insert(&fields.title, time).await,
            FormMode::Edit(record) => {
                self.store
                    .update_by_id(&record.id, &fields.title, time)
                    .await
            }
        };

        match result {
            Ok(()) => {
                self.refresh().await;
                WriteOutcome::Applied
            }
            Err(e) => self.write_failed("submit", e),
        }
    }

    fn write_failed(&self, action: &str, err: StoreError) -> WriteOutcome {
        warn!("{} failed: {}", action, err);
        let message = err.to_string();
        self.state.send_modify(|state| state.apply(ListEvent::WriteFailed(message.clone())));
        WriteOutcome::Failed(message)
    }
}

struct PendingDelete<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl<'a> PendingDelete<'a> {
    fn claim(set: &'a Mutex<HashSet<String>>, id: &str) -> Option<Self> {
        if !lock(set).insert(id.to_string()) {
            return None;
        }
        Some(Self {
            set,
            id: id.to_string(),
        })
    }
}

impl Drop for PendingDelete<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.id);
    }
}

struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}
