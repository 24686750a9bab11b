use std::sync::Arc;

use crate::controller::{FormController, RecordListController};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordListController>,
    pub form: Arc<FormController>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            records: Arc::new(RecordListController::new(store)),
            form: Arc::new(FormController::new()),
        }
    }
}
