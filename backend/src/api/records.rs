use axum::Json;
use axum::extract::{Path, State};

use crate::controller::ListState;
use crate::state::AppState;

pub async fn list_records(State(state): State<AppState>) -> Json<ListState> {
    Json(state.records.state())
}

pub async fn refresh_records(State(state): State<AppState>) -> Json<ListState> {
    state.records.refresh().await;
    Json(state.records.state())
}

/// Failures are reported through the returned list status, not the HTTP code.
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ListState> {
    state.records.request_delete(&id).await;
    Json(state.records.state())
}
