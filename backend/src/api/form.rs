use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::controller::{FormState, ListState, SubmitOutcome};
use crate::error::AppError;
use crate::models::Field;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub field: Field,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub outcome: SubmitOutcome,
    pub form: FormState,
    pub list: ListState,
}

pub async fn get_form(State(state): State<AppState>) -> Json<FormState> {
    Json(state.form.state())
}

pub async fn open_create(State(state): State<AppState>) -> Json<FormState> {
    state.form.open_create();
    Json(state.form.state())
}

pub async fn open_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormState>, AppError> {
    let record = state
        .records
        .state()
        .find(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("record {} is not in the list", id)))?;

    state.form.open_edit(record);
    Ok(Json(state.form.state()))
}

pub async fn update_field(
    State(state): State<AppState>,
    Json(req): Json<UpdateFieldRequest>,
) -> Result<Json<FormState>, AppError> {
    if !state.form.update_field(req.field, req.value) {
        return Err(AppError::Conflict("form is not open".to_string()));
    }
    Ok(Json(state.form.state()))
}

pub async fn submit(State(state): State<AppState>) -> Json<SubmitResponse> {
    let outcome = state.form.submit(&state.records).await;

    Json(SubmitResponse {
        outcome,
        form: state.form.state(),
        list: state.records.state(),
    })
}

pub async fn cancel(State(state): State<AppState>) -> Json<FormState> {
    state.form.cancel();
    Json(state.form.state())
}
