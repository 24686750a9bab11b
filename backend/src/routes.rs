use axum::Router;
use axum::routing::{delete, get, patch, post};

use crate::api::{self, form, records};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/records", get(records::list_records))
        .route("/records/refresh", post(records::refresh_records))
        .route("/records/{id}", delete(records::delete_record))
        .route("/form", get(form::get_form))
        .route("/form/create", post(form::open_create))
        .route("/form/edit/{id}", post(form::open_edit))
        .route("/form/fields", patch(form::update_field))
        .route("/form/submit", post(form::submit))
        .route("/form/cancel", post(form::cancel))
        .with_state(state)
}
