pub mod form;
pub mod records;

use axum::http::StatusCode;

pub async fn health() -> StatusCode {
    StatusCode::OK
}
