use axum::{http::StatusCode, response::IntoResponse};
use tracing::debug;

pub async fn not_found() -> impl IntoResponse {
    debug!("reminder worker: no route matched");
    (StatusCode::NOT_FOUND, "NOT_FOUND")
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
