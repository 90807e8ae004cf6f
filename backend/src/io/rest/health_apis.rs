use axum::{http::StatusCode, response::IntoResponse, Json};
use shared::HealthResponse;

/// Axum handler function for GET /health
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
        }),
    )
}
