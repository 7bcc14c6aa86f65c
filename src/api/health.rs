//! Liveness and readiness endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

impl HealthResponse {
    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness check; answers as long as the process serves requests
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::with_status("healthy"))
}

/// Readiness check; acquires a database connection before answering
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Database is reachable", body = HealthResponse),
        (status = 503, description = "Database is not reachable", body = HealthResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    match state.services.repository.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::with_status("ready"))).into_response(),
        Err(err) => {
            tracing::warn!("Readiness probe failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::with_status("not ready")),
            )
                .into_response()
        }
    }
}
