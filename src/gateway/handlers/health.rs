//! Health check handler

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use utoipa::ToSchema;

use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, error_codes};

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// Git short hash of the build
    #[schema(example = "a1b2c3d")]
    pub git_hash: &'static str,
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
}

/// Health check endpoint
///
/// Pings the document store; does not expose failure details.
///
/// - Healthy: 200 OK + {code: 0, data: {version, git_hash, timestamp_ms}}
/// - Unhealthy: 503 Service Unavailable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    match state.market.ping().await {
        Ok(()) => Json(ApiResponse::success(HealthResponse {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            timestamp_ms: Utc::now().timestamp_millis(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("[HEALTH] Store ping failed: {}", e);
            let body = ApiResponse::<()>::error(error_codes::SERVICE_UNAVAILABLE, "unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
