use std::sync::Arc;

use axum::{Json, extract::State};

use crate::auth::{LoginRequest, LoginResponse};
use crate::gateway::error::ApiResult;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ValidJson};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let response = state.auth.login(req).await?;
    Ok(Json(ApiResponse::success(response)))
}
