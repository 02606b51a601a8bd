use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::gateway::error::ApiResult;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ValidJson};
use crate::models::{NewUser, UserContact, UserPatch, UserProfile};

/// Register a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserProfile>),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "National id already registered")
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(new_user): ValidJson<NewUser>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
    let profile = state.market.users.create(new_user).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(profile))))
}

/// Public contact card of a seller
#[utoipa::path(
    get,
    path = "/api/v1/users/{national_id}",
    params(("national_id" = String, Path, description = "National id")),
    responses(
        (status = 200, description = "Contact details", body = ApiResponse<UserContact>),
        (status = 404, description = "Unknown user")
    ),
    tag = "Users"
)]
pub async fn get_user_contact(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserContact>>> {
    let contact = state.market.users.contact(&national_id).await?;
    Ok(Json(ApiResponse::success(contact)))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/{national_id}",
    params(("national_id" = String, Path, description = "National id")),
    responses(
        (status = 200, description = "Full profile without credentials", body = ApiResponse<UserProfile>),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = state.market.users.profile(&national_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{national_id}",
    params(("national_id" = String, Path, description = "National id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Invalid field or nothing changed"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
    ValidJson(patch): ValidJson<UserPatch>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.users.update(&national_id, patch).await?;
    Ok(Json(ApiResponse::message("user updated")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{national_id}",
    params(("national_id" = String, Path, description = "National id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "Unknown user")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.users.delete(&national_id).await?;
    Ok(Json(ApiResponse::message("user deleted")))
}
