use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::Principal;
use crate::gateway::error::ApiResult;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ValidJson};
use crate::models::{Favorite, FavoriteRequest};

#[utoipa::path(
    get,
    path = "/api/v1/favorites/{national_id}",
    params(("national_id" = String, Path, description = "National id")),
    responses(
        (status = 200, description = "Favorites of the user", body = ApiResponse<Vec<Favorite>>),
        (status = 404, description = "User has no favorites")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Path(national_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Favorite>>>> {
    let favorites = state.market.favorites.list(&national_id).await?;
    Ok(Json(ApiResponse::success(favorites)))
}

#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 201, description = "Favorite added", body = ApiResponse<Favorite>),
        (status = 400, description = "nationalId or plate missing"),
        (status = 409, description = "Already a favorite")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    ValidJson(request): ValidJson<FavoriteRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Favorite>>)> {
    tracing::debug!("[FAVORITES] Add requested by {}", principal.national_id);
    let favorite = state.market.favorites.add(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(favorite))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Favorite removed"),
        (status = 400, description = "nationalId or plate missing"),
        (status = 404, description = "No such favorite")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    ValidJson(request): ValidJson<FavoriteRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.favorites.remove(request).await?;
    Ok(Json(ApiResponse::message("favorite removed")))
}
