use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::gateway::error::ApiResult;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ValidJson};
use crate::models::{Publication, PublicationInput};

#[utoipa::path(
    get,
    path = "/api/v1/publications",
    responses(
        (status = 200, description = "All publications", body = ApiResponse<Vec<Publication>>),
        (status = 404, description = "No publications yet")
    ),
    tag = "Publications"
)]
pub async fn list_publications(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<Publication>>>> {
    let publications = state.market.publications.list().await?;
    Ok(Json(ApiResponse::success(publications)))
}

#[utoipa::path(
    get,
    path = "/api/v1/publications/{id}",
    params(("id" = String, Path, description = "Publication id")),
    responses(
        (status = 200, description = "Publication", body = ApiResponse<Publication>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown publication")
    ),
    tag = "Publications"
)]
pub async fn get_publication(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Publication>>> {
    let publication = state.market.publications.get(&id).await?;
    Ok(Json(ApiResponse::success(publication)))
}

/// Publish a vehicle for sale
#[utoipa::path(
    post,
    path = "/api/v1/publications",
    request_body = PublicationInput,
    responses(
        (status = 201, description = "Publication created", body = ApiResponse<Publication>),
        (status = 400, description = "Vehicle or user does not exist"),
        (status = 409, description = "Vehicle already published")
    ),
    security(("bearer_auth" = [])),
    tag = "Publications"
)]
pub async fn create_publication(
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<PublicationInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Publication>>)> {
    let publication = state.market.publications.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(publication))))
}

#[utoipa::path(
    put,
    path = "/api/v1/publications/{id}",
    params(("id" = String, Path, description = "Publication id")),
    request_body = PublicationInput,
    responses(
        (status = 200, description = "Publication updated"),
        (status = 400, description = "Bad reference, malformed id or nothing changed"),
        (status = 404, description = "Unknown publication"),
        (status = 409, description = "Vehicle already published")
    ),
    security(("bearer_auth" = [])),
    tag = "Publications"
)]
pub async fn update_publication(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<PublicationInput>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.publications.update(&id, input).await?;
    Ok(Json(ApiResponse::message("publication updated")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/publications/{id}",
    params(("id" = String, Path, description = "Publication id")),
    responses(
        (status = 200, description = "Publication deleted"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown publication")
    ),
    security(("bearer_auth" = [])),
    tag = "Publications"
)]
pub async fn delete_publication(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.publications.delete(&id).await?;
    Ok(Json(ApiResponse::message("publication deleted")))
}
