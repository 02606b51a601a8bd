//! Image upload and batch delete

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::gateway::error::ApiResult;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ValidJson};
use crate::images::DeleteReport;

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImages {
    /// Stored paths, in upload order
    pub images: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeleteImagesRequest {
    pub images: Option<Vec<String>>,
}

/// Upload one or more images (multipart field `image`, repeatable)
#[utoipa::path(
    post,
    path = "/api/v1/images",
    request_body(content_type = "multipart/form-data", description = "One or more `image` file fields"),
    responses(
        (status = 200, description = "Images stored", body = ApiResponse<UploadedImages>),
        (status = 400, description = "No file, empty name or disallowed extension")
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<UploadedImages>>> {
    let mut stored = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ValidationError::MalformedBody(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let name = state.images.accept(field.file_name())?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
        stored.push(state.images.save(&name, &bytes).await?);
    }

    if stored.is_empty() {
        return Err(ValidationError::MissingField { field: IMAGE_FIELD }.into());
    }
    Ok(Json(ApiResponse::success(UploadedImages { images: stored })))
}

/// Delete images by stored path or file name
///
/// Answers 207 with per-image outcomes when any image was not deleted.
#[utoipa::path(
    post,
    path = "/api/v1/images/delete",
    request_body = DeleteImagesRequest,
    responses(
        (status = 200, description = "All images deleted", body = ApiResponse<DeleteReport>),
        (status = 207, description = "Some images were not deleted", body = ApiResponse<DeleteReport>),
        (status = 400, description = "Empty or missing list")
    ),
    security(("bearer_auth" = [])),
    tag = "Images"
)]
pub async fn delete_images(
    State(state): State<Arc<AppState>>,
    ValidJson(request): ValidJson<DeleteImagesRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DeleteReport>>)> {
    let images = request.images.unwrap_or_default();
    let report = state.images.delete_batch(&images).await?;
    if report.all_deleted() {
        return Ok((StatusCode::OK, Json(ApiResponse::success(report))));
    }
    Ok((StatusCode::MULTI_STATUS, Json(ApiResponse::partial(report))))
}
