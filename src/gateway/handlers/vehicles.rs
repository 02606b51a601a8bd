//! Vehicle listing handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::gateway::error::ApiResult;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiResponse, ValidJson};
use crate::models::{Vehicle, VehicleDraft, VehiclePatch};
use crate::search::VehicleSearchParams;

/// Search vehicles
///
/// Every parameter is optional; no parameters returns the whole catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    params(VehicleSearchParams),
    responses(
        (status = 200, description = "Matching vehicles (possibly none)", body = ApiResponse<Vec<Vehicle>>),
        (status = 400, description = "Malformed range bound")
    ),
    tag = "Vehicles"
)]
pub async fn search_vehicles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VehicleSearchParams>,
) -> ApiResult<Json<ApiResponse<Vec<Vehicle>>>> {
    let filter = params.build_filter()?;
    let vehicles = state.market.vehicles.search(&filter).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{plate}",
    params(("plate" = String, Path, description = "Licence plate")),
    responses(
        (status = 200, description = "Vehicle", body = ApiResponse<Vehicle>),
        (status = 404, description = "Unknown plate")
    ),
    tag = "Vehicles"
)]
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(plate): Path<String>,
) -> ApiResult<Json<ApiResponse<Vehicle>>> {
    let vehicle = state.market.vehicles.get(&plate).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = VehicleDraft,
    responses(
        (status = 201, description = "Vehicle created", body = ApiResponse<Vehicle>),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Plate already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "Vehicles"
)]
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    ValidJson(draft): ValidJson<VehicleDraft>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vehicle>>)> {
    let vehicle = state.market.vehicles.create(draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(vehicle))))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{plate}",
    params(("plate" = String, Path, description = "Licence plate")),
    request_body = VehiclePatch,
    responses(
        (status = 200, description = "Vehicle updated"),
        (status = 400, description = "Invalid field or nothing changed"),
        (status = 404, description = "Unknown plate"),
        (status = 409, description = "New plate already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "Vehicles"
)]
pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Path(plate): Path<String>,
    ValidJson(patch): ValidJson<VehiclePatch>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.vehicles.update(&plate, patch).await?;
    Ok(Json(ApiResponse::message("vehicle updated")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{plate}",
    params(("plate" = String, Path, description = "Licence plate")),
    responses(
        (status = 200, description = "Vehicle deleted"),
        (status = 404, description = "Unknown plate")
    ),
    security(("bearer_auth" = [])),
    tag = "Vehicles"
)]
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Path(plate): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.market.vehicles.delete(&plate).await?;
    Ok(Json(ApiResponse::message("vehicle deleted")))
}
