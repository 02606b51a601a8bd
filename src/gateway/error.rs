use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::{ApiResponse, api_code};
use crate::error::{MarketError, ValidationError};

/// [`MarketError`] rendered as an HTTP response in the API envelope
///
/// Internal failures are logged and answered with a generic message.
#[derive(Debug)]
pub struct ApiError(pub MarketError);

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let msg = if err.is_internal() {
            tracing::error!("[API] Internal error: {}", err);
            "internal error".to_string()
        } else {
            tracing::debug!("[API] {} {}", status, err);
            err.to_string()
        };
        (status, Json(ApiResponse::<()>::error(api_code(&err), msg))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
