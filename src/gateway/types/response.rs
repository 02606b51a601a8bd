//! Response envelope `{code, msg, data}` and the numeric codes it carries

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AuthFailure, Conflict, DanglingReference, MarketError, ValidationError};

/// Envelope around every JSON body. `data` is present on success and partial
/// success, absent on errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// 0 on success, otherwise one of [`error_codes`]
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Batch result where some items failed
    pub fn partial(data: T) -> Self {
        Self {
            code: error_codes::PARTIAL_SUCCESS,
            msg: "partial success".to_string(),
            data: Some(data),
        }
    }

    /// Body of a failed request
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Codes grouped by class: 1xxx request, 2xxx auth, 3xxx batch, 4xxx resource state, 5xxx server
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INVALID_FILTER_VALUE: i32 = 1002;
    pub const MISSING_IDENTIFIERS: i32 = 1003;
    pub const DANGLING_VEHICLE_REFERENCE: i32 = 1004;
    pub const DANGLING_USER_REFERENCE: i32 = 1005;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const TOKEN_EXPIRED: i32 = 2003;
    pub const INVALID_CREDENTIALS: i32 = 2004;

    // Batch results (3xxx)
    pub const PARTIAL_SUCCESS: i32 = 3001;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4004;
    pub const DUPLICATE_KEY: i32 = 4091;
    pub const DUPLICATE_PUBLICATION: i32 = 4092;
    pub const DUPLICATE_FAVORITE: i32 = 4093;
    pub const NO_CHANGE_APPLIED: i32 = 4094;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

/// Numeric API code for an error
pub fn api_code(err: &MarketError) -> i32 {
    use error_codes::*;
    match err {
        MarketError::Validation(ValidationError::InvalidFilterValue { .. }) => INVALID_FILTER_VALUE,
        MarketError::Validation(ValidationError::MissingIdentifiers) => MISSING_IDENTIFIERS,
        MarketError::Validation(_) => INVALID_PARAMETER,
        MarketError::NotFound { .. } => NOT_FOUND,
        MarketError::Conflict(Conflict::DuplicateKey { .. }) => DUPLICATE_KEY,
        MarketError::Conflict(Conflict::DuplicatePublicationForVehicle { .. }) => {
            DUPLICATE_PUBLICATION
        }
        MarketError::Conflict(Conflict::DuplicateFavorite { .. }) => DUPLICATE_FAVORITE,
        MarketError::Conflict(Conflict::NoChangeApplied(_)) => NO_CHANGE_APPLIED,
        MarketError::Auth(AuthFailure::MissingOrMalformed) => MISSING_AUTH,
        MarketError::Auth(AuthFailure::Expired) => TOKEN_EXPIRED,
        MarketError::Auth(AuthFailure::Invalid) => AUTH_FAILED,
        MarketError::Auth(AuthFailure::InvalidCredentials) => INVALID_CREDENTIALS,
        MarketError::DanglingReference(DanglingReference::Vehicle(_)) => DANGLING_VEHICLE_REFERENCE,
        MarketError::DanglingReference(DanglingReference::User(_)) => DANGLING_USER_REFERENCE,
        MarketError::Store(_) | MarketError::Internal(_) => INTERNAL_ERROR,
    }
}
