//! Marketplace error taxonomy
//!
//! Every expected outcome of a marketplace operation is a variant of
//! [`MarketError`]. Only [`MarketError::Internal`] and [`MarketError::Store`]
//! represent unexpected failures; everything else is a user-facing result.

use thiserror::Error;

use crate::store::StoreError;

/// Entity kinds managed by the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Vehicle,
    User,
    Publication,
    Favorite,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Entity::Vehicle => "vehicle",
            Entity::User => "user",
            Entity::Publication => "publication",
            Entity::Favorite => "favorite",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Malformed, missing or out-of-range input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Request body is empty or not valid JSON: {0}")]
    MalformedBody(String),

    #[error("Missing field: {field}")]
    MissingField { field: &'static str },

    #[error("Field {field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Field {field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Invalid value for {field}: '{value}'")]
    InvalidEnum { field: &'static str, value: String },

    #[error("Invalid format for {field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Invalid filter value for {field}: '{value}'")]
    InvalidFilterValue { field: &'static str, value: String },

    #[error("Both nationalId and plate must be provided")]
    MissingIdentifiers,
}

impl ValidationError {
    /// Name of the offending field, when there is a single one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidEnum { field, .. }
            | ValidationError::InvalidFilterValue { field, .. } => Some(field),
            ValidationError::InvalidFormat { field, .. } => Some(field.as_str()),
            ValidationError::MalformedBody(_) | ValidationError::MissingIdentifiers => None,
        }
    }
}

/// Writes rejected because they would break a uniqueness rule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Conflict {
    #[error("A {entity} with key '{key}' already exists")]
    DuplicateKey { entity: Entity, key: String },

    #[error("A publication already exists for vehicle '{plate}'")]
    DuplicatePublicationForVehicle { plate: String },

    #[error("Vehicle '{plate}' is already a favorite of user '{national_id}'")]
    DuplicateFavorite { national_id: String, plate: String },

    #[error("No changes were applied to the {0}")]
    NoChangeApplied(Entity),
}

/// Authentication failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Missing or malformed bearer token")]
    MissingOrMalformed,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// References to entities that do not exist at write time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    #[error("Vehicle with plate '{0}' does not exist")]
    Vehicle(String),

    #[error("User with national id '{0}' does not exist")]
    User(String),
}

#[derive(Error, Debug)]
pub enum MarketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    #[error(transparent)]
    Conflict(#[from] Conflict),

    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error(transparent)]
    DanglingReference(#[from] DanglingReference),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        MarketError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::Validation(ValidationError::InvalidFilterValue { .. }) => {
                "INVALID_FILTER_VALUE"
            }
            MarketError::Validation(ValidationError::MissingIdentifiers) => "MISSING_IDENTIFIERS",
            MarketError::Validation(_) => "VALIDATION_ERROR",
            MarketError::NotFound { .. } => "NOT_FOUND",
            MarketError::Conflict(Conflict::DuplicateKey { .. }) => "DUPLICATE_KEY",
            MarketError::Conflict(Conflict::DuplicatePublicationForVehicle { .. }) => {
                "DUPLICATE_PUBLICATION_FOR_VEHICLE"
            }
            MarketError::Conflict(Conflict::DuplicateFavorite { .. }) => "DUPLICATE_FAVORITE",
            MarketError::Conflict(Conflict::NoChangeApplied(_)) => "NO_CHANGE_APPLIED",
            MarketError::Auth(AuthFailure::MissingOrMalformed) => "MISSING_OR_MALFORMED_TOKEN",
            MarketError::Auth(AuthFailure::Expired) => "TOKEN_EXPIRED",
            MarketError::Auth(AuthFailure::Invalid) => "INVALID_TOKEN",
            MarketError::Auth(AuthFailure::InvalidCredentials) => "INVALID_CREDENTIALS",
            MarketError::DanglingReference(DanglingReference::Vehicle(_)) => {
                "DANGLING_VEHICLE_REFERENCE"
            }
            MarketError::DanglingReference(DanglingReference::User(_)) => {
                "DANGLING_USER_REFERENCE"
            }
            MarketError::Store(_) | MarketError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code suggestion
    ///
    /// `NoChangeApplied` answers 400 rather than 409, matching the behaviour
    /// clients of the marketplace already depend on.
    pub fn http_status(&self) -> u16 {
        match self {
            MarketError::Validation(_) => 400,
            MarketError::NotFound { .. } => 404,
            MarketError::Conflict(Conflict::NoChangeApplied(_)) => 400,
            MarketError::Conflict(_) => 409,
            MarketError::Auth(_) => 401,
            MarketError::DanglingReference(_) => 400,
            MarketError::Store(_) | MarketError::Internal(_) => 500,
        }
    }

    /// True for failures the caller cannot fix by changing the request
    pub fn is_internal(&self) -> bool {
        matches!(self, MarketError::Store(_) | MarketError::Internal(_))
    }
}
