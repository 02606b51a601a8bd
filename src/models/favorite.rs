//! A user's bookmark of a vehicle; unique per (nationalId, plate)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

pub mod fields {
    pub const NATIONAL_ID: &str = "nationalId";
    pub const PLATE: &str = "plate";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[schema(example = "12345678A")]
    pub national_id: String,
    #[schema(example = "1234ABC")]
    pub plate: String,
}

/// Body of favorite create and delete requests
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub national_id: Option<String>,
    pub plate: Option<String>,
}

impl FavoriteRequest {
    /// Both identifiers must be present and non-empty
    pub fn into_favorite(self) -> Result<Favorite, ValidationError> {
        match (self.national_id, self.plate) {
            (Some(national_id), Some(plate)) if !national_id.is_empty() && !plate.is_empty() => {
                Ok(Favorite { national_id, plate })
            }
            _ => Err(ValidationError::MissingIdentifiers),
        }
    }
}
