//! Publications link a vehicle to the user selling it

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::store::DocumentId;

pub mod fields {
    pub const PLATE: &str = "plate";
    pub const NATIONAL_ID: &str = "nationalId";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Store-assigned id
    #[serde(alias = "_id")]
    #[schema(example = "01HZX3K6Q2W8V9B7N5M4C3D2E1")]
    pub id: String,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2024-05-01T10:00:00")]
    pub date: Option<NaiveDateTime>,
}

/// Body of publication create and update requests
///
/// Absent fields are left out of the stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDateTime>,
}

/// Parse a publication id from a path segment
pub fn parse_publication_id(raw: &str) -> Result<DocumentId, ValidationError> {
    DocumentId::parse(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: format!("'{}' is not a valid publication id", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publication_reads_store_id() {
        let publication: Publication = serde_json::from_value(json!({
            "_id": "01HZX3K6Q2W8V9B7N5M4C3D2E1",
            "plate": "1234ABC",
            "nationalId": "12345678A",
            "date": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(publication.id, "01HZX3K6Q2W8V9B7N5M4C3D2E1");

        let out = serde_json::to_value(&publication).unwrap();
        assert!(out.get("_id").is_none());
        assert_eq!(out["id"], "01HZX3K6Q2W8V9B7N5M4C3D2E1");
    }

    #[test]
    fn test_input_omits_absent_fields() {
        let input = PublicationInput {
            plate: Some("1234ABC".into()),
            ..PublicationInput::default()
        };
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"plate": "1234ABC"}));
    }

    #[test]
    fn test_malformed_id() {
        let err = parse_publication_id("42").unwrap_err();
        assert_eq!(err.field(), Some("id"));
        assert!(parse_publication_id("01HZX3K6Q2W8V9B7N5M4C3D2E1").is_ok());
    }
}
