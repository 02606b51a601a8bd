//! Document store abstraction
//!
//! The marketplace talks to its storage through [`DocumentStore`]: a
//! collection-scoped find/insert/update/delete contract returning match and
//! modify counts. Documents are JSON objects; the store owns the `_id` field.
//!
//! ```text
//! ┌────────────────────┐     Filter / Projection     ┌──────────────────┐
//! │ Repositories/Guard │ ──────────────────────────▶ │  DocumentStore   │
//! └────────────────────┘ ◀────────────────────────── │  (MemoryStore)   │
//!                          Document / UpdateOutcome  └──────────────────┘
//! ```

pub mod filter;
pub mod memory;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub use filter::{Condition, Filter, Projection};
pub use memory::MemoryStore;

/// Internal storage identity field
pub const ID_FIELD: &str = "_id";

/// A stored document: a JSON object
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Collections known to the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Vehicles,
    Users,
    Publications,
    Favorites,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Vehicles => "vehicles",
            Collection::Users => "users",
            Collection::Publications => "publications",
            Collection::Favorites => "favorites",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-generated document id (ULID text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Parse a caller-supplied id, rejecting anything that is not a ULID
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<ulid::Ulid>()
            .ok()
            .map(|ulid| Self(ulid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of `update_one`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key in {collection} for unique index ({})", fields.join(", "))]
    DuplicateKey {
        collection: Collection,
        fields: Vec<String>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: &Projection,
    ) -> StoreResult<Option<Document>>;

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: &Projection,
    ) -> StoreResult<Vec<Document>>;

    async fn insert_one(&self, collection: Collection, document: Document)
    -> StoreResult<DocumentId>;

    /// Merge `patch` into the first document matching `filter` (`$set` semantics)
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> StoreResult<UpdateOutcome>;

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    /// Declare a unique index over `fields`. Documents missing any of the
    /// fields are not indexed.
    async fn ensure_unique_index(&self, collection: Collection, fields: &[&str])
    -> StoreResult<()>;

    /// Cheap liveness probe
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Serialize a typed value into a document
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Deserialize a document into a typed value
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_roundtrip() {
        let id = DocumentId::generate();
        assert_eq!(DocumentId::parse(id.as_str()), Some(id));
        assert_eq!(DocumentId::parse("not-an-id"), None);
    }

    #[test]
    fn test_to_document_rejects_scalars() {
        assert!(matches!(to_document(&42), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn test_duplicate_key_message() {
        let err = StoreError::DuplicateKey {
            collection: Collection::Favorites,
            fields: vec!["nationalId".into(), "plate".into()],
        };
        assert_eq!(
            err.to_string(),
            "Duplicate key in favorites for unique index (nationalId, plate)"
        );
    }
}
