//! In-memory document store
//!
//! Each collection lives behind one DashMap entry. Every write takes the entry's
//! shard lock for the whole check-and-write, so unique indexes are enforced
//! atomically even when requests race.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{
    Collection, Document, DocumentId, DocumentStore, Filter, ID_FIELD, Projection, StoreError,
    StoreResult, UpdateOutcome,
};

#[derive(Debug, Default)]
struct CollectionState {
    /// Documents in insertion order, each carrying its `_id`
    documents: Vec<Document>,
    unique_indexes: Vec<Vec<String>>,
}

impl CollectionState {
    /// Index key for `document`, or `None` when a field is absent (sparse index)
    fn index_key<'a>(document: &'a Document, fields: &[String]) -> Option<Vec<&'a Value>> {
        fields
            .iter()
            .map(|f| document.get(f).filter(|v| !v.is_null()))
            .collect()
    }

    /// First unique index `candidate` would violate, ignoring the document `skip_id`
    fn violated_index(&self, candidate: &Document, skip_id: Option<&Value>) -> Option<&Vec<String>> {
        self.unique_indexes.iter().find(|fields| {
            let Some(key) = Self::index_key(candidate, fields) else {
                return false;
            };
            self.documents.iter().any(|existing| {
                skip_id.is_none_or(|id| existing.get(ID_FIELD) != Some(id))
                    && Self::index_key(existing, fields).is_some_and(|other| other == key)
            })
        })
    }

    fn position(&self, filter: &Filter) -> Option<usize> {
        self.documents.iter().position(|d| filter.matches(d))
    }
}

/// Process-local [`DocumentStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<Collection, CollectionState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|state| state.documents.len())
            .unwrap_or(0)
    }

    fn insert_sync(&self, collection: Collection, mut document: Document) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut state = self.collections.entry(collection).or_default();
        if let Some(fields) = state.violated_index(&document, None) {
            return Err(StoreError::DuplicateKey {
                collection,
                fields: fields.clone(),
            });
        }
        state.documents.push(document);
        Ok(id)
    }

    fn update_sync(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> StoreResult<UpdateOutcome> {
        let mut state = self.collections.entry(collection).or_default();
        let Some(pos) = state.position(filter) else {
            return Ok(UpdateOutcome::default());
        };

        let current = &state.documents[pos];
        let mut merged = current.clone();
        for (field, value) in patch {
            if field != ID_FIELD {
                merged.insert(field, value);
            }
        }
        if &merged == current {
            return Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            });
        }

        if let Some(fields) = state.violated_index(&merged, merged.get(ID_FIELD)) {
            return Err(StoreError::DuplicateKey {
                collection,
                fields: fields.clone(),
            });
        }
        state.documents[pos] = merged;
        Ok(UpdateOutcome {
            matched: 1,
            modified: 1,
        })
    }

    fn delete_sync(&self, collection: Collection, filter: &Filter) -> u64 {
        let mut state = self.collections.entry(collection).or_default();
        match state.position(filter) {
            Some(pos) => {
                state.documents.remove(pos);
                1
            }
            None => 0,
        }
    }

    fn find_sync(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: &Projection,
        limit: Option<usize>,
    ) -> Vec<Document> {
        let Some(state) = self.collections.get(&collection) else {
            return Vec::new();
        };
        state
            .documents
            .iter()
            .filter(|d| filter.matches(d))
            .take(limit.unwrap_or(usize::MAX))
            .map(|d| projection.apply(d))
            .collect()
    }

    fn ensure_index_sync(&self, collection: Collection, fields: &[&str]) -> StoreResult<()> {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let mut state = self.collections.entry(collection).or_default();
        if state.unique_indexes.contains(&fields) {
            return Ok(());
        }

        let mut seen = Vec::new();
        for document in &state.documents {
            if let Some(key) = CollectionState::index_key(document, &fields) {
                if seen.contains(&key) {
                    return Err(StoreError::DuplicateKey { collection, fields });
                }
                seen.push(key);
            }
        }
        state.unique_indexes.push(fields);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: &Projection,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .find_sync(collection, filter, projection, Some(1))
            .into_iter()
            .next())
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        projection: &Projection,
    ) -> StoreResult<Vec<Document>> {
        Ok(self.find_sync(collection, filter, projection, None))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> StoreResult<DocumentId> {
        self.insert_sync(collection, document)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: Document,
    ) -> StoreResult<UpdateOutcome> {
        self.update_sync(collection, filter, patch)
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        Ok(self.delete_sync(collection, filter))
    }

    async fn ensure_unique_index(
        &self,
        collection: Collection,
        fields: &[&str],
    ) -> StoreResult<()> {
        self.ensure_index_sync(collection, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_find_hides_it() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Vehicles, doc(json!({"plate": "1234ABC"})))
            .await
            .unwrap();

        let full = store
            .find_one(Collection::Vehicles, &Filter::eq("plate", "1234ABC"), &Projection::Full)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full[ID_FIELD], id.as_str());

        let public = store
            .find_many(Collection::Vehicles, &Filter::all(), &Projection::ExcludeId)
            .await
            .unwrap();
        assert_eq!(public, vec![doc(json!({"plate": "1234ABC"}))]);
    }

    #[tokio::test]
    async fn test_update_reports_matched_and_modified() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Users, doc(json!({"nationalId": "1", "name": "Ana"})))
            .await
            .unwrap();

        let missing = store
            .update_one(Collection::Users, &Filter::eq("nationalId", "2"), doc(json!({"name": "X"})))
            .await
            .unwrap();
        assert_eq!(missing, UpdateOutcome { matched: 0, modified: 0 });

        let same = store
            .update_one(Collection::Users, &Filter::eq("nationalId", "1"), doc(json!({"name": "Ana"})))
            .await
            .unwrap();
        assert_eq!(same, UpdateOutcome { matched: 1, modified: 0 });

        let empty = store
            .update_one(Collection::Users, &Filter::eq("nationalId", "1"), Document::new())
            .await
            .unwrap();
        assert_eq!(empty, UpdateOutcome { matched: 1, modified: 0 });

        let changed = store
            .update_one(Collection::Users, &Filter::eq("nationalId", "1"), doc(json!({"name": "Eva"})))
            .await
            .unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });
    }

    #[tokio::test]
    async fn test_update_cannot_overwrite_id() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Publications, doc(json!({"plate": "A"})))
            .await
            .unwrap();
        let outcome = store
            .update_one(
                Collection::Publications,
                &Filter::eq(ID_FIELD, id.as_str()),
                doc(json!({"_id": "other"})),
            )
            .await
            .unwrap();
        assert_eq!(outcome.modified, 0);
    }

    #[tokio::test]
    async fn test_unique_index_rejects_insert_and_update() {
        let store = MemoryStore::new();
        store
            .ensure_unique_index(Collection::Vehicles, &["plate"])
            .await
            .unwrap();
        store
            .insert_one(Collection::Vehicles, doc(json!({"plate": "A"})))
            .await
            .unwrap();
        store
            .insert_one(Collection::Vehicles, doc(json!({"plate": "B"})))
            .await
            .unwrap();

        let dup = store
            .insert_one(Collection::Vehicles, doc(json!({"plate": "A"})))
            .await;
        assert!(matches!(dup, Err(StoreError::DuplicateKey { .. })));

        let rename = store
            .update_one(Collection::Vehicles, &Filter::eq("plate", "B"), doc(json!({"plate": "A"})))
            .await;
        assert!(matches!(rename, Err(StoreError::DuplicateKey { .. })));
        assert_eq!(store.count(Collection::Vehicles), 2);
    }

    #[tokio::test]
    async fn test_compound_index_is_sparse() {
        let store = MemoryStore::new();
        store
            .ensure_unique_index(Collection::Favorites, &["nationalId", "plate"])
            .await
            .unwrap();
        for value in [
            json!({"nationalId": "1", "plate": "A"}),
            json!({"nationalId": "1", "plate": "B"}),
            json!({"nationalId": "2", "plate": "A"}),
            json!({"nationalId": "3"}),
            json!({"nationalId": "3"}),
        ] {
            store
                .insert_one(Collection::Favorites, doc(value))
                .await
                .unwrap();
        }
        let dup = store
            .insert_one(Collection::Favorites, doc(json!({"nationalId": "1", "plate": "A"})))
            .await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_ensure_index_fails_on_existing_duplicates() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            store
                .insert_one(Collection::Users, doc(json!({"nationalId": "1"})))
                .await
                .unwrap();
        }
        let result = store
            .ensure_unique_index(Collection::Users, &["nationalId"])
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn test_delete_one() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Favorites, doc(json!({"nationalId": "1", "plate": "A"})))
            .await
            .unwrap();
        let filter = Filter::eq("nationalId", "1").and_eq("plate", "A");
        assert_eq!(store.delete_one(Collection::Favorites, &filter).await.unwrap(), 1);
        assert_eq!(store.delete_one(Collection::Favorites, &filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_respect_unique_index() {
        let store = Arc::new(MemoryStore::new());
        store
            .ensure_unique_index(Collection::Publications, &["plate"])
            .await
            .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert_one(Collection::Publications, doc(json!({"plate": "1234ABC"})))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(store.count(Collection::Publications), 1);
    }
}
