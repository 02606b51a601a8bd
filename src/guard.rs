//! Referential integrity checks for publications and favorites
//!
//! These are pre-checks for precise error reporting. Uniqueness is also
//! enforced by the store's unique indexes, which close the check-then-act gap.

use std::sync::Arc;

use crate::error::{Conflict, DanglingReference, MarketResult};
use crate::models::{Favorite, FavoriteRequest, favorite, publication, user, vehicle};
use crate::store::{Collection, DocumentId, DocumentStore, Filter, ID_FIELD, Projection};

#[derive(Clone)]
pub struct ReferentialGuard {
    store: Arc<dyn DocumentStore>,
}

impl ReferentialGuard {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn exists(&self, collection: Collection, filter: Filter) -> MarketResult<bool> {
        let found = self
            .store
            .find_one(collection, &filter, &Projection::only(&[]))
            .await?;
        Ok(found.is_some())
    }

    async fn vehicle_exists(&self, plate: Option<&str>) -> MarketResult<bool> {
        match plate {
            Some(plate) => {
                self.exists(Collection::Vehicles, Filter::eq(vehicle::fields::PLATE, plate))
                    .await
            }
            None => Ok(true),
        }
    }

    async fn user_exists(&self, national_id: Option<&str>) -> MarketResult<bool> {
        match national_id {
            Some(id) => {
                self.exists(Collection::Users, Filter::eq(user::fields::NATIONAL_ID, id))
                    .await
            }
            None => Ok(true),
        }
    }

    async fn plate_published(
        &self,
        plate: Option<&str>,
        exclude: Option<&DocumentId>,
    ) -> MarketResult<bool> {
        let Some(plate) = plate else {
            return Ok(false);
        };
        let mut filter = Filter::eq(publication::fields::PLATE, plate);
        if let Some(id) = exclude {
            filter = filter.and_ne(ID_FIELD, id.as_str());
        }
        self.exists(Collection::Publications, filter).await
    }

    /// Validate the references of a publication write
    ///
    /// Runs all lookups concurrently and reports the first failure in the order
    /// vehicle, user, duplicate publication. `exclude` is the publication being
    /// updated, if any.
    pub async fn check_publication(
        &self,
        plate: Option<&str>,
        national_id: Option<&str>,
        exclude: Option<&DocumentId>,
    ) -> MarketResult<()> {
        let (vehicle, user, published) = tokio::join!(
            self.vehicle_exists(plate),
            self.user_exists(national_id),
            self.plate_published(plate, exclude),
        );

        if !vehicle? {
            return Err(DanglingReference::Vehicle(plate.unwrap_or_default().to_string()).into());
        }
        if !user? {
            return Err(
                DanglingReference::User(national_id.unwrap_or_default().to_string()).into(),
            );
        }
        if published? {
            return Err(Conflict::DuplicatePublicationForVehicle {
                plate: plate.unwrap_or_default().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Reject a favorite whose pair is incomplete or already stored
    pub async fn check_favorite(&self, request: FavoriteRequest) -> MarketResult<Favorite> {
        let favorite = request.into_favorite()?;
        let pair = Filter::eq(favorite::fields::NATIONAL_ID, favorite.national_id.as_str())
            .and_eq(favorite::fields::PLATE, favorite.plate.as_str());
        if self.exists(Collection::Favorites, pair).await? {
            return Err(Conflict::DuplicateFavorite {
                national_id: favorite.national_id,
                plate: favorite.plate,
            }
            .into());
        }
        Ok(favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::store::MemoryStore;
    use serde_json::{Value, json};

    async fn seeded() -> (Arc<MemoryStore>, ReferentialGuard) {
        let store = Arc::new(MemoryStore::new());
        let insert = |collection, value: Value| {
            let store = store.clone();
            async move {
                let Value::Object(document) = value else {
                    unreachable!("test documents are objects")
                };
                store.insert_one(collection, document).await.unwrap()
            }
        };
        insert(Collection::Vehicles, json!({"plate": "1234ABC"})).await;
        insert(Collection::Vehicles, json!({"plate": "5678DEF"})).await;
        insert(Collection::Users, json!({"nationalId": "12345678A"})).await;
        insert(
            Collection::Publications,
            json!({"plate": "1234ABC", "nationalId": "12345678A"}),
        )
        .await;
        insert(
            Collection::Favorites,
            json!({"nationalId": "12345678A", "plate": "1234ABC"}),
        )
        .await;
        let guard = ReferentialGuard::new(store.clone());
        (store, guard)
    }

    #[tokio::test]
    async fn test_publication_with_valid_references() {
        let (_, guard) = seeded().await;
        guard
            .check_publication(Some("5678DEF"), Some("12345678A"), None)
            .await
            .unwrap();
        guard.check_publication(None, None, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_vehicle_reported_before_user() {
        let (_, guard) = seeded().await;
        let err = guard
            .check_publication(Some("0000ZZZ"), Some("nobody"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::DanglingReference(DanglingReference::Vehicle(ref p)) if p == "0000ZZZ"
        ));

        let err = guard
            .check_publication(Some("5678DEF"), Some("nobody"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DANGLING_USER_REFERENCE");
    }

    #[tokio::test]
    async fn test_duplicate_publication_excludes_self() {
        let (store, guard) = seeded().await;
        let err = guard
            .check_publication(Some("1234ABC"), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_PUBLICATION_FOR_VEHICLE");

        let existing = store
            .find_one(
                Collection::Publications,
                &Filter::eq("plate", "1234ABC"),
                &Projection::Full,
            )
            .await
            .unwrap()
            .unwrap();
        let id = DocumentId::parse(existing[ID_FIELD].as_str().unwrap()).unwrap();
        guard
            .check_publication(Some("1234ABC"), None, Some(&id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_favorite_checks() {
        let (_, guard) = seeded().await;
        let pair = |nid: &str, plate: Option<&str>| FavoriteRequest {
            national_id: Some(nid.to_string()),
            plate: plate.map(str::to_string),
        };

        let err = guard.check_favorite(pair("12345678A", None)).await.unwrap_err();
        assert_eq!(err.code(), "MISSING_IDENTIFIERS");

        let err = guard
            .check_favorite(pair("12345678A", Some("")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MISSING_IDENTIFIERS");

        let err = guard
            .check_favorite(pair("12345678A", Some("1234ABC")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_FAVORITE");

        let favorite = guard
            .check_favorite(pair("12345678A", Some("5678DEF")))
            .await
            .unwrap();
        assert_eq!(favorite.plate, "5678DEF");
    }
}
