use std::sync::Arc;

use crate::error::{Conflict, Entity, MarketError, MarketResult};
use crate::guard::ReferentialGuard;
use crate::models::favorite::fields;
use crate::models::{Favorite, FavoriteRequest};
use crate::store::{Collection, DocumentStore, Filter, Projection, from_document, to_document};

use super::on_duplicate;

#[derive(Clone)]
pub struct FavoriteRepository {
    store: Arc<dyn DocumentStore>,
    guard: ReferentialGuard,
}

impl FavoriteRepository {
    pub fn new(store: Arc<dyn DocumentStore>, guard: ReferentialGuard) -> Self {
        Self { store, guard }
    }

    /// Favorites of one user; none at all is `NotFound`
    pub async fn list(&self, national_id: &str) -> MarketResult<Vec<Favorite>> {
        let documents = self
            .store
            .find_many(
                Collection::Favorites,
                &Filter::eq(fields::NATIONAL_ID, national_id),
                &Projection::ExcludeId,
            )
            .await?;
        if documents.is_empty() {
            return Err(MarketError::not_found(Entity::Favorite, national_id));
        }
        documents
            .into_iter()
            .map(|d| from_document(d).map_err(MarketError::from))
            .collect()
    }

    pub async fn add(&self, request: FavoriteRequest) -> MarketResult<Favorite> {
        let favorite = self.guard.check_favorite(request).await?;

        self.store
            .insert_one(Collection::Favorites, to_document(&favorite)?)
            .await
            .map_err(|e| {
                on_duplicate(e, || Conflict::DuplicateFavorite {
                    national_id: favorite.national_id.clone(),
                    plate: favorite.plate.clone(),
                })
            })?;
        tracing::info!(
            "[FAVORITES] {} bookmarked {}",
            favorite.national_id,
            favorite.plate
        );
        Ok(favorite)
    }

    pub async fn remove(&self, request: FavoriteRequest) -> MarketResult<()> {
        let favorite = request.into_favorite()?;
        let pair = Filter::eq(fields::NATIONAL_ID, favorite.national_id.as_str())
            .and_eq(fields::PLATE, favorite.plate.as_str());
        let deleted = self.store.delete_one(Collection::Favorites, &pair).await?;
        if deleted == 0 {
            return Err(MarketError::not_found(
                Entity::Favorite,
                format!("{}/{}", favorite.national_id, favorite.plate),
            ));
        }
        tracing::info!(
            "[FAVORITES] {} removed {}",
            favorite.national_id,
            favorite.plate
        );
        Ok(())
    }
}
