use std::sync::Arc;

use crate::error::{Conflict, Entity, MarketError, MarketResult};
use crate::guard::ReferentialGuard;
use crate::models::{Publication, PublicationInput, parse_publication_id};
use crate::store::{
    Collection, DocumentId, DocumentStore, Filter, ID_FIELD, Projection, from_document,
    to_document,
};

use super::{on_duplicate, require_modified};

#[derive(Clone)]
pub struct PublicationRepository {
    store: Arc<dyn DocumentStore>,
    guard: ReferentialGuard,
}

fn by_id(id: &DocumentId) -> Filter {
    Filter::eq(ID_FIELD, id.as_str())
}

fn duplicate(plate: Option<&str>) -> Conflict {
    Conflict::DuplicatePublicationForVehicle {
        plate: plate.unwrap_or_default().to_string(),
    }
}

impl PublicationRepository {
    pub fn new(store: Arc<dyn DocumentStore>, guard: ReferentialGuard) -> Self {
        Self { store, guard }
    }

    /// Every publication; an empty collection is `NotFound`
    pub async fn list(&self) -> MarketResult<Vec<Publication>> {
        let documents = self
            .store
            .find_many(Collection::Publications, &Filter::all(), &Projection::Full)
            .await?;
        if documents.is_empty() {
            return Err(MarketError::not_found(Entity::Publication, "*"));
        }
        documents
            .into_iter()
            .map(|d| from_document(d).map_err(MarketError::from))
            .collect()
    }

    pub async fn get(&self, raw_id: &str) -> MarketResult<Publication> {
        let id = parse_publication_id(raw_id)?;
        let document = self
            .store
            .find_one(Collection::Publications, &by_id(&id), &Projection::Full)
            .await?
            .ok_or_else(|| MarketError::not_found(Entity::Publication, raw_id))?;
        Ok(from_document(document)?)
    }

    pub async fn create(&self, input: PublicationInput) -> MarketResult<Publication> {
        self.guard
            .check_publication(input.plate.as_deref(), input.national_id.as_deref(), None)
            .await?;

        let id = self
            .store
            .insert_one(Collection::Publications, to_document(&input)?)
            .await
            .map_err(|e| on_duplicate(e, || duplicate(input.plate.as_deref())))?;
        tracing::info!(
            "[PUBLICATIONS] Created {} for vehicle {:?}",
            id,
            input.plate
        );
        Ok(Publication {
            id: id.to_string(),
            plate: input.plate,
            national_id: input.national_id,
            date: input.date,
        })
    }

    pub async fn update(&self, raw_id: &str, input: PublicationInput) -> MarketResult<()> {
        let id = parse_publication_id(raw_id)?;
        self.guard
            .check_publication(
                input.plate.as_deref(),
                input.national_id.as_deref(),
                Some(&id),
            )
            .await?;

        let outcome = self
            .store
            .update_one(Collection::Publications, &by_id(&id), to_document(&input)?)
            .await
            .map_err(|e| on_duplicate(e, || duplicate(input.plate.as_deref())))?;
        require_modified(outcome, Entity::Publication, raw_id)?;
        tracing::info!("[PUBLICATIONS] Updated {}", id);
        Ok(())
    }

    pub async fn delete(&self, raw_id: &str) -> MarketResult<()> {
        let id = parse_publication_id(raw_id)?;
        let deleted = self
            .store
            .delete_one(Collection::Publications, &by_id(&id))
            .await?;
        if deleted == 0 {
            return Err(MarketError::not_found(Entity::Publication, raw_id));
        }
        tracing::info!("[PUBLICATIONS] Deleted {}", id);
        Ok(())
    }
}
