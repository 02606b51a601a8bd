use std::sync::Arc;

use crate::error::{Conflict, Entity, MarketError, MarketResult};
use crate::models::vehicle::fields;
use crate::models::{Vehicle, VehicleDraft, VehicleLimits, VehiclePatch};
use crate::store::{
    Collection, DocumentStore, Filter, Projection, from_document, to_document,
};

use super::{on_duplicate, require_modified};

#[derive(Clone)]
pub struct VehicleRepository {
    store: Arc<dyn DocumentStore>,
    limits: VehicleLimits,
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn DocumentStore>, limits: VehicleLimits) -> Self {
        Self { store, limits }
    }

    fn by_plate(plate: &str) -> Filter {
        Filter::eq(fields::PLATE, plate)
    }

    fn duplicate(plate: &str) -> Conflict {
        Conflict::DuplicateKey {
            entity: Entity::Vehicle,
            key: plate.to_string(),
        }
    }

    async fn exists(&self, plate: &str) -> MarketResult<bool> {
        let found = self
            .store
            .find_one(Collection::Vehicles, &Self::by_plate(plate), &Projection::only(&[]))
            .await?;
        Ok(found.is_some())
    }

    /// Vehicles matching `filter`; an empty result is not an error
    pub async fn search(&self, filter: &Filter) -> MarketResult<Vec<Vehicle>> {
        tracing::debug!("[VEHICLES] Search {}", filter.to_document());
        let documents = self
            .store
            .find_many(Collection::Vehicles, filter, &Projection::ExcludeId)
            .await?;
        documents
            .into_iter()
            .map(|d| from_document(d).map_err(MarketError::from))
            .collect()
    }

    pub async fn get(&self, plate: &str) -> MarketResult<Vehicle> {
        let document = self
            .store
            .find_one(Collection::Vehicles, &Self::by_plate(plate), &Projection::ExcludeId)
            .await?
            .ok_or_else(|| MarketError::not_found(Entity::Vehicle, plate))?;
        Ok(from_document(document)?)
    }

    pub async fn create(&self, draft: VehicleDraft) -> MarketResult<Vehicle> {
        let vehicle = draft.validate(&self.limits)?;
        if self.exists(&vehicle.plate).await? {
            return Err(Self::duplicate(&vehicle.plate).into());
        }

        self.store
            .insert_one(Collection::Vehicles, to_document(&vehicle)?)
            .await
            .map_err(|e| on_duplicate(e, || Self::duplicate(&vehicle.plate)))?;
        tracing::info!("[VEHICLES] Created {}", vehicle.plate);
        Ok(vehicle)
    }

    pub async fn update(&self, plate: &str, patch: VehiclePatch) -> MarketResult<()> {
        let changes = patch.validate(&self.limits)?;
        let new_plate = changes.plate.clone().filter(|p| p != plate);
        if let Some(new_plate) = &new_plate {
            if self.exists(new_plate).await? {
                return Err(Self::duplicate(new_plate).into());
            }
        }

        let outcome = self
            .store
            .update_one(
                Collection::Vehicles,
                &Self::by_plate(plate),
                changes.to_document()?,
            )
            .await
            .map_err(|e| {
                on_duplicate(e, || Self::duplicate(new_plate.as_deref().unwrap_or(plate)))
            })?;
        require_modified(outcome, Entity::Vehicle, plate)?;
        tracing::info!("[VEHICLES] Updated {}", plate);
        Ok(())
    }

    pub async fn delete(&self, plate: &str) -> MarketResult<()> {
        let deleted = self
            .store
            .delete_one(Collection::Vehicles, &Self::by_plate(plate))
            .await?;
        if deleted == 0 {
            return Err(MarketError::not_found(Entity::Vehicle, plate));
        }
        tracing::info!("[VEHICLES] Deleted {}", plate);
        Ok(())
    }
}
