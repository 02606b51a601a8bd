//! Entity repositories over a [`DocumentStore`]
//!
//! [`Marketplace`] bundles one repository per collection and declares the
//! unique indexes they rely on when it is opened.

pub mod favorites;
pub mod publications;
pub mod users;
pub mod vehicles;

use std::sync::Arc;

use crate::auth::PasswordManager;
use crate::error::{Conflict, Entity, MarketError, MarketResult};
use crate::guard::ReferentialGuard;
use crate::models::{VehicleLimits, favorite, publication, user, vehicle};
use crate::store::{Collection, DocumentStore, StoreError, UpdateOutcome};

pub use favorites::FavoriteRepository;
pub use publications::PublicationRepository;
pub use users::UserRepository;
pub use vehicles::VehicleRepository;

/// Unique indexes backing the marketplace invariants
const UNIQUE_INDEXES: &[(Collection, &[&str])] = &[
    (Collection::Vehicles, &[vehicle::fields::PLATE]),
    (Collection::Users, &[user::fields::NATIONAL_ID]),
    (Collection::Publications, &[publication::fields::PLATE]),
    (
        Collection::Favorites,
        &[favorite::fields::NATIONAL_ID, favorite::fields::PLATE],
    ),
];

#[derive(Clone)]
pub struct Marketplace {
    pub vehicles: VehicleRepository,
    pub users: UserRepository,
    pub publications: PublicationRepository,
    pub favorites: FavoriteRepository,
    store: Arc<dyn DocumentStore>,
}

impl Marketplace {
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        limits: VehicleLimits,
        passwords: PasswordManager,
    ) -> MarketResult<Self> {
        for (collection, fields) in UNIQUE_INDEXES {
            store.ensure_unique_index(*collection, fields).await?;
        }
        tracing::info!(
            "[STORE] Unique indexes ready on {} collections",
            UNIQUE_INDEXES.len()
        );

        let guard = ReferentialGuard::new(store.clone());
        Ok(Self {
            vehicles: VehicleRepository::new(store.clone(), limits),
            users: UserRepository::new(store.clone(), passwords),
            publications: PublicationRepository::new(store.clone(), guard.clone()),
            favorites: FavoriteRepository::new(store.clone(), guard),
            store,
        })
    }

    pub async fn ping(&self) -> MarketResult<()> {
        Ok(self.store.ping().await?)
    }
}

/// Map an update outcome: nothing matched is `NotFound`, nothing changed is
/// `NoChangeApplied`
pub(crate) fn require_modified(
    outcome: UpdateOutcome,
    entity: Entity,
    key: &str,
) -> MarketResult<()> {
    if outcome.matched == 0 {
        return Err(MarketError::not_found(entity, key));
    }
    if outcome.modified == 0 {
        return Err(Conflict::NoChangeApplied(entity).into());
    }
    Ok(())
}

/// Translate a unique-index violation into the conflict a pre-check would report
pub(crate) fn on_duplicate(err: StoreError, conflict: impl FnOnce() -> Conflict) -> MarketError {
    match err {
        StoreError::DuplicateKey { collection, .. } => {
            tracing::warn!("[STORE] Unique index rejected write to {}", collection);
            conflict().into()
        }
        other => other.into(),
    }
}
