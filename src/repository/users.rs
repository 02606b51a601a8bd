use std::sync::Arc;

use crate::auth::PasswordManager;
use crate::error::{Conflict, Entity, MarketError, MarketResult};
use crate::models::user::fields;
use crate::models::{NewUser, UserChanges, UserContact, UserPatch, UserProfile, UserRecord};
use crate::store::{
    Collection, DocumentStore, Filter, Projection, from_document, to_document,
};

use super::{on_duplicate, require_modified};

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    passwords: PasswordManager,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>, passwords: PasswordManager) -> Self {
        Self { store, passwords }
    }

    fn by_national_id(national_id: &str) -> Filter {
        Filter::eq(fields::NATIONAL_ID, national_id)
    }

    fn duplicate(national_id: &str) -> Conflict {
        Conflict::DuplicateKey {
            entity: Entity::User,
            key: national_id.to_string(),
        }
    }

    async fn exists(&self, national_id: &str) -> MarketResult<bool> {
        let found = self
            .store
            .find_one(
                Collection::Users,
                &Self::by_national_id(national_id),
                &Projection::only(&[]),
            )
            .await?;
        Ok(found.is_some())
    }

    /// Register a user; the response never carries the hash
    pub async fn create(&self, new_user: NewUser) -> MarketResult<UserProfile> {
        let checked = new_user.check()?;
        if self.exists(&checked.national_id).await? {
            return Err(Self::duplicate(&checked.national_id).into());
        }

        let password_hash = self.passwords.hash(&checked.password)?;
        let record = checked.into_record(password_hash);
        self.store
            .insert_one(Collection::Users, to_document(&record)?)
            .await
            .map_err(|e| on_duplicate(e, || Self::duplicate(&record.national_id)))?;
        tracing::info!("[USERS] Registered {}", record.national_id);
        Ok(record.into())
    }

    /// Public contact card: name, email and phone only
    pub async fn contact(&self, national_id: &str) -> MarketResult<UserContact> {
        let document = self
            .store
            .find_one(
                Collection::Users,
                &Self::by_national_id(national_id),
                &Projection::only(&[fields::NAME, fields::EMAIL, fields::PHONE]),
            )
            .await?
            .ok_or_else(|| MarketError::not_found(Entity::User, national_id))?;
        Ok(from_document(document)?)
    }

    pub async fn profile(&self, national_id: &str) -> MarketResult<UserProfile> {
        self.record(national_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| MarketError::not_found(Entity::User, national_id))
    }

    async fn record(&self, national_id: &str) -> MarketResult<Option<UserRecord>> {
        let document = self
            .store
            .find_one(
                Collection::Users,
                &Self::by_national_id(national_id),
                &Projection::ExcludeId,
            )
            .await?;
        Ok(document.map(from_document).transpose()?)
    }

    /// Stored record for login, looked up by email
    pub async fn find_by_email(&self, email: &str) -> MarketResult<Option<UserRecord>> {
        let document = self
            .store
            .find_one(
                Collection::Users,
                &Filter::eq(fields::EMAIL, email),
                &Projection::ExcludeId,
            )
            .await?;
        Ok(document.map(from_document).transpose()?)
    }

    pub async fn update(&self, national_id: &str, patch: UserPatch) -> MarketResult<()> {
        patch.check()?;
        let new_id = patch.national_id.clone().filter(|id| id != national_id);
        if let Some(new_id) = &new_id {
            if self.exists(new_id).await? {
                return Err(Self::duplicate(new_id).into());
            }
        }

        let password_hash = patch
            .password
            .as_deref()
            .map(|p| self.passwords.hash(p))
            .transpose()?;
        let changes = UserChanges {
            national_id: patch.national_id,
            name: patch.name,
            email: patch.email,
            phone: patch.phone,
            password_hash,
        };

        let outcome = self
            .store
            .update_one(
                Collection::Users,
                &Self::by_national_id(national_id),
                to_document(&changes)?,
            )
            .await
            .map_err(|e| {
                on_duplicate(e, || Self::duplicate(new_id.as_deref().unwrap_or(national_id)))
            })?;
        require_modified(outcome, Entity::User, national_id)?;
        tracing::info!("[USERS] Updated {}", national_id);
        Ok(())
    }

    pub async fn delete(&self, national_id: &str) -> MarketResult<()> {
        let deleted = self
            .store
            .delete_one(Collection::Users, &Self::by_national_id(national_id))
            .await?;
        if deleted == 0 {
            return Err(MarketError::not_found(Entity::User, national_id));
        }
        tracing::info!("[USERS] Deleted {}", national_id);
        Ok(())
    }
}
