use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;

use crate::auth::{AuthService, PasswordManager, TokenAuthenticator};
use crate::config::AppConfig;
use crate::error::MarketResult;
use crate::images::ImageStore;
use crate::repository::Marketplace;
use crate::store::DocumentStore;

/// Gateway application state (shared, immutable after start-up)
#[derive(Clone)]
pub struct AppState {
    pub market: Marketplace,
    pub auth: AuthService,
    pub tokens: Arc<TokenAuthenticator>,
    pub images: ImageStore,
}

impl AppState {
    /// Wire repositories, auth and image storage from configuration
    pub async fn build(
        config: &AppConfig,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> MarketResult<Self> {
        let passwords = PasswordManager;
        let market = Marketplace::open(store, config.vehicle_limits, passwords).await?;
        let tokens = Arc::new(TokenAuthenticator::new(
            &config.auth.jwt_secret,
            Duration::hours(config.auth.token_ttl_hours),
            clock,
        ));
        let auth = AuthService::new(market.users.clone(), passwords, tokens.clone());
        Ok(Self {
            market,
            auth,
            tokens,
            images: ImageStore::new(&config.images),
        })
    }
}
