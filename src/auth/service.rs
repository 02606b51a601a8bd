use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PasswordManager, TokenAuthenticator};
use crate::error::{AuthFailure, MarketResult, ValidationError};
use crate::repository::UserRepository;

/// User Login Request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
    #[schema(example = "s3cret")]
    pub password: Option<String>,
}

/// Login result: bearer token for the user identified by `nationalId`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[schema(example = "12345678A")]
    pub national_id: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    passwords: PasswordManager,
    tokens: Arc<TokenAuthenticator>,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        passwords: PasswordManager,
        tokens: Arc<TokenAuthenticator>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Verify credentials and issue a fresh token
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> MarketResult<LoginResponse> {
        let email = req
            .email
            .filter(|e| !e.is_empty())
            .ok_or(ValidationError::MissingField { field: "email" })?;
        let password = req
            .password
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingField { field: "password" })?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!("[AUTH] Login failed: unknown email");
            return Err(AuthFailure::InvalidCredentials.into());
        };
        if !self.passwords.verify(&password, &user.password_hash) {
            tracing::info!("[AUTH] Login failed for {}", user.national_id);
            return Err(AuthFailure::InvalidCredentials.into());
        }

        let issued = self.tokens.issue(&user.national_id)?;
        tracing::info!("[AUTH] Issued token for {}", user.national_id);
        Ok(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            national_id: user.national_id,
        })
    }
}
