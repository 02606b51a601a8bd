//! Bearer token issue and verification (HS256 JWT)
//!
//! Expiry is checked against the injected [`Clock`] rather than by
//! `jsonwebtoken`, which would read the process clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::error::{AuthFailure, MarketError, MarketResult};

const BEARER: &str = "Bearer ";

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// National id of the user
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Identity of an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub national_id: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenAuthenticator {
    pub fn new(secret: &str, lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
            clock,
        }
    }

    pub fn issue(&self, subject: &str) -> MarketResult<IssuedToken> {
        let now = self.clock.utc();
        let expires_at = now + self.lifetime;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| MarketError::Internal(format!("Failed to generate token: {}", e)))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Authenticate the value of an `Authorization` header
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, AuthFailure> {
        let token = header
            .and_then(|h| h.strip_prefix(BEARER))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure::MissingOrMalformed)?;
        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthFailure> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!("[AUTH] Token rejected: {}", e);
            AuthFailure::Invalid
        })?;
        let claims = data.claims;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(AuthFailure::Expired);
        }
        Ok(Principal {
            national_id: claims.sub,
            expires_at: claims.exp,
        })
    }
}
