//! JSON body extractor that reports bad bodies in the API envelope
//!
//! axum's `Json` answers 400/415/422 with a plain-text body. [`ValidJson`]
//! turns every rejection into a `ValidationError::MalformedBody`, so clients
//! always get the same 400 response shape.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::{MarketError, ValidationError};
use crate::gateway::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::from(MarketError::from(ValidationError::MalformedBody(
                rejection.body_text(),
            )))
        })?;
        Ok(ValidJson(value))
    }
}
