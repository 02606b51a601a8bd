use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::MarketError;
use crate::gateway::{error::ApiError, state::AppState};

/// Reject requests without a valid bearer token; otherwise attach the
/// [`super::Principal`] to the request extensions
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let principal = state.tokens.authenticate(auth_header).map_err(|failure| {
        tracing::debug!(
            "[AUTH] Rejected {} {}: {}",
            request.method(),
            request.uri().path(),
            failure
        );
        ApiError::from(MarketError::from(failure))
    })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
