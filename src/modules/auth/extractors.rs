use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::service::{Claims, LinkService};
use crate::shared::{cache::RequestCache, error::AppError, state::AppState};

#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized(
                "Missing Authorization header".to_string(),
            ))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("Invalid token format".to_string()))?;

        LinkService::verify_session(&state.config, token)
    }
}

/// Reuses the cache installed by the request-cache middleware, or starts a
/// fresh one when the route is mounted without it.
#[async_trait]
impl<S> FromRequestParts<S> for RequestCache
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cache) = parts.extensions.get::<RequestCache>() {
            return Ok(cache.clone());
        }
        let cache = RequestCache::new();
        parts.extensions.insert(cache.clone());
        Ok(cache)
    }
}
