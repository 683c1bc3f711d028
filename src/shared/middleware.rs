use axum::{extract::Request, middleware::Next, response::Response};

use crate::shared::cache::RequestCache;

/// Gives every request its own empty [`RequestCache`].
pub async fn request_cache(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(RequestCache::new());
    next.run(request).await
}
