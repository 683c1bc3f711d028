use super::handlers;
use crate::shared::state::AppState;
use axum::{Router, routing::get};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:provider/login", get(handlers::login))
        .route("/:provider/callback", get(handlers::callback))
}
