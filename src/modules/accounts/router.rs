use axum::{Router, routing::get};

use super::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(handlers::get_me))
}
