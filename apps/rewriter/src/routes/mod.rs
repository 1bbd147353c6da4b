pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::rewrite::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interactive page
        .route("/", get(handlers::handle_index))
        .route("/rewrite", post(handlers::handle_rewrite_form))
        // JSON API
        .route("/api/v1/rewrite", post(handlers::handle_rewrite_api))
        .with_state(state)
}
