// src/routes/mod.rs
pub mod messages;

use crate::state::SharedState;
use axum::{Router, routing::get};
use messages::{list_messages_handler, post_message_handler};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/messages", get(list_messages_handler).post(post_message_handler))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
