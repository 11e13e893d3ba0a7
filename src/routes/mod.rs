// src/routes/mod.rs
pub mod chat;
pub mod page;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{chat_handler, end_session_handler, transcript_handler};
use page::{index_handler, submit_handler};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/chat", post(chat_handler))
        .route(
            "/chat/{session_id}",
            get(transcript_handler).delete(end_session_handler),
        )
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
}
