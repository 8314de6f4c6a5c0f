//! API routes module

pub mod chat;
pub mod lessons;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::api::state::AppState;

type SharedState = Arc<AppState>;

async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions().len(),
    }))
}

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Lesson upsert and lookup
        .merge(lessons::router())
        // Chat
        .merge(chat::router())
        .route("/health", get(health))
}
