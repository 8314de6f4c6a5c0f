//! Router for the chat API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use super::public;
use crate::ai::DEFAULT_USER_ID;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::core::LessonError;
use crate::lessons::LessonFilter;

type SharedState = Arc<AppState>;

/// Answer the latest message in a conversation, scoped to the
/// requested lessons
async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::ChatRequest>, JsonRejection>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let Json(payload) = payload?;

    let messages = payload.messages.unwrap_or_default();
    let input = match messages.last() {
        None => {
            return Err(LessonError::Validation("Messages are required".to_string()).into());
        }
        Some(public::ChatMessage {
            content: Some(content),
            ..
        }) if !content.is_empty() => content.clone(),
        Some(_) => {
            return Err(LessonError::Validation(
                "The last message must have content".to_string(),
            )
            .into());
        }
    };

    let user_id = payload
        .user_id
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
    let filter = LessonFilter::from_lesson_ids(&payload.lesson_ids.unwrap_or_default());

    tracing::debug!(
        "Chat turn for user {} with filter {:?}",
        user_id,
        filter.as_ref().map(|f| f.ids())
    );

    let outcome = state
        .tutor
        .chat_turn(&user_id, &input, filter.clone())
        .await?;

    Ok(Json(public::ChatResponse {
        response: outcome.response,
        debug: public::ChatDebug {
            used_retrieval: outcome.used_retrieval,
            applied_filter: filter,
        },
    }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/chat", post(chat_handler))
}
