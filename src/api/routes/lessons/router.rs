//! Router for the lessons API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::core::LessonError;
use crate::lessons::{NewLesson, upsert_lesson};

type SharedState = Arc<AppState>;

/// Embed a lesson and store it in the vector index
async fn upsert_lesson_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::UpsertLessonRequest>, JsonRejection>,
) -> Result<Json<public::UpsertLessonResponse>, ApiError> {
    let Json(payload) = payload?;
    let lesson = NewLesson::from_parts(payload.id, payload.content, payload.metadata)?;

    let id = upsert_lesson(
        state.embedder.as_ref(),
        state.store.as_ref(),
        &state.config.namespace,
        lesson,
    )
    .await?;

    Ok(Json(public::UpsertLessonResponse::new(&id)))
}

/// Look up a stored lesson by ID
async fn view_lesson(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<public::LessonResponse>, ApiError> {
    let record = state
        .store
        .fetch(&id, &state.config.namespace)
        .await
        .map_err(LessonError::storage)?
        .ok_or_else(|| LessonError::NotFound(format!("Lesson {} not found", id)))?;

    Ok(Json(public::LessonResponse {
        id: record.id,
        metadata: record.metadata,
    }))
}

/// Create the lessons router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/upsert-lesson", post(upsert_lesson_handler))
        .route("/lessons/{id}", get(view_lesson))
}
