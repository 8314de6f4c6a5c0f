//! Public API types

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::core::LessonError;

// Errors

#[derive(Debug)]
pub struct ApiError(LessonError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            LessonError::Validation(_) => StatusCode::BAD_REQUEST,
            LessonError::NotFound(_) => StatusCode::NOT_FOUND,
            LessonError::Embedding(_) | LessonError::Storage(_) | LessonError::Agent(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        } else {
            tracing::warn!("{}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<LessonError> for ApiError {
    fn from(err: LessonError) -> Self {
        Self(err)
    }
}

/// Malformed request bodies are a client error regardless of which
/// part of the body failed to parse.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(LessonError::Validation(rejection.body_text()))
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod lessons {
    pub use crate::api::routes::lessons::public::*;
}
