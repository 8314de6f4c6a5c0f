//! Public types for the lessons API
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `id` and `content` are loosely typed here so that a wrong type is
/// reported as a validation error rather than a parse failure.
#[derive(Deserialize, Serialize, Default)]
pub struct UpsertLessonRequest {
    pub id: Option<Value>,
    pub content: Option<Value>,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Serialize, Deserialize)]
pub struct UpsertLessonResponse {
    pub message: String,
    pub id: String,
}

impl UpsertLessonResponse {
    pub fn new(id: &str) -> Self {
        Self {
            message: format!("Lesson {} upserted successfully", id),
            id: id.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct LessonResponse {
    pub id: String,
    pub metadata: Map<String, Value>,
}
