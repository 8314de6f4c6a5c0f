use chrono::Utc;
use serde_json::{Map, Number, Value};

use super::record::{LessonRecord, build_metadata, clean_content, generate_lesson_id};
use crate::core::LessonError;
use crate::openai::Embedder;
use crate::pinecone::VectorStore;

/// A validated lesson ready to be embedded and stored.
#[derive(Clone, Debug, Default)]
pub struct NewLesson {
    pub id: Option<String>,
    pub content: String,
    pub metadata: Map<String, Value>,
}

impl NewLesson {
    /// Validates the loosely typed fields of an upsert request.
    ///
    /// `id` may be a string or a number (numbers are stored as their
    /// string form). `content` must be a non-empty string.
    pub fn from_parts(
        id: Option<Value>,
        content: Option<Value>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<Self, LessonError> {
        let content = match content {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(LessonError::Validation(
                    "Content is required and must be a non-empty string".to_string(),
                ));
            }
            Some(_) => {
                return Err(LessonError::Validation(
                    "Content must be a string".to_string(),
                ));
            }
        };

        let id = match id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(number_id(&n)),
            Some(_) => {
                return Err(LessonError::Validation(
                    "Id must be a string or a number".to_string(),
                ));
            }
        };

        Ok(Self {
            id,
            content,
            metadata: metadata.unwrap_or_default(),
        })
    }
}

// Whole numbers read as floats (`1001.0`, `1e3`) lose the fraction so
// they match the same ID given as an integer.
fn number_id(n: &Number) -> String {
    n.as_f64()
        .filter(|f| !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 2f64.powi(53))
        .map(|f| (f as i64).to_string())
        .unwrap_or_else(|| n.to_string())
}

/// Embeds a lesson and writes it to the vector store, returning the
/// ID the lesson was stored under.
pub async fn upsert_lesson(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    namespace: &str,
    lesson: NewLesson,
) -> Result<String, LessonError> {
    let NewLesson {
        id,
        content,
        metadata,
    } = lesson;

    let cleaned = clean_content(&content);
    if cleaned.is_empty() {
        return Err(LessonError::Embedding(
            "Content is empty after removing whitespace".to_string(),
        ));
    }

    let values = embedder
        .embed(&cleaned)
        .await
        .map_err(LessonError::embedding)?;

    let id = id.unwrap_or_else(generate_lesson_id);
    let metadata = build_metadata(&content, &id, metadata, Utc::now());
    let record = LessonRecord {
        id: id.clone(),
        values,
        metadata,
    };

    store
        .upsert(record, namespace)
        .await
        .map_err(LessonError::storage)?;

    tracing::info!("Upserted lesson {} ({} chars)", id, content.len());
    Ok(id)
}
