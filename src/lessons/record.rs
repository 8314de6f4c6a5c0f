use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Metadata key holding the original lesson text.
pub const CONTENT_KEY: &str = "content";
/// Metadata key holding the lesson ID so retrieval can filter on it.
pub const ID_KEY: &str = "id";
/// Metadata key holding the time the record was written.
pub const LAST_UPDATED_KEY: &str = "lastUpdated";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl LessonRecord {
    /// The original lesson text stored alongside the vector.
    pub fn content(&self) -> Option<&str> {
        self.metadata.get(CONTENT_KEY).and_then(Value::as_str)
    }
}

/// Collapses runs of whitespace into a single space and trims the
/// ends. This is the text that gets embedded.
pub fn clean_content(content: &str) -> String {
    WHITESPACE.replace_all(content, " ").trim().to_string()
}

pub fn generate_lesson_id() -> String {
    Uuid::new_v4().to_string()
}

/// Merges caller supplied metadata with the reserved keys. The
/// reserved keys always win on conflict.
pub fn build_metadata(
    content: &str,
    lesson_id: &str,
    caller_metadata: Map<String, Value>,
    written_at: DateTime<Utc>,
) -> Map<String, Value> {
    let mut metadata = caller_metadata;
    metadata.insert(CONTENT_KEY.to_string(), Value::from(content));
    metadata.insert(ID_KEY.to_string(), Value::from(lesson_id));
    metadata.insert(
        LAST_UPDATED_KEY.to_string(),
        Value::from(written_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    metadata
}
