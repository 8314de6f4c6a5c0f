//! Vector storage for lessons.
mod client;
pub use client::PineconeIndex;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lessons::{LessonFilter, LessonRecord};

/// A scored match returned from a similarity query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl QueryMatch {
    pub fn content(&self) -> Option<&str> {
        self.metadata
            .get(crate::lessons::CONTENT_KEY)
            .and_then(Value::as_str)
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Writes a single record, overwriting any record with the same ID.
    async fn upsert(&self, record: LessonRecord, namespace: &str) -> Result<(), Error>;

    /// Returns the `top_k` records closest to `vector`, restricted to
    /// the lessons in `filter` when there is one.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        namespace: &str,
        filter: Option<&LessonFilter>,
    ) -> Result<Vec<QueryMatch>, Error>;

    async fn fetch(&self, id: &str, namespace: &str) -> Result<Option<LessonRecord>, Error>;
}
