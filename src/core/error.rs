//! Errors surfaced to callers of the lesson and chat operations.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LessonError {
    /// The request was malformed or missing a required field.
    #[error("{0}")]
    Validation(String),
    #[error("Failed to generate embedding: {0}")]
    Embedding(String),
    #[error("Vector store error: {0}")]
    Storage(String),
    #[error("Agent error: {0}")]
    Agent(String),
    #[error("{0}")]
    NotFound(String),
}

impl LessonError {
    pub fn embedding(err: anyhow::Error) -> Self {
        Self::Embedding(format!("{:#}", err))
    }

    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", err))
    }

    pub fn agent(err: anyhow::Error) -> Self {
        Self::Agent(format!("{:#}", err))
    }
}
