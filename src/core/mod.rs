mod config;
pub use config::{AppConfig, DEFAULT_MAX_SESSIONS, DEFAULT_NAMESPACE, DEFAULT_RETRIEVAL_K};

mod error;
pub use error::LessonError;
