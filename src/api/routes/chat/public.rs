//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::lessons::LessonFilter;
use crate::openai::Role;

#[derive(Deserialize, Serialize, Clone)]
pub struct ChatMessage {
    pub role: Option<Role>,
    pub content: Option<String>,
}

#[derive(Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Option<Vec<ChatMessage>>,
    pub user_id: Option<String>,
    pub lesson_ids: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDebug {
    pub used_retrieval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_filter: Option<LessonFilter>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub debug: ChatDebug,
}
