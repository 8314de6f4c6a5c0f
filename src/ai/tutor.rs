use std::sync::Arc;

use crate::ai::agent::{Agent, AgentInput};
use crate::ai::session::SessionStore;
use crate::ai::tools::{LessonRetrieval, LessonSearchTool};
use crate::core::LessonError;
use crate::lessons::LessonFilter;
use crate::openai::{BoxedToolCall, Embedder};
use crate::pinecone::VectorStore;

/// Returned in place of an answer when the agent comes back empty.
pub const FALLBACK_RESPONSE: &str = "Sorry, I wasn't able to come up with an answer to that.";

#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    pub response: String,
    pub used_retrieval: bool,
}

/// Runs chat turns for users against the lesson library.
pub struct Tutor {
    agent: Arc<dyn Agent>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    sessions: Arc<SessionStore>,
    namespace: String,
    top_k: usize,
}

impl Tutor {
    pub fn new(
        agent: Arc<dyn Agent>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        sessions: Arc<SessionStore>,
        namespace: &str,
        top_k: usize,
    ) -> Self {
        Self {
            agent,
            embedder,
            store,
            sessions,
            namespace: namespace.to_string(),
            top_k,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Answers `input` for `user_id`.
    ///
    /// The session's retrieval tool is scoped by `filter` when one is
    /// given, otherwise by whatever filter the session already has.
    /// History is only updated when the agent succeeds.
    pub async fn chat_turn(
        &self,
        user_id: &str,
        input: &str,
        filter: Option<LessonFilter>,
    ) -> Result<TurnOutcome, LessonError> {
        let snapshot = self.sessions.begin_turn(user_id, filter);

        let retrieval = LessonRetrieval {
            embedder: Arc::clone(&self.embedder),
            store: Arc::clone(&self.store),
            namespace: self.namespace.clone(),
            top_k: self.top_k,
            filter: snapshot.filter,
        };
        let tools: Vec<BoxedToolCall> = vec![Box::new(LessonSearchTool::new(retrieval))];

        let reply = self
            .agent
            .invoke(
                AgentInput {
                    input,
                    chat_history: &snapshot.history,
                },
                tools,
            )
            .await
            .map_err(LessonError::agent)?;

        let response = match reply.output {
            Some(output) if !output.trim().is_empty() => output,
            _ => {
                tracing::warn!("Agent returned no output for user {}", user_id);
                FALLBACK_RESPONSE.to_string()
            }
        };

        self.sessions.finish_turn(user_id, input, &response);

        Ok(TurnOutcome {
            response,
            used_retrieval: !reply.tool_invocations.is_empty(),
        })
    }
}
