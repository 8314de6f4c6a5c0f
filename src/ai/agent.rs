use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::openai::{BoxedToolCall, FunctionCall, Message, Role, chat};

pub struct AgentInput<'a> {
    /// Content of the latest user message.
    pub input: &'a str,
    /// Prior turns of the conversation, oldest first.
    pub chat_history: &'a [Message],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentReply {
    pub output: Option<String>,
    pub tool_invocations: Vec<FunctionCall>,
}

/// A language model that can answer with the help of tools.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn invoke(
        &self,
        input: AgentInput<'_>,
        tools: Vec<BoxedToolCall>,
    ) -> Result<AgentReply, Error>;
}

/// Agent backed by an OpenAI compatible chat completions API.
pub struct OpenAIAgent {
    api_hostname: String,
    api_key: String,
    model: String,
    system_message: String,
}

impl OpenAIAgent {
    pub fn new(api_hostname: &str, api_key: &str, model: &str, system_message: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_message: system_message.to_string(),
        }
    }
}

#[async_trait]
impl Agent for OpenAIAgent {
    async fn invoke(
        &self,
        input: AgentInput<'_>,
        tools: Vec<BoxedToolCall>,
    ) -> Result<AgentReply, Error> {
        let mut transcript = Vec::with_capacity(input.chat_history.len() + 2);
        transcript.push(Message::new(Role::System, &self.system_message));
        transcript.extend_from_slice(input.chat_history);
        transcript.push(Message::new(Role::User, input.input));

        let messages = chat(
            &tools,
            &transcript,
            &self.api_hostname,
            &self.api_key,
            &self.model,
        )
        .await?;

        let tool_invocations = messages
            .iter()
            .flat_map(|m| m.tool_calls().iter().cloned())
            .collect();
        let output = messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::Assistant && m.tool_calls().is_empty())
            .and_then(|m| m.content.clone());

        Ok(AgentReply {
            output,
            tool_invocations,
        })
    }
}
