use std::sync::Arc;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::lessons::LessonFilter;
use crate::openai::{Embedder, Function, Parameters, Property, ToolCall, ToolType};
use crate::pinecone::VectorStore;

pub const LESSON_SEARCH_TOOL_NAME: &str = "search_lessons";

const NO_RESULTS: &str = "No lesson content found for this query.";

/// Everything needed to run a retrieval. Built fresh for every chat
/// turn from the session's filter and never modified afterwards.
#[derive(Clone)]
pub struct LessonRetrieval {
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub namespace: String,
    pub top_k: usize,
    pub filter: Option<LessonFilter>,
}

impl LessonRetrieval {
    /// Embeds `query` and returns the content of the closest lessons
    /// formatted for the model.
    pub async fn search(&self, query: &str) -> Result<String, Error> {
        let vector = self
            .embedder
            .embed(query)
            .await
            .context("Failed to embed lesson search query")?;
        let matches = self
            .store
            .query(vector, self.top_k, &self.namespace, self.filter.as_ref())
            .await
            .context("Failed to query lessons")?;

        tracing::debug!(
            "Lesson search for {:?} returned {} matches (filter: {:?})",
            query,
            matches.len(),
            self.filter.as_ref().map(|f| f.ids())
        );

        let accum: Vec<String> = matches
            .iter()
            .filter_map(|m| m.content().map(|c| format!("## Lesson {}\n{}", m.id, c)))
            .collect();

        if accum.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }
        Ok(accum.join("\n\n"))
    }
}

#[derive(Serialize)]
pub struct LessonSearchProps {
    pub query: Property,
}

#[derive(Deserialize)]
pub struct LessonSearchArgs {
    pub query: String,
}

#[derive(Serialize)]
pub struct LessonSearchTool {
    pub r#type: ToolType,
    pub function: Function<LessonSearchProps>,
    #[serde(skip)]
    retrieval: LessonRetrieval,
}

#[async_trait]
impl ToolCall for LessonSearchTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let fn_args: LessonSearchArgs = serde_json::from_str(args).with_context(|| {
            format!("Invalid arguments for {}: {}", LESSON_SEARCH_TOOL_NAME, args)
        })?;
        self.retrieval.search(&fn_args.query).await
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl LessonSearchTool {
    pub fn new(retrieval: LessonRetrieval) -> Self {
        let function = Function {
            name: String::from(LESSON_SEARCH_TOOL_NAME),
            description: String::from(
                "Search the lesson library for content relevant to the user's question.",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: LessonSearchProps {
                    query: Property {
                        r#type: String::from("string"),
                        description: String::from(
                            "A short query describing the lesson content to look up.",
                        ),
                    },
                },
                required: vec![String::from("query")],
                additional_properties: false,
            },
            strict: true,
        };
        Self {
            r#type: ToolType::Function,
            function,
            retrieval,
        }
    }
}
