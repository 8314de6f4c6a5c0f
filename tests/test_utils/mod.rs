//! Test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use parking_lot::Mutex;
use serde_json::Value;
use tower::util::ServiceExt;

use lessons::ai::{Agent, AgentInput, AgentReply};
use lessons::api::{AppState, app};
use lessons::core::AppConfig;
use lessons::lessons::{LessonFilter, LessonRecord};
use lessons::openai::{BoxedToolCall, Embedder, FunctionCall, FunctionCallFn, Message};
use lessons::pinecone::{QueryMatch, VectorStore};

pub fn test_config() -> AppConfig {
    AppConfig {
        openai_api_hostname: String::from("http://localhost:1"),
        openai_api_key: String::from("test-api-key"),
        openai_model: String::from("gpt-4o-mini"),
        embedding_model: String::from("text-embedding-3-small"),
        pinecone_api_key: String::from("test-pinecone-key"),
        pinecone_index_name: String::from("lessons"),
        pinecone_index_host: String::from("http://localhost:1"),
        namespace: String::from("lessons"),
        system_message: String::from("You are a helpful tutor."),
        retrieval_k: 4,
        max_sessions: 100,
    }
}

/// Embeds text as a tiny vector derived from its length.
#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().push(text.to_string());
        if self.fail.load(Ordering::SeqCst) {
            bail!("embedding service unavailable");
        }
        Ok(vec![text.len() as f32, 1.0])
    }
}

/// Vector store that keeps records in memory and applies lesson
/// filters the way the real index does.
#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<HashMap<(String, String), LessonRecord>>,
    pub upserts: AtomicUsize,
    pub queried_filters: Mutex<Vec<Option<LessonFilter>>>,
    pub fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn get(&self, namespace: &str, id: &str) -> Option<LessonRecord> {
        self.records
            .lock()
            .get(&(namespace.to_string(), id.to_string()))
            .cloned()
    }

    pub fn insert(&self, namespace: &str, id: &str, content: &str) {
        let mut metadata = serde_json::Map::new();
        metadata.insert("content".to_string(), Value::from(content));
        metadata.insert("id".to_string(), Value::from(id));
        self.records.lock().insert(
            (namespace.to_string(), id.to_string()),
            LessonRecord {
                id: id.to_string(),
                values: vec![1.0, 1.0],
                metadata,
            },
        );
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, record: LessonRecord, namespace: &str) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("index is read only");
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .insert((namespace.to_string(), record.id.clone()), record);
        Ok(())
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        top_k: usize,
        namespace: &str,
        filter: Option<&LessonFilter>,
    ) -> Result<Vec<QueryMatch>, Error> {
        self.queried_filters.lock().push(filter.cloned());
        let records = self.records.lock();
        let mut matches: Vec<QueryMatch> = records
            .iter()
            .filter(|((ns, id), _)| ns == namespace && filter.is_none_or(|f| f.matches(id)))
            .map(|(_, r)| QueryMatch {
                id: r.id.clone(),
                score: 1.0,
                metadata: r.metadata.clone(),
            })
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn fetch(&self, id: &str, namespace: &str) -> Result<Option<LessonRecord>, Error> {
        Ok(self.get(namespace, id))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgentMode {
    /// Answer without using any tools
    Answer,
    /// Call the lesson search tool with the input, then answer with
    /// what it found
    Retrieve,
    /// Produce no output at all
    Silent,
    Fail,
}

#[derive(Clone, Debug)]
pub struct Invocation {
    pub input: String,
    pub chat_history: Vec<Message>,
    pub tool_names: Vec<String>,
}

pub struct ScriptedAgent {
    pub mode: Mutex<AgentMode>,
    pub invocations: Mutex<Vec<Invocation>>,
}

impl Default for ScriptedAgent {
    fn default() -> Self {
        Self {
            mode: Mutex::new(AgentMode::Answer),
            invocations: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedAgent {
    pub fn set_mode(&self, mode: AgentMode) {
        *self.mode.lock() = mode;
    }

    pub fn last(&self) -> Invocation {
        self.invocations
            .lock()
            .last()
            .cloned()
            .expect("Agent was never invoked")
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn invoke(
        &self,
        input: AgentInput<'_>,
        tools: Vec<BoxedToolCall>,
    ) -> Result<AgentReply, Error> {
        self.invocations.lock().push(Invocation {
            input: input.input.to_string(),
            chat_history: input.chat_history.to_vec(),
            tool_names: tools.iter().map(|t| t.function_name()).collect(),
        });

        let mode = *self.mode.lock();
        match mode {
            AgentMode::Answer => Ok(AgentReply {
                output: Some(format!("Answer to: {}", input.input)),
                tool_invocations: vec![],
            }),
            AgentMode::Retrieve => {
                let args = serde_json::json!({ "query": input.input }).to_string();
                let tool = tools.first().ok_or(anyhow!("No tools given"))?;
                let found = tool.call(&args).await?;
                Ok(AgentReply {
                    output: Some(found),
                    tool_invocations: vec![FunctionCall {
                        function: FunctionCallFn {
                            arguments: args,
                            name: tool.function_name(),
                        },
                        id: "call_1".to_string(),
                        r#type: "function".to_string(),
                    }],
                })
            }
            AgentMode::Silent => Ok(AgentReply::default()),
            AgentMode::Fail => Err(anyhow!("model is overloaded")),
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: Arc<AppState>,
    pub embedder: Arc<FakeEmbedder>,
    pub store: Arc<MemoryStore>,
    pub agent: Arc<ScriptedAgent>,
}

/// Creates a test application router backed by in-memory fakes of
/// the embedding, vector store and agent services.
pub fn test_app() -> TestApp {
    test_app_with_config(test_config())
}

pub fn test_app_with_config(config: AppConfig) -> TestApp {
    let embedder = Arc::new(FakeEmbedder::default());
    let store = Arc::new(MemoryStore::default());
    let agent = Arc::new(ScriptedAgent::default());
    let state = Arc::new(AppState::with_collaborators(
        config,
        embedder.clone(),
        store.clone(),
        agent.clone(),
    ));
    TestApp {
        app: app(Arc::clone(&state)),
        state,
        embedder,
        store,
        agent,
    }
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    post_raw(app, uri, payload.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = body_to_string(response.into_body()).await;
    let json = serde_json::from_str(&body).unwrap_or(Value::String(body));
    (status, json)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = body_to_string(response.into_body()).await;
    let json = serde_json::from_str(&body).unwrap_or(Value::String(body));
    (status, json)
}
