use std::env;

use anyhow::{Result, anyhow};

pub const DEFAULT_NAMESPACE: &str = "lessons";
pub const DEFAULT_RETRIEVAL_K: usize = 4;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful tutor. Use the search_lessons tool to look up lesson content before answering questions about a lesson and base your answer on what you find.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub embedding_model: String,
    pub pinecone_api_key: String,
    pub pinecone_index_name: String,
    pub pinecone_index_host: String,
    pub namespace: String,
    pub system_message: String,
    pub retrieval_k: usize,
    pub max_sessions: usize,
}

impl AppConfig {
    /// Reads the config from the process environment. The vector
    /// index name and host are required, everything else has a
    /// default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pinecone_index_name = lookup("PINECONE_INDEX_NAME")
            .filter(|v| !v.trim().is_empty())
            .ok_or(anyhow!("Missing env var PINECONE_INDEX_NAME"))?;
        let pinecone_index_host = lookup("PINECONE_INDEX_HOST")
            .filter(|v| !v.trim().is_empty())
            .ok_or(anyhow!("Missing env var PINECONE_INDEX_HOST"))?;
        let pinecone_api_key =
            lookup("PINECONE_API_KEY").unwrap_or_else(|| "thiswontworkforpinecone".to_string());
        let openai_api_hostname =
            lookup("LESSONS_LLM_HOST").unwrap_or_else(|| "https://api.openai.com".to_string());
        let openai_api_key =
            lookup("OPENAI_API_KEY").unwrap_or_else(|| "thiswontworkforopenai".to_string());
        let openai_model = lookup("LESSONS_LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let embedding_model = lookup("LESSONS_EMBEDDING_MODEL")
            .unwrap_or_else(|| "text-embedding-3-small".to_string());
        let namespace =
            lookup("LESSONS_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let system_message = lookup("LESSONS_SYSTEM_MESSAGE")
            .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());
        let retrieval_k = parse_usize(&lookup, "LESSONS_RETRIEVAL_K", DEFAULT_RETRIEVAL_K)?;
        let max_sessions = parse_usize(&lookup, "LESSONS_MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?;

        Ok(Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            embedding_model,
            pinecone_api_key,
            pinecone_index_name,
            pinecone_index_host,
            namespace,
            system_message,
            retrieval_k,
            max_sessions,
        })
    }
}

fn parse_usize<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            let value: usize = raw
                .trim()
                .parse()
                .map_err(|e| anyhow!("Invalid value for {}: {} ({})", key, raw, e))?;
            if value == 0 {
                return Err(anyhow!("{} must be greater than zero", key));
            }
            Ok(value)
        }
        None => Ok(default),
    }
}
