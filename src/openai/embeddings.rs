use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Turns text into an embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Error>;
}

/// Embeddings from an OpenAI compatible `/v1/embeddings` endpoint.
pub struct OpenAIEmbeddings {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAIEmbeddings {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAIEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        if text.trim().is_empty() {
            bail!("Cannot embed empty text");
        }

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.api_hostname))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(60))
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Embedding request failed with status {}: {}", status, body);
        }

        let resp: EmbeddingResponse = response.json().await?;
        let embedding = resp
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(anyhow!("Embedding response contained no vectors"))?;

        tracing::debug!("Embedded {} chars into {} dimensions", text.len(), embedding.len());
        Ok(embedding)
    }
}
