use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Error, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{QueryMatch, VectorStore};
use crate::lessons::{LessonFilter, LessonRecord};

const API_VERSION: &str = "2024-07";

/// Client for the data plane of a single Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    name: String,
    host: String,
    api_key: String,
}

impl PineconeIndex {
    /// `host` is the index host shown in the Pinecone console. A bare
    /// host name is assumed to be https.
    pub fn new(name: &str, host: &str, api_key: &str) -> Self {
        let host = host.trim().trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        Self {
            client: reqwest::Client::new(),
            name: name.to_string(),
            host,
            api_key: api_key.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.host, path))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .timeout(Duration::from_secs(30))
    }

    async fn check(&self, op: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "Pinecone {} on index {} failed with status {}: {}",
                op,
                self.name,
                status,
                body
            );
        }
        Ok(response)
    }
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: [&'a LessonRecord; 1],
    namespace: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, LessonRecord>,
}

#[async_trait]
impl VectorStore for PineconeIndex {
    async fn upsert(&self, record: LessonRecord, namespace: &str) -> Result<(), Error> {
        let response = self
            .request(reqwest::Method::POST, "/vectors/upsert")
            .json(&UpsertRequest {
                vectors: [&record],
                namespace,
            })
            .send()
            .await?;
        self.check("upsert", response).await?;

        tracing::debug!("Upserted {} into namespace {}", record.id, namespace);
        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        namespace: &str,
        filter: Option<&LessonFilter>,
    ) -> Result<Vec<QueryMatch>, Error> {
        let mut payload = json!({
            "namespace": namespace,
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
            "includeValues": false,
        });
        if let Some(filter) = filter {
            payload["filter"] = json!(filter);
        }

        let response = self
            .request(reqwest::Method::POST, "/query")
            .json(&payload)
            .send()
            .await?;
        let resp: QueryResponse = self.check("query", response).await?.json().await?;
        Ok(resp.matches)
    }

    async fn fetch(&self, id: &str, namespace: &str) -> Result<Option<LessonRecord>, Error> {
        let response = self
            .request(reqwest::Method::GET, "/vectors/fetch")
            .query(&[("ids", id), ("namespace", namespace)])
            .send()
            .await?;
        let mut resp: FetchResponse = self.check("fetch", response).await?.json().await?;
        Ok(resp.vectors.remove(id))
    }
}
