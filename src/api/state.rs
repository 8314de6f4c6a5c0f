use std::sync::Arc;

use crate::ai::{Agent, OpenAIAgent, SessionStore, Tutor};
use crate::core::AppConfig;
use crate::openai::{Embedder, OpenAIEmbeddings};
use crate::pinecone::{PineconeIndex, VectorStore};

pub struct AppState {
    pub config: AppConfig,
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub tutor: Tutor,
}

impl AppState {
    /// Builds the state with clients for OpenAI and Pinecone.
    pub fn new(config: AppConfig) -> Self {
        let embedder = Arc::new(OpenAIEmbeddings::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.embedding_model,
        ));
        let store = Arc::new(PineconeIndex::new(
            &config.pinecone_index_name,
            &config.pinecone_index_host,
            &config.pinecone_api_key,
        ));
        let agent = Arc::new(OpenAIAgent::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
            &config.system_message,
        ));
        Self::with_collaborators(config, embedder, store, agent)
    }

    pub fn with_collaborators(
        config: AppConfig,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        agent: Arc<dyn Agent>,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(config.max_sessions));
        let tutor = Tutor::new(
            agent,
            Arc::clone(&embedder),
            Arc::clone(&store),
            sessions,
            &config.namespace,
            config.retrieval_k,
        );
        Self {
            config,
            embedder,
            store,
            tutor,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        self.tutor.sessions()
    }
}
