mod core;
pub use self::core::*;

mod chat;
pub use chat::{MAX_TOOL_ROUNDS, chat};

mod embeddings;
pub use embeddings::{Embedder, OpenAIEmbeddings};
