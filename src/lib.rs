pub mod ai;
pub mod api;
pub mod cli;
pub mod core;
pub mod lessons;
pub mod openai;
pub mod pinecone;
