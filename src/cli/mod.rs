use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod query;
pub mod serve;
pub mod upsert;

use crate::api::init_tracing;
use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3000")]
        port: String,
    },
    /// Embed a lesson from a file and store it in the vector index
    Upsert {
        #[arg(long)]
        file: String,
        /// Lesson ID, generated when omitted
        #[arg(long)]
        id: Option<String>,
        /// Extra metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Search lessons
    Query {
        #[arg(long)]
        term: String,
        /// Restrict the search to these lesson IDs
        #[arg(long = "lesson-id")]
        lesson_ids: Vec<String>,
        #[arg(long, default_value = "4")]
        limit: usize,
    },
    /// Start a chat session with the tutor
    Chat {
        #[arg(long, default_value = crate::ai::DEFAULT_USER_ID)]
        user_id: String,
        /// Restrict retrieval to these lesson IDs
        #[arg(long = "lesson-id")]
        lesson_ids: Vec<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let Some(command) = args.command else {
        return Ok(());
    };
    let config = AppConfig::from_env()?;

    // Handle each sub command
    match command {
        Command::Serve { host, port } => {
            serve::run(host, port, config).await?;
        }
        Command::Upsert { file, id, metadata } => {
            upsert::run(&file, id, metadata.as_deref(), config).await?;
        }
        Command::Query {
            term,
            lesson_ids,
            limit,
        } => {
            query::run(&term, &lesson_ids, limit, config).await?;
        }
        Command::Chat {
            user_id,
            lesson_ids,
        } => {
            chat::run(&user_id, &lesson_ids, config).await?;
        }
    }

    Ok(())
}
