use anyhow::Result;
use lessons::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
