use anyhow::Result;
use funchat::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
