use anyhow::Result;
use sofai::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
