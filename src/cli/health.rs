use anyhow::Result;

use crate::chat::ExchangeClient;

pub async fn run(client: &ExchangeClient) -> Result<()> {
    let status = client.health().await?;
    println!("{}: {}", client.config().api_base_url, status);
    Ok(())
}
