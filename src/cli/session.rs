use anyhow::Result;

use crate::chat::ExchangeClient;

pub async fn run(client: &ExchangeClient) -> Result<()> {
    println!("{}", client.session_id().await?);
    Ok(())
}
