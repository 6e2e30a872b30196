use anyhow::{Result, bail};

use crate::chat::{Exchange, ExchangeClient};

pub async fn run(client: &ExchangeClient, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Message is empty");
    }
    let reply = client.send(message).await?;
    println!("{}", reply);
    Ok(())
}
