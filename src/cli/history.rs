use anyhow::Result;

use super::chat::render_turn;
use crate::chat::ExchangeClient;

pub async fn show(client: &ExchangeClient) -> Result<()> {
    let turns = client.history().await?;
    if turns.is_empty() {
        println!("No messages yet for session {}", client.session_id().await?);
    }
    for turn in turns.iter() {
        println!("{}", render_turn(turn));
    }
    Ok(())
}

pub async fn clear(client: &ExchangeClient) -> Result<()> {
    if client.clear_history().await? {
        println!("Cleared history for session {}", client.session_id().await?);
    } else {
        println!("Backend did not clear the history");
    }
    Ok(())
}
