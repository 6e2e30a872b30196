use anyhow::{Error, Result};
use uuid::Uuid;

use super::store::KeyValueStore;

/// Storage key holding the session identifier.
pub const SESSION_KEY: &str = "sofai_session_id";

/// Returns the stored session identifier, generating and persisting a
/// new one when none exists yet.
pub async fn resolve_session_id(store: &(dyn KeyValueStore + Send + Sync)) -> Result<String, Error> {
    if let Some(id) = store.get(SESSION_KEY).await? {
        if !id.trim().is_empty() {
            return Ok(id);
        }
    }

    let id = Uuid::new_v4().to_string();
    store.set(SESSION_KEY, &id).await?;
    tracing::debug!("Created new session {}", id);
    Ok(id)
}
