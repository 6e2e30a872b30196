//! Test utilities for integration tests
use std::sync::Arc;

use sofai::chat::{ConversationController, ExchangeClient, SqliteStore};
use sofai::core::AppConfig;
use tempfile::TempDir;

/// A controller wired to a real `ExchangeClient` pointed at
/// `api_base_url`, storing its session in a throwaway sqlite db.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn test_controller(
    api_base_url: &str,
) -> (ConversationController, Arc<ExchangeClient>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = AppConfig::new(api_base_url)
        .with_api_key("test-api-key")
        .with_storage_path(dir.path().to_str().unwrap());

    let store = SqliteStore::open(&config.db_path())
        .await
        .expect("Failed to open sqlite store");
    let client =
        Arc::new(ExchangeClient::new(config, Arc::new(store)).expect("Invalid test config"));
    let controller = ConversationController::new(client.clone());

    (controller, client, dir)
}
