mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockito::Matcher;
    use serde_json::json;

    use sofai::chat::{
        ERROR_REPLY, Exchange, ExchangeClient, KeyValueStore, SESSION_KEY, SqliteStore,
        Submission, Turn,
    };
    use sofai::core::AppConfig;

    use crate::test_utils::test_controller;

    #[tokio::test]
    async fn it_exchanges_a_message_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("x-api-key", "test-api-key")
            .match_header("x-session-id", Matcher::Regex(r"^[0-9a-f-]{36}$".into()))
            .match_body(Matcher::Json(json!({"message": "Hello", "max_tokens": 256})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"reply": "Hi there"}"#)
            .create_async()
            .await;

        let (controller, _client, _dir) = test_controller(&server.url()).await;
        let outcome = controller.submit("Hello").await;

        mock.assert_async().await;
        assert_eq!(outcome, Submission::Delivered);
        assert_eq!(
            controller.turns(),
            vec![Turn::user("Hello"), Turn::assistant("Hi there")]
        );
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn it_uses_the_legacy_path_when_primary_is_missing() {
        let mut server = mockito::Server::new_async().await;
        let _primary = server
            .mock("POST", "/api/chat")
            .with_status(404)
            .create_async()
            .await;
        let _legacy = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_body(r#"{"reply": "legacy reply"}"#)
            .create_async()
            .await;

        let (controller, _client, _dir) = test_controller(&server.url()).await;
        assert_eq!(controller.submit("Hello").await, Submission::Delivered);
        assert_eq!(controller.turns()[1], Turn::assistant("legacy reply"));
    }

    #[tokio::test]
    async fn it_shows_one_error_turn_for_a_malformed_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let (controller, _client, _dir) = test_controller(&server.url()).await;
        assert_eq!(controller.submit("Hello").await, Submission::Failed);

        assert_eq!(
            controller.turns(),
            vec![Turn::user("Hello"), Turn::assistant(ERROR_REPLY)]
        );
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn it_stays_usable_after_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let (controller, _client, _dir) = test_controller(&server.url()).await;
        assert_eq!(controller.submit("first").await, Submission::Failed);
        failing.assert_async().await;
        failing.remove_async().await;

        let _ok = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"reply": "back online"}"#)
            .create_async()
            .await;
        assert_eq!(controller.submit("second").await, Submission::Delivered);

        assert_eq!(
            controller.turns(),
            vec![
                Turn::user("first"),
                Turn::assistant(ERROR_REPLY),
                Turn::user("second"),
                Turn::assistant("back online"),
            ]
        );
    }

    #[tokio::test]
    async fn it_never_dispatches_blank_input() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let (controller, _client, _dir) = test_controller(&server.url()).await;
        assert_eq!(controller.submit("").await, Submission::Skipped);
        assert_eq!(controller.submit("   ").await, Submission::Skipped);

        mock.assert_async().await;
        assert!(controller.turns().is_empty());
    }

    #[tokio::test]
    async fn it_keeps_the_session_across_clients() {
        let mut server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let config =
            AppConfig::new(&server.url()).with_storage_path(dir.path().to_str().unwrap());

        let first_id = {
            let store = SqliteStore::open(&config.db_path()).await.unwrap();
            let client = ExchangeClient::new(config.clone(), Arc::new(store)).unwrap();
            client.session_id().await.unwrap()
        };

        // A fresh client over the same storage sends the stored id
        let store = SqliteStore::open(&config.db_path()).await.unwrap();
        assert_eq!(
            store.get(SESSION_KEY).await.unwrap(),
            Some(first_id.clone())
        );

        let mock = server
            .mock("POST", "/api/chat")
            .match_header("x-session-id", first_id.as_str())
            .with_status(200)
            .with_body(r#"{"reply": "same session"}"#)
            .create_async()
            .await;

        let client = ExchangeClient::new(config, Arc::new(store)).unwrap();
        let reply = client.send("Hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "same session");
    }

    #[tokio::test]
    async fn it_restores_history_into_the_conversation() {
        let mut server = mockito::Server::new_async().await;
        let _history = server
            .mock("GET", "/history")
            .match_query(Matcher::Regex("session_id=".into()))
            .with_status(200)
            .with_body(
                r#"{"session_id": "s", "messages": [
                    {"role": "user", "text": "Earlier"},
                    {"role": "bot", "text": "Earlier reply"}
                ]}"#,
            )
            .create_async()
            .await;
        let _chat = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(r#"{"reply": "Now"}"#)
            .create_async()
            .await;

        let (controller, client, _dir) = test_controller(&server.url()).await;
        assert!(controller.restore(client.history().await.unwrap()));
        controller.submit("Later").await;

        assert_eq!(
            controller.turns(),
            vec![
                Turn::user("Earlier"),
                Turn::assistant("Earlier reply"),
                Turn::user("Later"),
                Turn::assistant("Now"),
            ]
        );
    }
}
