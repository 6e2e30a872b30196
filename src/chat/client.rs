use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use super::error::{ClientError, DeliveryCause};
use super::models::Turn;
use super::public::{ChatReply, ChatRequest, ClearHistoryResponse, HealthResponse, HistoryResponse};
use super::session::resolve_session_id;
use super::store::SharedStore;
use crate::core::AppConfig;

/// Delivers a single message and returns the reply text. This is the
/// seam between the conversation controller and the network.
#[async_trait]
pub trait Exchange {
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}

pub type SharedExchange = Arc<dyn Exchange + Send + Sync + 'static>;

/// HTTP client for the inference backend.
///
/// Messages are POSTed to each configured chat path in order until one
/// answers with a 2xx. Every failure kind moves on to the next
/// candidate; when all of them fail the last failure is returned as
/// `ClientError::Delivery`. A 2xx with an unusable body ends the
/// attempt with `ClientError::MalformedResponse`.
pub struct ExchangeClient {
    config: AppConfig,
    http: reqwest::Client,
    store: SharedStore,
    session_id: OnceCell<String>,
}

impl ExchangeClient {
    pub fn new(config: AppConfig, store: SharedStore) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self {
            config,
            http: reqwest::Client::new(),
            store,
            session_id: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolves the session identifier on first use and caches it for
    /// the lifetime of the client.
    pub async fn session_id(&self) -> Result<String, ClientError> {
        let id = self
            .session_id
            .get_or_try_init(|| async {
                resolve_session_id(self.store.as_ref())
                    .await
                    .map_err(|e| ClientError::Storage(format!("{:#}", e)))
            })
            .await?;
        Ok(id.clone())
    }

    /// Server side history for this session.
    pub async fn history(&self) -> Result<Vec<Turn>, ClientError> {
        let session_id = self.session_id().await?;
        let mut url = self.config.endpoint("/history")?;
        url.query_pairs_mut().append_pair("session_id", &session_id);

        let resp: HistoryResponse = self.call(Method::GET, url, &session_id).await?;
        Ok(resp.messages)
    }

    pub async fn clear_history(&self) -> Result<bool, ClientError> {
        let session_id = self.session_id().await?;
        let mut url = self.config.endpoint("/history/clear")?;
        url.query_pairs_mut().append_pair("session_id", &session_id);

        let resp: ClearHistoryResponse = self.call(Method::POST, url, &session_id).await?;
        Ok(resp.ok)
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let session_id = self.session_id().await?;
        let url = self.config.endpoint("/health")?;
        let resp: HealthResponse = self.call(Method::GET, url, &session_id).await?;
        Ok(resp.status)
    }

    fn request(&self, method: Method, url: Url, session_id: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("x-session-id", session_id)
            .header("x-api-key", self.config.api_key.as_str())
    }

    /// Single request against a single endpoint, no fallback.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        session_id: &str,
    ) -> Result<T, ClientError> {
        let request = self.request(method, url.clone(), session_id);
        let response = attempt(request)
            .await
            .map_err(|cause| ClientError::Delivery {
                attempts: 1,
                url: url.to_string(),
                cause,
            })?;
        read_json(&url, response, 1).await
    }
}

#[async_trait]
impl Exchange for ExchangeClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        let session_id = self.session_id().await?;
        let payload = ChatRequest {
            message,
            max_tokens: self.config.max_tokens,
        };

        let mut last_failure: Option<(Url, DeliveryCause)> = None;
        for (index, path) in self.config.chat_paths.iter().enumerate() {
            let url = self.config.endpoint(path)?;
            // `json` sets the Content-Type header
            let request = self
                .request(Method::POST, url.clone(), &session_id)
                .json(&payload);

            match attempt(request).await {
                Ok(response) => {
                    let ChatReply { reply } = read_json(&url, response, index + 1).await?;
                    return Ok(reply);
                }
                Err(cause) => {
                    let not_found = matches!(
                        cause,
                        DeliveryCause::Status { code, .. } if code == StatusCode::NOT_FOUND.as_u16()
                    );
                    if not_found {
                        tracing::debug!("Chat endpoint {} not found, trying next", url);
                    } else {
                        tracing::warn!("Chat endpoint {} failed: {}", url, cause);
                    }
                    last_failure = Some((url, cause));
                }
            }
        }

        // validate() guarantees at least one candidate was tried
        let (url, cause) = last_failure.ok_or_else(|| {
            ClientError::Configuration("No chat endpoint paths configured".to_string())
        })?;
        Err(ClientError::Delivery {
            attempts: self.config.chat_paths.len(),
            url: url.to_string(),
            cause,
        })
    }
}

/// Sends the request and sorts out transport and status failures.
async fn attempt(request: RequestBuilder) -> Result<Response, DeliveryCause> {
    let response = request
        .send()
        .await
        .map_err(transport_cause)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryCause::Status {
            code: status.as_u16(),
            text: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    Ok(response)
}

/// Keeps the whole source chain so the OS level reason (connection
/// refused, DNS, TLS) isn't lost.
fn transport_cause(err: reqwest::Error) -> DeliveryCause {
    DeliveryCause::Transport(format!("{:#}", anyhow::Error::new(err)))
}

/// Checks a successful response body against the expected schema. A
/// body that can't be read at all is a transport failure.
async fn read_json<T: DeserializeOwned>(
    url: &Url,
    response: Response,
    attempts: usize,
) -> Result<T, ClientError> {
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Delivery {
            attempts,
            url: url.to_string(),
            cause: transport_cause(e),
        })?;

    serde_json::from_str(&body).map_err(|e| ClientError::MalformedResponse {
        url: url.to_string(),
        message: format!("{} in body {:?}", e, body),
    })
}
