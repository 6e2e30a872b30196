use thiserror::Error;

/// Why a delivery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryCause {
    /// The request never produced an HTTP response (DNS, connect, TLS, ...)
    Transport(String),
    /// The endpoint answered with a non-2xx status
    Status { code: u16, text: String },
}

impl std::fmt::Display for DeliveryCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryCause::Transport(msg) => write!(f, "transport error: {}", msg),
            DeliveryCause::Status { code, text } => write!(f, "HTTP {} {}", code, text),
        }
    }
}

/// Errors raised by the exchange client. Callers branch on the variant
/// to decide what to show.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Every candidate endpoint failed. Carries the last failure seen.
    #[error("Delivery failed after {attempts} attempt(s) to {url}: {cause}")]
    Delivery {
        attempts: usize,
        url: String,
        cause: DeliveryCause,
    },
    /// An endpoint answered 2xx but the body wasn't the expected shape
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The session identifier could not be read or persisted
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Short, stable name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Delivery { .. } => "delivery",
            ClientError::MalformedResponse { .. } => "malformed_response",
            ClientError::Configuration(_) => "configuration",
            ClientError::Storage(_) => "storage",
        }
    }
}
