//! Conversation state and the client that exchanges messages with
//! the inference backend.
pub mod client;
pub mod controller;
pub mod error;
pub mod models;
pub mod public;
pub mod session;
pub mod store;

pub use client::{Exchange, ExchangeClient, SharedExchange};
pub use controller::{ConversationController, ERROR_REPLY, Submission};
pub use error::{ClientError, DeliveryCause};
pub use models::{Role, Transcript, Turn};
pub use session::{SESSION_KEY, resolve_session_id};
pub use store::{KeyValueStore, MemoryStore, SharedStore, SqliteStore};
