//! Wire types for the inference backend API
use serde::{Deserialize, Serialize};

use super::models::Turn;

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub max_tokens: u32,
}

#[derive(Deserialize, Debug)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Deserialize, Debug)]
pub struct HistoryResponse {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<Turn>,
}

#[derive(Deserialize, Debug)]
pub struct ClearHistoryResponse {
    pub ok: bool,
}

#[derive(Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}
