//! The core models for a conversation with the inference backend.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    // The backend stores its own replies as "bot"
    #[serde(rename = "assistant", alias = "bot")]
    Assistant,
}

/// One message in the conversation. Immutable once created.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: &str) -> Self {
        Self {
            role,
            text: text.to_string(),
        }
    }

    pub fn user(text: &str) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: &str) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only sequence of turns in display order.
#[derive(Default, Debug)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn turns(&self) -> Vec<Turn> {
        self.0.clone()
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
