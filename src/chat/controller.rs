use std::sync::{Mutex, MutexGuard};

use super::client::SharedExchange;
use super::models::{Transcript, Turn};

/// Shown in place of a reply whenever an exchange fails.
pub const ERROR_REPLY: &str =
    "Error: Unable to connect to the backend. Make sure the inference server is running.";

/// What happened to a call to `submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank input or another submission was still pending
    Skipped,
    Delivered,
    /// The exchange failed and the error turn was appended
    Failed,
}

#[derive(Default)]
struct ConversationState {
    transcript: Transcript,
    input: String,
    pending: bool,
}

fn lock(state: &Mutex<ConversationState>) -> MutexGuard<'_, ConversationState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Clears the pending flag when a submission ends, including when its
/// future is dropped before the exchange resolves. In that case the
/// user turn still gets its error turn.
struct PendingGuard<'a> {
    state: &'a Mutex<ConversationState>,
    settled: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if !self.settled {
            tracing::warn!("Submission dropped before the exchange resolved");
            state.transcript.push(Turn::assistant(ERROR_REPLY));
        }
        state.pending = false;
    }
}

/// Owns the conversation shown to the user.
///
/// Each submission goes `Idle -> Pending -> Idle`: the user turn is
/// appended when the request starts and exactly one assistant turn
/// (the reply or `ERROR_REPLY`) when it resolves. While pending, further
/// submissions are skipped. The state lock is never held across the
/// network call so readers can render while a request is in flight.
pub struct ConversationController {
    exchange: SharedExchange,
    state: Mutex<ConversationState>,
}

impl ConversationController {
    pub fn new(exchange: SharedExchange) -> Self {
        Self {
            exchange,
            state: Mutex::new(ConversationState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        lock(&self.state)
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.state().transcript.turns()
    }

    pub fn is_pending(&self) -> bool {
        self.state().pending
    }

    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    pub fn set_input(&self, text: &str) {
        self.state().input = text.to_string();
    }

    /// Seeds an empty conversation with previously stored turns. Has no
    /// effect once the conversation has started.
    pub fn restore(&self, turns: Vec<Turn>) -> bool {
        let mut state = self.state();
        if !state.transcript.is_empty() || state.pending {
            return false;
        }
        for turn in turns {
            state.transcript.push(turn);
        }
        true
    }

    /// Submits whatever is in the input buffer.
    pub async fn submit_input(&self) -> Submission {
        let text = self.input();
        self.submit(&text).await
    }

    pub async fn submit(&self, text: &str) -> Submission {
        {
            let mut state = self.state();
            if text.trim().is_empty() || state.pending {
                return Submission::Skipped;
            }
            state.transcript.push(Turn::user(text));
            state.input.clear();
            state.pending = true;
        }
        let mut guard = PendingGuard {
            state: &self.state,
            settled: false,
        };

        let result = self.exchange.send(text).await;

        let mut state = self.state();
        let outcome = match result {
            Ok(reply) => {
                state.transcript.push(Turn::assistant(&reply));
                Submission::Delivered
            }
            Err(err) => {
                tracing::error!(kind = err.kind(), "Message exchange failed: {}", err);
                state.transcript.push(Turn::assistant(ERROR_REPLY));
                Submission::Failed
            }
        };
        drop(state);
        guard.settled = true;
        outcome
    }
}
