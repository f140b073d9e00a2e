//! Chat assistant collaborator
//!
//! The assistant is opaque: it takes the user's message plus the prior turns
//! and returns reply text. [`HttpAssistant`] talks to a JSON endpoint;
//! [`Conversation`] keeps the running history on the caller's side.

mod http;

pub use http::{HttpAssistant, FALLBACK_REPLY};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KuberiumResult;

/// Who said a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: Role,
    pub content: String,
}

impl AssistantMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Assistant collaborator contract
pub trait Assistant {
    /// Produce a reply to `message` given the earlier turns
    ///
    /// Failures are [`KuberiumError::Assistant`](crate::error::KuberiumError::Assistant)
    /// and may be retried.
    fn reply(&self, message: &str, history: &[AssistantMessage]) -> KuberiumResult<String>;
}

/// Client-side conversation history
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<AssistantMessage>,
    /// How many prior turns are sent with each message
    history_limit: usize,
}

impl Conversation {
    pub fn new(history_limit: usize) -> Self {
        Self {
            turns: Vec::new(),
            history_limit,
        }
    }

    /// Start from a greeting shown before the user says anything
    pub fn with_greeting(history_limit: usize, greeting: impl Into<String>) -> Self {
        let mut conversation = Self::new(history_limit);
        conversation.turns.push(AssistantMessage::assistant(greeting));
        conversation
    }

    pub fn turns(&self) -> &[AssistantMessage] {
        &self.turns
    }

    /// Send a message and record both sides of the exchange
    ///
    /// On failure nothing is recorded, so the same message can be sent again.
    pub fn send(&mut self, assistant: &dyn Assistant, message: &str) -> KuberiumResult<String> {
        let message = message.trim();
        let start = self.turns.len().saturating_sub(self.history_limit);
        let history = &self.turns[start..];

        debug!(history = history.len(), "sending message to assistant");
        let reply = assistant.reply(message, history)?;

        self.turns.push(AssistantMessage::user(message));
        self.turns.push(AssistantMessage::assistant(reply.clone()));
        Ok(reply)
    }
}
