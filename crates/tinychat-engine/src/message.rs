//! Conversation messages.
//!
//! A [`Message`] is one turn in the conversation. Once built it never
//! changes; the session only ever appends new ones.

use serde::{Deserialize, Serialize};

/// Placeholder reply when the backend answers without a `response`.
pub const NO_RESPONSE: &str = "No response";

/// Text of the synthetic bot message appended when a request fails.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Error annotation used when a failure carries no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Returned by the backend, or synthesized on failure.
    Bot,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Message {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            error: None,
        }
    }

    /// Create a new bot reply.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            error: None,
        }
    }

    /// Create the bot message shown when a request fails.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            text: SOMETHING_WENT_WRONG.into(),
            sender: Sender::Bot,
            error: Some(error.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Text as rendered, with the error suffix when one is attached.
    pub fn display_text(&self) -> String {
        match &self.error {
            Some(error) => format!("{}\n(Error: {error})", self.text),
            None => self.text.clone(),
        }
    }
}
