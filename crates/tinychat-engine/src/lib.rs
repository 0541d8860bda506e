//! tinychat-engine: Headless core for the tinychat client
//!
//! This crate provides everything behind the chat screen:
//! - Configuration of the endpoint, model and timeout
//! - The message model
//! - The chat backend trait and its HTTP implementation
//! - The chat session state machine

pub mod client;
pub mod config;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use client::{ChatBackend, HttpChatClient, RequestFailure};
pub use config::{Config, ConfigError};
pub use message::{Message, Sender, NO_RESPONSE, SOMETHING_WENT_WRONG, UNKNOWN_ERROR};
pub use session::{ChatSession, PendingTurn, Submission, TurnState};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
