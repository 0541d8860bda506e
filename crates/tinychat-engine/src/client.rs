//! Chat backends.
//!
//! [`ChatBackend`] is the seam between the session and the network.
//! [`HttpChatClient`] is the production implementation: one
//! `POST {base_url}/chat` per prompt, non-streamed.

use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Something that can turn a prompt into a reply.
///
/// `Ok(None)` means the backend answered but carried no reply text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, RequestFailure>;
}

/// The single failure kind for an outbound chat request.
///
/// Connectivity failures, non-2xx statuses and malformed bodies are not
/// distinguished; only the message differs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestFailure {
    message: String,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn status(code: u16) -> Self {
        Self::new(format!("Request failed with status code {code}"))
    }

    fn transport(err: &reqwest::Error, timeout: Option<Duration>) -> Self {
        if let Some(t) = timeout.filter(|_| err.is_timeout()) {
            Self::new(format!("timeout of {}ms exceeded", t.as_millis()))
        } else if err.is_connect() {
            Self::new("Network Error")
        } else {
            Self::new(err.to_string())
        }
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body for `POST /chat`. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<String>,
}

/// HTTP client for the chat endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    url: String,
    model: String,
    timeout: Option<Duration>,
}

impl HttpChatClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Result<Self, RequestFailure> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RequestFailure::new(e.to_string()))?;

        Ok(Self {
            client,
            url: config.chat_url(),
            model: config.model.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, RequestFailure> {
        let request = ChatRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RequestFailure::transport(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RequestFailure::transport(&e, self.timeout))?;
        debug!(url = %self.url, %body, "chat response");

        // A literal `null` body is treated like a body without a reply.
        let parsed: Option<ChatResponse> = serde_json::from_str(&body)
            .map_err(|e| RequestFailure::new(format!("Invalid response body: {e}")))?;

        Ok(parsed.and_then(|r| r.response))
    }
}
