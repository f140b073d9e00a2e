//! HTTP assistant client (blocking)

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Assistant, AssistantMessage};
use crate::error::{KuberiumError, KuberiumResult};

/// Returned when the endpoint answers without any reply text
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't process your request. Please try again later.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    history: &'a [AssistantMessage],
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    response: Option<String>,
}

impl ChatResponse {
    fn into_reply(self) -> String {
        match self.response.map(|r| r.trim().to_string()) {
            Some(text) if !text.is_empty() => text,
            _ => FALLBACK_REPLY.to_string(),
        }
    }
}

/// Assistant reached over HTTP
///
/// POSTs `{"message": ..., "history": [...]}` and reads the `response` field
/// of the JSON answer.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    http: Client,
    endpoint: Url,
}

impl HttpAssistant {
    pub fn new(endpoint: &str, timeout: Duration) -> KuberiumResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            KuberiumError::Config(format!("Invalid assistant endpoint '{}': {}", endpoint, e))
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(KuberiumError::Config(format!(
                "Unsupported scheme '{}' for assistant endpoint",
                endpoint.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KuberiumError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Assistant for HttpAssistant {
    fn reply(&self, message: &str, history: &[AssistantMessage]) -> KuberiumResult<String> {
        let request = ChatRequest { message, history };
        let endpoint = &self.endpoint;

        debug!(%endpoint, turns = history.len(), "calling assistant");

        let response = self
            .http
            .post(endpoint.clone())
            .json(&request)
            .send()
            .map_err(|e| {
                warn!(%endpoint, error = %e, "assistant request failed");
                KuberiumError::Assistant(format!("POST {} failed: {}", endpoint, e))
            })?
            .error_for_status()
            .map_err(|e| KuberiumError::Assistant(format!("{} returned an error: {}", endpoint, e)))?;

        let body: ChatResponse = response.json().map_err(|e| {
            KuberiumError::Assistant(format!("Unreadable response from {}: {}", endpoint, e))
        })?;

        Ok(body.into_reply())
    }
}
