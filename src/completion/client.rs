use anyhow::{Context, Result};
use futures_util::Stream;
use reqwest::Client;
use serde::Serialize;
use std::pin::Pin;

use super::sse_parser::sse_to_text_stream;
use crate::chat::ChatMessage;

pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

// Borrowed so the transcript is serialized in place rather than cloned.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Client for an OpenAI-compatible streaming chat completions endpoint.
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CompletionClient {
    /// `endpoint` is the full chat completions URL.
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Sends the transcript and returns the stream of text deltas.
    ///
    /// Errors here happen before any text arrives: connection failures and
    /// non-success statuses. Failures while reading the body surface as an
    /// `Err` item on the returned stream.
    pub async fn stream_chat(&self, model: &str, messages: &[ChatMessage]) -> Result<TextStream> {
        let chat_request = ChatCompletionRequest {
            model,
            messages,
            stream: true,
        };

        let mut http_request = self.client.post(&self.endpoint).json(&chat_request);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            model,
            messages = messages.len(),
            "sending completion request"
        );

        let response = http_request
            .send()
            .await
            .with_context(|| format!("Failed to connect to API endpoint: {}", self.endpoint))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {status}: {body}");
        }

        Ok(Box::pin(sse_to_text_stream(response.bytes_stream())))
    }
}
