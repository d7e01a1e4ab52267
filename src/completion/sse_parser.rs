//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.

use anyhow::Result;
use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Response structure for streaming chat completions.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// A significant SSE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Text from the first choice's delta.
    Delta(String),
    /// The `[DONE]` sentinel.
    Done,
}

/// Converts a raw SSE byte stream into a stream of text deltas.
///
/// Only newline-terminated lines are considered; a trailing partial line at
/// end of body is discarded. The stream ends at the `[DONE]` sentinel, at end
/// of body, or after yielding the first transport error.
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        // Bytes, not String: a multi-byte character may straddle two chunks.
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {e}"));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                let line = String::from_utf8_lossy(&line);

                match parse_sse_line(&line) {
                    Some(Frame::Delta(content)) => yield Ok(content),
                    Some(Frame::Done) => return,
                    None => {}
                }
            }
        }

        if !buffer.is_empty() {
            tracing::debug!(bytes = buffer.len(), "discarding unterminated trailing line");
        }
    }
}

/// Parses a single SSE line.
///
/// Returns `None` for lines without the `data:` marker, for payloads that are
/// not valid JSON, and for fragments carrying no text.
///
/// ```ignore
/// let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
/// assert_eq!(parse_sse_line(line), Some(Frame::Delta("Hello".to_string())));
/// ```
pub fn parse_sse_line(line: &str) -> Option<Frame> {
    let line = line.trim_end_matches(['\r', '\n']);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    let payload = payload.strip_prefix(' ').unwrap_or(payload);

    if payload.trim() == DONE_SENTINEL {
        return Some(Frame::Done);
    }

    let response = match serde_json::from_str::<StreamResponse>(payload) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("skipping undecodable frame: {e}");
            return None;
        }
    };

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|c| !c.is_empty())
        .map(Frame::Delta)
}
