//! Ollama inference client.
//!
//! Sends a single text-generation request to a local Ollama server and
//! returns the generated text. One request per call, no retries, no partial
//! delivery: even when the server streams, the full response is collected
//! before returning.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client as HttpClient;

use super::errors::InferenceError;
use super::types::{GenerateChunk, GenerateParams, GenerateRequest};

// ─── Constants ───────────────────────────────────────────────────────────────

/// Base URL of a standard local Ollama installation.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ─── TextGenerator ───────────────────────────────────────────────────────────

/// A source of generated text, keyed by model name.
///
/// The conversation engine and the frequency analyzer take any
/// `TextGenerator`, so tests substitute a scripted double for the live
/// [`OllamaClient`].
#[async_trait]
pub trait TextGenerator {
    /// Generate a completion of `prompt` with `model`.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, InferenceError>;
}

// ─── OllamaClient ────────────────────────────────────────────────────────────

/// Client for the Ollama `/api/generate` endpoint.
///
/// Holds one configured HTTP client; connections are pooled by `reqwest`
/// across calls. The per-request timeout comes from [`GenerateParams`].
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the server at `base_url` (trailing slashes
    /// stripped).
    ///
    /// Fails with [`InferenceError::TransportUnavailable`] when the HTTP
    /// transport cannot be brought up at all. Does NOT check connectivity —
    /// that happens on the first request.
    pub fn new(base_url: &str) -> Result<Self, InferenceError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| InferenceError::TransportUnavailable {
                endpoint: base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, base_url })
    }

    /// The base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a completion from `model` for `prompt`.
    ///
    /// Returns the text under the response payload's `response` field, or
    /// `""` when the field is absent. With `params.stream` set the server
    /// answers NDJSON; the fragments are concatenated and returned as one
    /// string — callers never see partial output.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let timeout = params.effective_timeout();

        let body = GenerateRequest {
            model,
            prompt,
            stream: params.stream,
            options: params.options.as_ref().filter(|o| !o.is_empty()),
        };

        tracing::debug!(
            url = %url,
            model = %model,
            prompt_chars = prompt.len(),
            stream = params.stream,
            timeout_secs = timeout.as_secs(),
            "sending generate request"
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &url, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::HttpStatus {
                status: status.as_u16(),
                body: body_text,
            });
        }

        if params.stream {
            collect_streamed_response(response, &url, timeout).await
        } else {
            let body_text = response
                .text()
                .await
                .map_err(|e| classify_transport_error(e, &url, timeout))?;
            let chunk: GenerateChunk = serde_json::from_str(&body_text)
                .map_err(|e| InferenceError::InvalidResponse {
                    reason: format!("not a generate payload: {e}"),
                })?;
            Ok(chunk.response)
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, InferenceError> {
        self.generate(model, prompt, params).await
    }
}

// ─── Streaming collection ────────────────────────────────────────────────────

/// Drain an NDJSON generate response and concatenate its fragments.
///
/// Each line is a JSON object carrying a `response` fragment; the final line
/// has `"done": true`. Lines after `done` (the server sends none) would be
/// ignored.
async fn collect_streamed_response(
    response: reqwest::Response,
    url: &str,
    timeout: Duration,
) -> Result<String, InferenceError> {
    let mut stream = response.bytes_stream();
    let mut buffer = Vec::new();
    let mut collected = String::new();

    while let Some(chunk_result) = stream.next().await {
        let bytes = chunk_result.map_err(|e| classify_transport_error(e, url, timeout))?;
        buffer.extend_from_slice(&bytes);

        // Process complete lines (NDJSON — each JSON object ends with \n)
        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let chunk: GenerateChunk = serde_json::from_str(trimmed).map_err(|e| {
                InferenceError::InvalidResponse {
                    reason: format!("bad NDJSON line: {e}"),
                }
            })?;
            collected.push_str(&chunk.response);
            if chunk.done {
                return Ok(collected);
            }
        }
    }

    // Body ended without a done marker — the last (unterminated) line may
    // still hold a fragment.
    let tail = String::from_utf8_lossy(&buffer);
    let trimmed = tail.trim();
    if !trimmed.is_empty() {
        let chunk: GenerateChunk = serde_json::from_str(trimmed).map_err(|e| {
            InferenceError::InvalidResponse {
                reason: format!("bad NDJSON line: {e}"),
            }
        })?;
        collected.push_str(&chunk.response);
    }
    Ok(collected)
}

/// Map a `reqwest` failure onto the error taxonomy.
///
/// Timeouts stay timeouts; everything that prevented a response from
/// arriving (connect refusal, dead socket, builder-level failures) is a
/// transport problem.
fn classify_transport_error(e: reqwest::Error, url: &str, timeout: Duration) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout {
            duration_secs: timeout.as_secs(),
        }
    } else {
        InferenceError::TransportUnavailable {
            endpoint: url.to_string(),
            reason: e.to_string(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");

        let client = OllamaClient::new("http://localhost:11434///").unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_new_keeps_clean_url() {
        let client = OllamaClient::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }
}
