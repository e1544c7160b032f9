//! Wire types for the Ollama `/api/generate` endpoint.
//!
//! Request building and tolerant response parsing. The server sends more
//! fields than we read (`context`, timing counters); everything beyond
//! `response` and `done` is ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default total timeout for a single generation request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ─── Request Types ───────────────────────────────────────────────────────────

/// Request body for `POST /api/generate`.
///
/// `options` is passed through to the server opaquely and omitted from the
/// JSON entirely when absent.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

/// Per-call knobs for [`OllamaClient::generate`](super::OllamaClient::generate).
///
/// `stream` selects how the server delivers the body, not how the caller
/// receives it: the client always collects the full response before
/// returning. `options` is an opaque map of generation parameters
/// (temperature, seed, ...) forwarded to the server untouched.
#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    pub stream: bool,
    pub options: Option<serde_json::Map<String, serde_json::Value>>,
    pub timeout: Option<Duration>,
}

impl GenerateParams {
    /// The effective request timeout: the override, or [`DEFAULT_TIMEOUT`].
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

// ─── Response Types ──────────────────────────────────────────────────────────

/// One JSON object from the server — the whole body when `stream` is off,
/// one NDJSON line when it is on.
#[derive(Debug, Deserialize)]
pub struct GenerateChunk {
    /// Generated text (the full response, or one streamed fragment).
    /// Missing field reads as `""`.
    #[serde(default)]
    pub response: String,
    /// Set on the final chunk of a streamed response.
    #[serde(default)]
    pub done: bool,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_omitted_when_none() {
        let req = GenerateRequest {
            model: "llama2",
            prompt: "Hello",
            stream: false,
            options: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("options"), "options should be omitted when None");
        assert!(json.contains("\"model\":\"llama2\""));
        assert!(json.contains("\"prompt\":\"Hello\""));
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn test_options_passed_through_when_some() {
        let mut options = serde_json::Map::new();
        options.insert("temperature".to_string(), serde_json::json!(0.2));
        let req = GenerateRequest {
            model: "llama2",
            prompt: "Hello",
            stream: true,
            options: Some(&options),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"options\":{\"temperature\":0.2}"));
        assert!(json.contains("\"stream\":true"));
    }

    #[test]
    fn test_chunk_missing_fields_default() {
        let chunk: GenerateChunk = serde_json::from_str("{}").unwrap();
        assert_eq!(chunk.response, "");
        assert!(!chunk.done);
    }

    #[test]
    fn test_chunk_ignores_extra_fields() {
        let chunk: GenerateChunk = serde_json::from_str(
            r#"{"model":"llama2","response":"hi","done":true,"total_duration":123}"#,
        )
        .unwrap();
        assert_eq!(chunk.response, "hi");
        assert!(chunk.done);
    }

    #[test]
    fn test_params_default_is_non_streaming() {
        let params = GenerateParams::default();
        assert!(!params.stream);
        assert!(params.options.is_none());
        assert_eq!(params.effective_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_params_timeout_override() {
        let params = GenerateParams {
            timeout: Some(Duration::from_secs(5)),
            ..GenerateParams::default()
        };
        assert_eq!(params.effective_timeout(), Duration::from_secs(5));
    }
}
