//! Inference error types.
//!
//! All errors implement `std::error::Error` via `thiserror` and propagate
//! synchronously to the immediate caller. There is no retry layer — a failed
//! generation is the caller's problem.

use thiserror::Error;

/// Errors that can occur while talking to the inference server.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The HTTP transport could not be brought up or the endpoint refused
    /// the connection. Distinct from a server-side failure: no request ever
    /// reached the server.
    #[error("transport unavailable for {endpoint}: {reason}")]
    TransportUnavailable {
        endpoint: String,
        reason: String,
    },

    /// Non-2xx HTTP response from the inference server.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: u16,
        body: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("generation timed out after {duration_secs}s")]
    Timeout {
        duration_secs: u64,
    },

    /// The server answered 2xx but the payload was not the documented shape.
    #[error("invalid response payload: {reason}")]
    InvalidResponse {
        reason: String,
    },
}

impl InferenceError {
    /// The HTTP status code, if this is an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            InferenceError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response body text, if this is an `HttpStatus` error.
    pub fn error_body(&self) -> Option<&str> {
        match self {
            InferenceError::HttpStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
