//! Inference client — HTTP client for a local Ollama server.
//!
//! This module handles all communication with the inference endpoint:
//! - Single-shot text generation via `POST /api/generate`
//! - NDJSON collection when the server streams
//! - The `TextGenerator` seam for injecting test doubles
//!
//! The server is an external collaborator: model loading, sampling, and
//! service behavior live on its side of the endpoint contract.

pub mod client;
pub mod errors;
pub mod types;

// Re-exports for convenience
pub use client::{OllamaClient, TextGenerator, DEFAULT_BASE_URL};
pub use errors::InferenceError;
pub use types::{GenerateChunk, GenerateParams, GenerateRequest, DEFAULT_TIMEOUT};
