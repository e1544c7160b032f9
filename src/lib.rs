//! Confab — two local Ollama models in conversation, plus token frequency
//! analysis.
//!
//! The crate has three parts:
//! - [`inference`]: the HTTP client for a local Ollama server
//! - [`conversation`]: the alternating-turn conversation engine
//! - [`tokens`]: sub-word token analysis and frequency counting
//!
//! Everything is synchronous in effect: each generation call is awaited to
//! completion before the next begins, and nothing runs in the background.

pub mod conversation;
pub mod inference;
pub mod tokens;
