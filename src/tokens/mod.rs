//! Token analysis — sub-word encoding and frequency counting.
//!
//! Submodules:
//! - `analyzer`: encode/decode text against a named encoding, with a
//!   whitespace fallback when the encoding cannot be loaded
//! - `frequency`: token occurrence counts for literal text and for freshly
//!   generated model responses

pub mod analyzer;
pub mod frequency;

// Re-exports for convenience
pub use analyzer::{TokenAnalyzer, TokenId, TokenizerError, DEFAULT_ENCODING};
pub use frequency::{analyze_model_tokens, analyze_text_tokens};
