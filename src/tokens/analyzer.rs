//! Token analysis over a named sub-word encoding.
//!
//! Wraps `tiktoken-rs` to inspect the relationship between text and token
//! ids without access to the full model. When the requested encoding cannot
//! be loaded, a whitespace tokenizer with a lazily grown vocabulary takes
//! its place so the module keeps working for testing and experimentation.

use std::collections::HashMap;

use thiserror::Error;
use tiktoken_rs::CoreBPE;

// ─── Constants ──────────────────────────────────────────────────────────────

/// Encoding used when none is named (GPT-4 / GPT-3.5-turbo).
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Vocabulary sizes of the supported encodings, special tokens included.
/// `tiktoken-rs` does not expose these, so they live next to the loader.
const CL100K_BASE_N_VOCAB: usize = 100_277;
const O200K_BASE_N_VOCAB: usize = 200_019;
const P50K_BASE_N_VOCAB: usize = 50_281;
const R50K_BASE_N_VOCAB: usize = 50_257;

/// A token identifier — a rank in the sub-word vocabulary, or a
/// first-seen-order index in the fallback vocabulary.
pub type TokenId = u32;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Errors from token analysis operations.
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// `token_index` input did not map to exactly one token.
    #[error("'{text}' maps to {count} tokens, expected exactly one")]
    MultiToken {
        text: String,
        count: usize,
    },

    /// A token id never assigned by this analyzer instance.
    #[error("unknown token id {id}")]
    UnknownTokenId {
        id: TokenId,
    },

    /// The sub-word encoding rejected the token sequence.
    #[error("decode failed: {reason}")]
    Decode {
        reason: String,
    },
}

// ─── Encoding schemes ───────────────────────────────────────────────────────

/// The strategy picked at construction, never revisited.
enum Scheme {
    /// The named tiktoken encoding loaded successfully.
    Subword { bpe: CoreBPE, n_vocab: usize },
    /// Whitespace-split words with ids assigned in first-seen order.
    Whitespace(WhitespaceVocab),
}

/// Instance-private fallback vocabulary. `words[id]` is the word assigned
/// id `id`; the map holds the reverse direction.
#[derive(Default)]
struct WhitespaceVocab {
    ids: HashMap<String, TokenId>,
    words: Vec<String>,
}

impl WhitespaceVocab {
    fn encode(&mut self, text: &str) -> Vec<TokenId> {
        text.split_whitespace()
            .map(|word| match self.ids.get(word) {
                Some(&id) => id,
                None => {
                    let id = self.words.len() as TokenId;
                    self.ids.insert(word.to_string(), id);
                    self.words.push(word.to_string());
                    id
                }
            })
            .collect()
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, TokenizerError> {
        let words: Vec<&str> = tokens
            .iter()
            .map(|&id| {
                self.words
                    .get(id as usize)
                    .map(String::as_str)
                    .ok_or(TokenizerError::UnknownTokenId { id })
            })
            .collect::<Result<_, _>>()?;
        Ok(words.join(" "))
    }
}

/// Load the named encoding, or `None` (logged) to select the fallback.
fn load_subword_scheme(name: &str) -> Option<(CoreBPE, usize)> {
    let loaded = match name {
        "cl100k_base" => tiktoken_rs::cl100k_base().map(|bpe| (bpe, CL100K_BASE_N_VOCAB)),
        "o200k_base" => tiktoken_rs::o200k_base().map(|bpe| (bpe, O200K_BASE_N_VOCAB)),
        "p50k_base" => tiktoken_rs::p50k_base().map(|bpe| (bpe, P50K_BASE_N_VOCAB)),
        "r50k_base" => tiktoken_rs::r50k_base().map(|bpe| (bpe, R50K_BASE_N_VOCAB)),
        other => {
            tracing::warn!(encoding = %other, "unknown encoding, using whitespace fallback");
            return None;
        }
    };

    match loaded {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::warn!(encoding = %name, error = %e, "encoding failed to load, using whitespace fallback");
            None
        }
    }
}

// ─── TokenAnalyzer ──────────────────────────────────────────────────────────

/// Analyze tokens for a given encoding.
///
/// Mode selection happens once here: either the named sub-word encoding
/// loads and is used exclusively for the instance's lifetime, or every call
/// goes through the whitespace fallback. Encoding is deterministic for a
/// given instance and input; the fallback vocabulary is private to the
/// instance and grows only through its own `encode` calls.
pub struct TokenAnalyzer {
    encoding_name: String,
    scheme: Scheme,
}

impl TokenAnalyzer {
    /// Create an analyzer for `encoding_name`, falling back to whitespace
    /// tokenization if the encoding cannot be loaded.
    pub fn new(encoding_name: &str) -> Self {
        let scheme = match load_subword_scheme(encoding_name) {
            Some((bpe, n_vocab)) => Scheme::Subword { bpe, n_vocab },
            None => Scheme::Whitespace(WhitespaceVocab::default()),
        };
        Self {
            encoding_name: encoding_name.to_string(),
            scheme,
        }
    }

    /// The encoding name this analyzer was constructed with.
    pub fn encoding_name(&self) -> &str {
        &self.encoding_name
    }

    /// Whether the whitespace fallback is in effect.
    pub fn is_fallback(&self) -> bool {
        matches!(self.scheme, Scheme::Whitespace(_))
    }

    /// The token ids representing `text`, in order.
    pub fn encode(&mut self, text: &str) -> Vec<TokenId> {
        match &mut self.scheme {
            Scheme::Subword { bpe, .. } => bpe.encode_ordinary(text),
            Scheme::Whitespace(vocab) => vocab.encode(text),
        }
    }

    /// The text representation of `tokens`.
    ///
    /// Fallback mode reconstructs by space-joining the words assigned to the
    /// given ids; an id this instance never assigned is an error.
    pub fn decode(&self, tokens: &[TokenId]) -> Result<String, TokenizerError> {
        match &self.scheme {
            Scheme::Subword { bpe, .. } => {
                bpe.decode(tokens.to_vec())
                    .map_err(|e| TokenizerError::Decode {
                        reason: e.to_string(),
                    })
            }
            Scheme::Whitespace(vocab) => vocab.decode(tokens),
        }
    }

    /// The number of tokens in `text`, equal to `encode(text).len()`.
    pub fn token_count(&mut self, text: &str) -> usize {
        self.encode(text).len()
    }

    /// The id of a text that is a single indivisible unit under this
    /// analyzer. Anything encoding to zero or several tokens is rejected.
    pub fn token_index(&mut self, token_text: &str) -> Result<TokenId, TokenizerError> {
        let ids = self.encode(token_text);
        match ids.as_slice() {
            [id] => Ok(*id),
            _ => Err(TokenizerError::MultiToken {
                text: token_text.to_string(),
                count: ids.len(),
            }),
        }
    }

    /// Total distinct token ids known: the encoding's fixed vocabulary
    /// size, or the number of fallback ids assigned so far.
    pub fn vocabulary_size(&self) -> usize {
        match &self.scheme {
            Scheme::Subword { n_vocab, .. } => *n_vocab,
            Scheme::Whitespace(vocab) => vocab.words.len(),
        }
    }
}

impl Default for TokenAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODING)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
