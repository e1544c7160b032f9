//! Token frequency analysis of literal text and model responses.
//!
//! Produces a map from token id to occurrence count — the raw material for
//! token-landscape inspection. Rendering (clouds, charts) is out of scope;
//! only the counts are produced here.

use std::collections::HashMap;

use crate::inference::{GenerateParams, InferenceError, TextGenerator};

use super::analyzer::{TokenAnalyzer, TokenId};

/// Count token occurrences in `text` under `analyzer`.
///
/// The counts always sum to `analyzer.token_count(text)`; iteration order
/// carries no meaning.
pub fn analyze_text_tokens(
    text: &str,
    analyzer: &mut TokenAnalyzer,
) -> HashMap<TokenId, usize> {
    let tokens = analyzer.encode(text);
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Generate a response from `model` and count the tokens of the result.
///
/// One non-streaming generation call, then [`analyze_text_tokens`] on the
/// returned text with the same analyzer. Any client failure propagates
/// before anything is counted.
pub async fn analyze_model_tokens<C>(
    model: &str,
    prompt: &str,
    client: &C,
    analyzer: &mut TokenAnalyzer,
) -> Result<HashMap<TokenId, usize>, InferenceError>
where
    C: TextGenerator,
{
    let response = client
        .generate(model, prompt, &GenerateParams::default())
        .await?;
    tracing::debug!(
        model = %model,
        response_chars = response.len(),
        "analyzing generated response"
    );
    Ok(analyze_text_tokens(&response, analyzer))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
