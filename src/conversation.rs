//! Two-model conversation engine.
//!
//! Responsibilities:
//! - Alternate turns between two named models, starting from the first
//! - Feed each generation call the accumulated transcript
//! - Collect the `(model, response)` history in production order
//!
//! Inherently sequential: turn N+1's prompt contains turn N's full response,
//! so the calls must not be reordered or parallelized.

use crate::inference::{GenerateParams, InferenceError, TextGenerator};

/// One model's single generation step within a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// The model that produced this turn.
    pub model: String,
    /// The generated response text.
    pub text: String,
}

/// Have two models converse by generating responses alternately.
///
/// The transcript starts as the seed `prompt`; after every turn it grows by
/// the literal annotation `"\n{model}: {response}"`, and the speaker flips
/// between `model_a` and `model_b` (which may name the same model). The
/// first speaker is always `model_a`. `turns` is the total number of
/// responses produced — `turns == 4` means two from each model.
///
/// Any client failure aborts the whole conversation: the error propagates
/// and the partial history is dropped.
pub async fn have_conversation<C>(
    model_a: &str,
    model_b: &str,
    prompt: &str,
    turns: u32,
    client: &C,
) -> Result<Vec<Turn>, InferenceError>
where
    C: TextGenerator,
{
    let params = GenerateParams::default();
    let mut history = Vec::with_capacity(turns as usize);
    let mut transcript = prompt.to_string();
    let mut speaker = model_a;

    for turn in 0..turns {
        let response = client.generate(speaker, &transcript, &params).await?;
        tracing::debug!(
            turn,
            model = %speaker,
            response_chars = response.len(),
            transcript_chars = transcript.len(),
            "turn complete"
        );

        transcript.push_str(&format!("\n{speaker}: {response}"));
        history.push(Turn {
            model: speaker.to_string(),
            text: response,
        });
        speaker = if speaker == model_a { model_b } else { model_a };
    }

    Ok(history)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every prompt it receives and answers `r1`, `r2`, ...
    /// Fails the call whose 1-based index equals `fail_on`, if set.
    struct ScriptedClient {
        prompts: Mutex<Vec<(String, String)>>,
        fail_on: Option<usize>,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail_on: Some(call),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedClient {
        async fn generate(
            &self,
            model: &str,
            prompt: &str,
            params: &GenerateParams,
        ) -> Result<String, InferenceError> {
            assert!(!params.stream, "conversation turns are non-streaming");
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push((model.to_string(), prompt.to_string()));
            let call = prompts.len();
            if self.fail_on == Some(call) {
                return Err(InferenceError::HttpStatus {
                    status: 503,
                    body: "overloaded".to_string(),
                });
            }
            Ok(format!("r{call}"))
        }
    }

    #[tokio::test]
    async fn test_speakers_alternate_starting_from_model_a() {
        let client = ScriptedClient::new();
        let history = have_conversation("A", "B", "hi", 4, &client).await.unwrap();

        let speakers: Vec<&str> = history.iter().map(|t| t.model.as_str()).collect();
        assert_eq!(speakers, vec!["A", "B", "A", "B"]);
        assert_eq!(history[0].text, "r1");
        assert_eq!(history[3].text, "r4");
    }

    #[tokio::test]
    async fn test_zero_turns_yields_empty_history() {
        let client = ScriptedClient::new();
        let history = have_conversation("A", "B", "hi", 0, &client).await.unwrap();
        assert!(history.is_empty());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_turn_same_model_both_sides() {
        let client = ScriptedClient::new();
        let history = have_conversation("A", "A", "hi", 1, &client).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].model, "A");
    }

    #[tokio::test]
    async fn test_transcript_grows_by_annotation_per_turn() {
        let client = ScriptedClient::new();
        have_conversation("A", "B", "hi", 3, &client).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0], ("A".to_string(), "hi".to_string()));
        assert_eq!(calls[1], ("B".to_string(), "hi\nA: r1".to_string()));
        assert_eq!(calls[2], ("A".to_string(), "hi\nA: r1\nB: r2".to_string()));
    }

    #[tokio::test]
    async fn test_client_failure_aborts_whole_conversation() {
        let client = ScriptedClient::failing_on(3);
        let err = have_conversation("A", "B", "hi", 4, &client).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        // The two successful turns happened, but no history survives.
        assert_eq!(client.calls().len(), 3);
    }
}
