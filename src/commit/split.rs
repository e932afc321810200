//! Oversized diffs: summarize each half, then merge the partial messages.

use tracing::debug;

use crate::error::CompletionError;
use crate::llm::CompletionGateway;
use crate::transcript::Turn;

use super::prompt::{build_commit_prompt, build_merge_prompt};

/// Result of the merge completion. Only this pair belongs in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub prompt: String,
    pub message: String,
}

/// Split `text` at the middle character, the first half taking the extra
/// character when the length is odd.
pub fn split_string_in_half(text: &str) -> (&str, &str) {
    let chars = text.chars().count();
    let mid = chars.div_ceil(2);
    let byte_index = text
        .char_indices()
        .nth(mid)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.split_at(byte_index)
}

/// Complete each half without saving, then merge the joined partials.
///
/// Halves run strictly one after the other. Nothing is appended to any
/// transcript here; the caller records the returned merge prompt and message.
pub async fn split_big_diff(
    gateway: &CompletionGateway,
    diff: &str,
    previous: &[String],
    hint: Option<&str>,
) -> Result<MergeOutcome, CompletionError> {
    let (first, second) = split_string_in_half(diff);

    let mut partials = String::new();
    for (index, chunk) in [first, second].into_iter().enumerate() {
        debug!("Completing diff half {} ({} chars)", index + 1, chunk.len());
        let prompt = build_commit_prompt(chunk, previous, hint);
        let partial = gateway.complete(&[Turn::user(prompt)]).await?;
        partials.push_str(&partial);
    }

    let prompt = build_merge_prompt(&partials);
    let message = gateway.complete(&[Turn::user(prompt.clone())]).await?;

    Ok(MergeOutcome { prompt, message })
}
