//! Commit message extraction and style validation.
//!
//! The completion is asked to answer as `git commit -m "<message>"`. That
//! shape is a convention of the prompt, not a guarantee, so extraction
//! falls back to the raw text when the wrapper is missing.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Longest subject that passes validation.
pub const MAX_SUBJECT_LENGTH: usize = 50;

const NON_IMPERATIVE_WORDS: [&str; 8] = [
    "adds", "added", "fixes", "fixed", "updates", "updated", "changes", "changed",
];

const VAGUE_TERMS: [&str; 5] = ["stuff", "things", "some", "various", "misc"];

static COMMIT_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)git commit -m "(.+)""#).expect("valid regex"));

/// Outcome of [`validate_commit_message`]. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub suggestions: Vec<String>,
}

/// Inner text of `git commit -m "..."`, if the wrapper is present.
pub fn extract_commit_text(message: &str) -> Option<&str> {
    COMMIT_COMMAND
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The message to validate or apply: the wrapped text, or the raw input.
pub fn commit_text(message: &str) -> &str {
    extract_commit_text(message).unwrap_or(message)
}

/// Lint a generated commit message against the style rules.
pub fn validate_commit_message(message: &str) -> ValidationResult {
    let text = commit_text(message);
    let lowered = text.to_lowercase();
    let mut suggestions = Vec::new();

    if text.chars().count() > MAX_SUBJECT_LENGTH {
        suggestions.push("Consider shortening the message to 50 characters or less".to_string());
    }

    let first_word = lowered.split(' ').next().unwrap_or("");
    if NON_IMPERATIVE_WORDS
        .iter()
        .any(|word| first_word.contains(word))
    {
        suggestions.push("Use imperative mood (\"Add\" instead of \"Adds\" or \"Added\")".to_string());
    }

    if VAGUE_TERMS.iter().any(|term| lowered.contains(term)) {
        suggestions.push("Be more specific instead of using vague terms".to_string());
    }

    if let Some(first) = text.chars().next()
        && first.to_uppercase().ne(std::iter::once(first))
    {
        suggestions.push("Start with a capital letter".to_string());
    }

    if text.ends_with('.') {
        suggestions.push("Remove the ending period".to_string());
    }

    ValidationResult {
        is_valid: suggestions.is_empty(),
        suggestions,
    }
}

/// Hint used for the regeneration round.
pub fn improvement_hint(suggestions: &[String]) -> String {
    format!("Please improve the message by: {}", suggestions.join("; "))
}
