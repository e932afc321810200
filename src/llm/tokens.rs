//! Token counting for the diff budget.

use tiktoken_rs::CoreBPE;

use crate::error::ConfigError;

/// Context window of the completion model, in tokens.
pub const CONTEXT_WINDOW_TOKENS: usize = 512_000;

/// Diffs above this many tokens are summarized in two halves.
pub const TOKEN_LIMIT: usize = CONTEXT_WINDOW_TOKENS / 2;

/// Model the budget is measured against.
pub const ENCODER_MODEL: &str = "gpt-4";

pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// BPE-based counter backed by `tiktoken-rs`.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn for_model(model: &str) -> Result<Self, ConfigError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| ConfigError::Tokenizer {
            model: model.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}
