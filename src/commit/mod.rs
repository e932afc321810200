//! Commit message generation: diff rendering, classification, prompts and validation.

pub mod analysis;
pub mod diff;
pub mod message;
pub mod prompt;
pub mod split;

pub use analysis::{ChangeType, DiffAnalysis, analyze_changed_files};
pub use diff::{DIFF_LINE_PREFIX, NO_CHANGES, is_no_changes, render_staged_diff};
pub use message::{
    ValidationResult, commit_text, extract_commit_text, improvement_hint, validate_commit_message,
};
pub use prompt::{build_commit_prompt, build_merge_prompt, collapse_spaces};
pub use split::{MergeOutcome, split_big_diff, split_string_in_half};
