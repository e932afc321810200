//! gitgpt - A CLI assistant that turns git state into commit messages,
//! branch names, estimates and release notes using a chat completion API.
//!
//! # Overview
//!
//! Command-line flags select a queue of flows. Each flow reads the
//! repository through [`git::GitWorkspace`], appends prompts to the run's
//! [`transcript::Transcript`] and streams the answer through
//! [`llm::CompletionGateway`] to the terminal. Flows run strictly one after
//! another; a flow may end the run early.

pub mod changelog;
pub mod clipboard;
pub mod commit;
pub mod config;
pub mod error;
pub mod flags;
pub mod flows;
pub mod git;
pub mod history;
pub mod interact;
pub mod llm;
pub mod output;
pub mod transcript;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use commit::{ChangeType, DiffAnalysis, ValidationResult};
pub use config::Config;
pub use error::{
    ChangelogError, ClipboardError, CompletionError, ConfigError, FlagError, FlowError, GitError,
    TranscriptError,
};
pub use flags::FlagSet;
pub use flows::{AppContext, Flow, FlowControl, FlowQueue, build_queue};
pub use git::{Git2Workspace, GitWorkspace};
pub use transcript::{Role, Transcript, Turn};
