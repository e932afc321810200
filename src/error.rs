//! Error types for gitgpt modules using thiserror.

use thiserror::Error;

use crate::llm::Provider;

/// Errors from the in-memory conversation transcript.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Transcript is empty: no message has been added yet")]
    EmptyTranscript,
}

/// Errors from a streamed chat completion.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("No API key configured for {provider}. Set {env_var}.")]
    MissingApiKey {
        provider: Provider,
        env_var: &'static str,
    },

    #[error("Request to {provider} failed: {source}")]
    Request {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("{provider} stream was interrupted: {source}")]
    Stream {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} sent an unparseable stream payload: {detail}")]
    InvalidPayload { provider: Provider, detail: String },
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to read repository status: {0}")]
    StatusFailed(#[source] git2::Error),

    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to create branch '{name}': {source}")]
    BranchFailed {
        name: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from command-line flag parsing.
#[derive(Error, Debug)]
pub enum FlagError {
    #[error("Invalid arguments: {0}")]
    Invalid(#[source] clap::Error),
}

/// Errors from environment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid CLIENT_TYPE '{0}'. Expected 'openai' or 'groq'.")]
    InvalidClientType(String),

    #[error("Failed to load tokenizer for {model}: {detail}")]
    Tokenizer { model: String, detail: String },
}

/// Errors from changelog operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to write changelog: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Errors from clipboard access.
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("No clipboard helper found (tried pbcopy, wl-copy, xclip, clip)")]
    Unavailable,

    #[error("Failed to run {program}: {source}")]
    Io {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}")]
    NonZeroExit { program: &'static str, code: i32 },
}

/// Errors surfaced by a queued flow.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Git operation failed: {0}")]
    Git(#[from] GitError),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    #[error("Interactive prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Generated commit message is empty")]
    EmptyCommitMessage,

    #[error("Generated branch name '{0}' is not a valid git branch name")]
    InvalidBranchName(String),
}
