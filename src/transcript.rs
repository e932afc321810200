//! The in-memory conversation sent to the completion provider.
//!
//! One transcript lives for one CLI invocation. It always starts with the
//! system persona turn and only ever grows by appending.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TranscriptError;

/// Phrase that lets the assistant answer outside of shell commands.
pub const UNLOCK_PHRASE: &str = "NOW_CHAT";

/// System persona sent as the first turn of every transcript.
pub const SYSTEM_PROMPT: &str = "You help the user with CLI commands. Your main response is only UNIX commands. You are a CLI assistant. Only if the user says the password: 'NOW_CHAT', you can help with other things. Never answer in markdown or code. Always answer in plain text";

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Ordered, append-only list of turns for the current run.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create a transcript seeded with the system persona.
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::system(SYSTEM_PROMPT)],
        }
    }

    /// Create a transcript with no turns at all.
    pub fn empty() -> Self {
        Self { turns: Vec::new() }
    }

    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        let content = content.into();
        debug!("Adding {} message ({} chars)", role, content.len());
        self.turns.push(Turn::new(role, content));
    }

    /// Content of the most recently appended turn.
    pub fn latest_content(&self) -> Result<&str, TranscriptError> {
        self.turns
            .last()
            .map(|turn| turn.content.as_str())
            .ok_or(TranscriptError::EmptyTranscript)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
