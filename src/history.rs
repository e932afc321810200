//! Persisted history of CLI-help questions.
//!
//! The file is newline-delimited, oldest first, and only ever appended to.
//! In memory the entries are kept most recent first. I/O failures are logged
//! and never surface to the caller.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Maximum number of entries kept in memory.
pub const HISTORY_CAPACITY: usize = 1000;

/// File name of the history file in the home directory.
pub const HISTORY_FILE_NAME: &str = ".gitgpt_cli_history";

#[derive(Debug, Default)]
pub struct CliHistory {
    path: Option<PathBuf>,
    entries: Vec<String>,
    loaded: bool,
}

impl CliHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            entries: Vec::new(),
            loaded: false,
        }
    }

    /// History that is never persisted.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
            loaded: true,
        }
    }

    /// Default location: `~/.gitgpt_cli_history`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load entries from disk once, creating the file if it is missing.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let Some(path) = self.path.clone() else {
            return;
        };

        if !path.exists() {
            if let Err(e) = fs::write(&path, "") {
                warn!("Could not create history file {}: {}", path.display(), e);
                return;
            }
        }

        match fs::read_to_string(&path) {
            Ok(data) => {
                self.entries = data
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .rev()
                    .take(HISTORY_CAPACITY)
                    .map(str::to_string)
                    .collect();
                debug!("Loaded {} CLI help history items", self.entries.len());
            }
            Err(e) => warn!("Could not read history file {}: {}", path.display(), e),
        }
    }

    /// Record an entry unless it is blank or repeats the latest one.
    pub fn append(&mut self, entry: &str) {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.first().is_some_and(|latest| latest.trim() == trimmed) {
            return;
        }

        if let Some(path) = &self.path {
            let written = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut file| writeln!(file, "{trimmed}"));
            if let Err(e) = written {
                warn!("Could not append to history file {}: {}", path.display(), e);
                return;
            }
        }

        self.entries.insert(0, trimmed.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
