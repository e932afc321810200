//! Heuristic classification of a `$ `-prefixed unified diff.
//!
//! The classifier scans the diff once, tracking the file currently being
//! described, and collects change-type tags in the order they first fire.
//! The first tag becomes the conventional-commit prefix, so insertion order
//! is significant and the tag set is an [`IndexSet`].

use std::fmt;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::diff::DIFF_LINE_PREFIX;

/// Conventional-commit types the classifier can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Feat,
    Fix,
    Refactor,
    Test,
    Docs,
    Chore,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Feat => "feat",
            ChangeType::Fix => "fix",
            ChangeType::Refactor => "refactor",
            ChangeType::Test => "test",
            ChangeType::Docs => "docs",
            ChangeType::Chore => "chore",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural summary of one diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffAnalysis {
    /// Lowercased extensions of touched files.
    pub file_types: IndexSet<String>,
    /// Leading path segment of touched files that live in a directory.
    pub scopes: IndexSet<String>,
    /// Tags in the order they first fired.
    pub change_types: IndexSet<ChangeType>,
    pub added_lines: usize,
    pub removed_lines: usize,
}

impl DiffAnalysis {
    /// First detected tag, `chore` when there is none.
    pub fn conventional_prefix(&self) -> ChangeType {
        self.change_types
            .first()
            .copied()
            .unwrap_or(ChangeType::Chore)
    }

    pub fn file_types_label(&self) -> String {
        join_or(self.file_types.iter().map(String::as_str), "unknown")
    }

    pub fn change_types_label(&self) -> String {
        join_or(self.change_types.iter().map(ChangeType::as_str), "general")
    }
}

fn join_or<'a>(items: impl Iterator<Item = &'a str>, empty: &str) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        empty.to_string()
    } else {
        joined
    }
}

const DEFINITION_KEYWORDS: [&str; 3] = ["function ", "const ", "class "];
const FIX_KEYWORDS: [&str; 3] = ["fix", "bug", "error"];

/// Post-image path of a `diff --git a/<old> b/<new>` header line.
fn header_path(line: &str) -> Option<&str> {
    let header = line
        .strip_prefix(DIFF_LINE_PREFIX)?
        .strip_prefix("diff --git ")?;
    header
        .rsplit_once(" b/")
        .map(|(_, path)| path)
        .filter(|path| !path.is_empty())
}

fn file_type(path: &str) -> String {
    let path = Path::new(path);
    path.extension()
        .or_else(|| path.file_name())
        .map(|part| part.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn file_tags(file: &str, tags: &mut IndexSet<ChangeType>) {
    if file.is_empty() {
        return;
    }
    if file.contains("test") || file.contains("spec") {
        tags.insert(ChangeType::Test);
    }
    if file.ends_with(".md") || file.contains("README") || file.contains("doc") {
        tags.insert(ChangeType::Docs);
    }
    if file.contains("config")
        || file.ends_with(".json")
        || file.ends_with(".yml")
        || file.ends_with(".yaml")
    {
        tags.insert(ChangeType::Chore);
    }
}

/// Classify a `$ `-prefixed diff.
pub fn analyze_changed_files(diff: &str) -> DiffAnalysis {
    let mut analysis = DiffAnalysis::default();
    let mut current_file = String::new();

    for line in diff.split('\n') {
        if let Some(path) = header_path(line) {
            current_file = path.to_string();

            let ext = file_type(path);
            if !ext.is_empty() {
                analysis.file_types.insert(ext);
            }
            if let Some((scope, _)) = path.split_once('/') {
                analysis.scopes.insert(scope.to_string());
            }
        }

        let body = line.strip_prefix(DIFF_LINE_PREFIX).unwrap_or("");
        let is_added = body.starts_with('+');
        let is_removed = body.starts_with('-');
        if is_added && !body.starts_with("+++") {
            analysis.added_lines += 1;
        } else if is_removed && !body.starts_with("---") {
            analysis.removed_lines += 1;
        }

        if DEFINITION_KEYWORDS.iter().any(|kw| line.contains(kw)) {
            if is_added {
                analysis.change_types.insert(ChangeType::Feat);
            } else if is_removed {
                analysis.change_types.insert(ChangeType::Refactor);
            }
        }

        file_tags(&current_file, &mut analysis.change_types);

        let lowered = line.to_lowercase();
        if FIX_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            analysis.change_types.insert(ChangeType::Fix);
        }
    }

    if analysis.change_types.is_empty() {
        let fallback = if analysis.added_lines > analysis.removed_lines * 2 {
            ChangeType::Feat
        } else if analysis.removed_lines > analysis.added_lines * 2 {
            ChangeType::Refactor
        } else {
            ChangeType::Chore
        };
        analysis.change_types.insert(fallback);
    }

    analysis
}
