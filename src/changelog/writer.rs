//! Append generated notes to the changelog file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::error::ChangelogError;

/// Format a dated notes section.
pub fn format_notes_section(date: NaiveDate, notes: &str) -> String {
    format!(
        "## {} (auto-generated) (last week)\n\n{}\n\n",
        date.format("%Y-%m-%d"),
        notes
    )
}

/// Append today's notes section to `path`, creating the file if needed.
///
/// Existing content is never rewritten.
pub fn append_notes(path: &Path, notes: &str) -> Result<(), ChangelogError> {
    let section = format_notes_section(Utc::now().date_naive(), notes);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(ChangelogError::WriteFailed)?;
    file.write_all(section.as_bytes())
        .map_err(ChangelogError::WriteFailed)?;

    Ok(())
}
