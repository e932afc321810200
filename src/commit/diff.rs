//! Staged diff rendering using git2.
//!
//! Produces the same text as
//! `git diff -U25 --cached --stat --line-prefix '$ ' -- ':!package-lock.json' ':!composer.lock'`:
//! a stat summary followed by the patch, every line prefixed with `$ `.

use std::path::Path;

use git2::{Diff, DiffFormat, DiffOptions, DiffStatsFormat, ErrorCode, Repository, Tree};
use tracing::debug;

use crate::error::GitError;

/// Marker put in front of every rendered diff line.
pub const DIFF_LINE_PREFIX: &str = "$ ";

/// Rendered in place of an empty diff.
pub const NO_CHANGES: &str = "No changes to commit";

/// Lines of context around each hunk.
pub const CONTEXT_LINES: u32 = 25;

/// Lock files left out of the diff.
pub const EXCLUDED_FILES: [&str; 2] = ["package-lock.json", "composer.lock"];

const STAT_WIDTH: usize = 80;

/// Whether a rendered diff means there is nothing to commit.
pub fn is_no_changes(diff: &str) -> bool {
    let trimmed = diff.trim();
    trimmed.is_empty() || trimmed == NO_CHANGES
}

/// Resolve the HEAD tree, treating an unborn branch as "no tree".
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| EXCLUDED_FILES.contains(&name))
}

/// Paths touched by the index-vs-HEAD diff, lock files removed.
fn staged_paths(repo: &Repository, head_tree: Option<&Tree<'_>>) -> Result<Vec<String>, GitError> {
    let diff = repo
        .diff_tree_to_index(head_tree, None, None)
        .map_err(GitError::DiffFailed)?;

    let mut paths = Vec::new();
    for delta in diff.deltas() {
        let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) else {
            continue;
        };
        if is_excluded(path) {
            debug!("Excluding {} from diff", path.display());
            continue;
        }
        paths.push(path.to_string_lossy().into_owned());
    }
    Ok(paths)
}

fn push_prefixed(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str(DIFF_LINE_PREFIX);
        out.push_str(line);
        out.push('\n');
    }
}

fn render(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut text = String::new();

    let stats = diff.stats().map_err(GitError::DiffFailed)?;
    let stat_buf = stats
        .to_buf(DiffStatsFormat::FULL, STAT_WIDTH)
        .map_err(GitError::DiffFailed)?;
    push_prefixed(&mut text, &String::from_utf8_lossy(&stat_buf));
    text.push_str(DIFF_LINE_PREFIX);
    text.push('\n');

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            origin @ ('+' | '-' | ' ') => push_prefixed(&mut text, &format!("{origin}{content}")),
            _ => push_prefixed(&mut text, &content),
        }
        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok(text)
}

/// Render the staged changes, or [`NO_CHANGES`] when nothing is staged.
pub fn render_staged_diff(repo: &Repository) -> Result<String, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let paths = staged_paths(repo, head_tree.as_ref())?;
    if paths.is_empty() {
        return Ok(NO_CHANGES.to_string());
    }

    let mut opts = DiffOptions::new();
    opts.context_lines(CONTEXT_LINES).disable_pathspec_match(true);
    for path in &paths {
        opts.pathspec(path);
    }

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(GitError::DiffFailed)?;

    debug!("Rendering staged diff over {} files", paths.len());
    render(&diff)
}
