//! One-line commit history via git2 revwalk.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use git2::{Commit, ErrorCode, Repository, Sort};

use crate::error::GitError;

/// Number of previous subjects fed to the commit prompt.
pub const PREVIOUS_COMMIT_COUNT: usize = 5;

/// `git log` default date format (`%ad`).
const GIT_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

fn short_hash(commit: &Commit<'_>) -> Result<String, GitError> {
    let buf = commit
        .as_object()
        .short_id()
        .map_err(GitError::RevwalkError)?;
    Ok(buf.as_str().unwrap_or_default().to_string())
}

fn subject(commit: &Commit<'_>) -> String {
    commit.summary().unwrap_or_default().to_string()
}

fn commit_date(commit: &Commit<'_>) -> Option<DateTime<FixedOffset>> {
    let time = commit.time();
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    offset.timestamp_opt(time.seconds(), 0).single()
}

/// Walk non-merge commits from HEAD, newest first.
///
/// An unborn HEAD yields nothing. `visit` returns `false` to stop the walk.
fn walk_from_head<F>(repo: &Repository, mut visit: F) -> Result<(), GitError>
where
    F: FnMut(&Commit<'_>) -> Result<bool, GitError>,
{
    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    match revwalk.push_head() {
        Ok(()) => {}
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(());
        }
        Err(e) => return Err(GitError::RevwalkError(e)),
    }

    for oid in revwalk {
        let oid = oid.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::RevwalkError)?;
        if commit.parent_count() > 1 {
            continue;
        }
        if !visit(&commit)? {
            break;
        }
    }

    Ok(())
}

/// The latest `limit` commits as `<short-hash> <date> <subject>`.
pub fn previous_commit_messages(repo: &Repository, limit: usize) -> Result<Vec<String>, GitError> {
    let mut lines = Vec::with_capacity(limit);
    if limit == 0 {
        return Ok(lines);
    }

    walk_from_head(repo, |commit| {
        let date = commit_date(commit)
            .map(|d| d.format(GIT_DATE_FORMAT).to_string())
            .unwrap_or_default();
        lines.push(format!("{} {} {}", short_hash(commit)?, date, subject(commit)));
        Ok(lines.len() < limit)
    })?;

    Ok(lines)
}

/// Commits made since `since` as `<short-hash> <subject>`, newest first.
pub fn log_since(repo: &Repository, since: DateTime<Utc>) -> Result<Vec<String>, GitError> {
    let cutoff = since.timestamp();
    let mut lines = Vec::new();

    walk_from_head(repo, |commit| {
        if commit.time().seconds() < cutoff {
            return Ok(true);
        }
        lines.push(format!("{} {}", short_hash(commit)?, subject(commit)));
        Ok(true)
    })?;

    Ok(lines)
}

/// Cutoff matching `git log --since='last week'`: seven days before `now`.
pub fn last_week(now: DateTime<Utc>) -> DateTime<Utc> {
    now - chrono::Duration::days(7)
}
