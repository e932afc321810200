//! Git operations: git2 for reads and the index, the `git` binary for
//! commit and push.

pub mod command;
pub mod commits;
pub mod status;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::{IndexAddOption, Reference, Repository};
use tracing::debug;

use crate::commit::diff::render_staged_diff;
use crate::error::GitError;

pub use command::{GitOutput, run_git};
pub use commits::{PREVIOUS_COMMIT_COUNT, last_week, log_since, previous_commit_messages};
pub use status::{ahead_behind, short_status};

/// Whether `name` is usable as a local branch name.
pub fn is_valid_branch_name(name: &str) -> bool {
    !name.is_empty() && Reference::is_valid_name(&format!("refs/heads/{name}"))
}

/// Repository operations the flows depend on.
#[cfg_attr(test, mockall::automock)]
pub trait GitWorkspace: Send + Sync {
    /// Staged diff rendered with the `$ ` line prefix, or the no-changes sentinel.
    fn staged_diff(&self) -> Result<String, GitError>;

    /// The latest `limit` non-merge commits as one-line summaries.
    fn previous_commit_messages(&self, limit: usize) -> Result<Vec<String>, GitError>;

    fn status(&self) -> Result<String, GitError>;

    fn staged_file_count(&self) -> Result<usize, GitError>;

    fn is_branch_ahead(&self) -> Result<bool, GitError>;

    /// Stage additions, modifications and deletions (`git add -A`).
    fn stage_all(&self) -> Result<(), GitError>;

    fn commit(&self, message: &str) -> Result<String, GitError>;

    fn push(&self) -> Result<String, GitError>;

    /// Create a branch at HEAD and check it out.
    fn create_branch(&self, name: &str) -> Result<(), GitError>;

    /// Non-merge commits since `since` as `<short-hash> <subject>`.
    fn recent_log(&self, since: DateTime<Utc>) -> Result<Vec<String>, GitError>;
}

/// [`GitWorkspace`] over the repository containing `path`.
#[derive(Debug, Clone)]
pub struct Git2Workspace {
    path: PathBuf,
}

impl Git2Workspace {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Repository, GitError> {
        Repository::discover(&self.path).map_err(GitError::OpenRepository)
    }

    /// Directory git subprocesses run in.
    fn workdir(&self) -> Result<PathBuf, GitError> {
        let repo = self.open()?;
        Ok(repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.path.clone()))
    }
}

impl GitWorkspace for Git2Workspace {
    fn staged_diff(&self) -> Result<String, GitError> {
        render_staged_diff(&self.open()?)
    }

    fn previous_commit_messages(&self, limit: usize) -> Result<Vec<String>, GitError> {
        previous_commit_messages(&self.open()?, limit)
    }

    fn status(&self) -> Result<String, GitError> {
        short_status(&self.open()?)
    }

    fn staged_file_count(&self) -> Result<usize, GitError> {
        let repo = self.open()?;
        let head_tree = crate::commit::diff::resolve_head_tree(&repo)?;
        let diff = repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)
            .map_err(GitError::DiffFailed)?;
        Ok(diff.deltas().len())
    }

    fn is_branch_ahead(&self) -> Result<bool, GitError> {
        Ok(ahead_behind(&self.open()?)?.is_some_and(|(_, ahead, _)| ahead > 0))
    }

    fn stage_all(&self) -> Result<(), GitError> {
        let repo = self.open()?;
        let mut index = repo.index().map_err(GitError::StagingFailed)?;
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .map_err(GitError::StagingFailed)?;
        index
            .update_all(["*"].iter(), None)
            .map_err(GitError::StagingFailed)?;
        index.write().map_err(GitError::StagingFailed)?;
        debug!("Staged {} index entries", index.len());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String, GitError> {
        let output = run_git(&self.workdir()?, &["commit", "-m", message], "commit")?;
        Ok(output.combined())
    }

    fn push(&self) -> Result<String, GitError> {
        let output = run_git(&self.workdir()?, &["push"], "push")?;
        Ok(output.combined())
    }

    fn create_branch(&self, name: &str) -> Result<(), GitError> {
        let repo = self.open()?;
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|source| GitError::BranchFailed {
                name: name.to_string(),
                source,
            })?;
        let branch = repo
            .branch(name, &head, false)
            .map_err(|source| GitError::BranchFailed {
                name: name.to_string(),
                source,
            })?;
        let refname = branch.get().name().unwrap_or_default().to_string();
        repo.set_head(&refname)
            .map_err(|source| GitError::BranchFailed {
                name: name.to_string(),
                source,
            })?;
        Ok(())
    }

    fn recent_log(&self, since: DateTime<Utc>) -> Result<Vec<String>, GitError> {
        log_since(&self.open()?, since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name_validation() {
        assert!(is_valid_branch_name("feature/user-login"));
        assert!(is_valid_branch_name("bug/fix-validation-error"));
        assert!(!is_valid_branch_name(""));
        assert!(!is_valid_branch_name("feature/has space"));
        assert!(!is_valid_branch_name("feature..double-dot"));
        assert!(!is_valid_branch_name("ends-with/"));
        assert!(!is_valid_branch_name("; rm -rf ~"));
    }

    #[test]
    fn test_open_outside_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Git2Workspace::new(dir.path());
        assert!(matches!(
            workspace.status(),
            Err(GitError::OpenRepository(_))
        ));
    }
}
