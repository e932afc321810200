//! Git subprocess invocation.
//!
//! Commit and push shell out to the system `git` binary so hooks, the SSH
//! agent and credential helpers behave exactly as on the command line.
//! Arguments are passed as an argv vector, never through a shell.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Captured output of a successful git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Stdout and stderr joined; `git push` reports progress on stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr.trim_end()),
            (false, true) => self.stdout.trim_end().to_string(),
            (true, _) => self.stderr.trim_end().to_string(),
        }
    }
}

/// Run `git <args>` in `workdir` and fail on a non-zero exit.
pub fn run_git(workdir: &Path, args: &[&str], operation: &str) -> Result<GitOutput, GitError> {
    debug!("Running git {} in {}", args.join(" "), workdir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .map_err(|source| GitError::SpawnFailed {
            operation: operation.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(GitOutput { stdout, stderr })
}
