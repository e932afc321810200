//! Short status rendering, matching `git status --porcelain --branch --short`.

use git2::{Branch, BranchType, Repository, Status, StatusOptions};

use crate::error::GitError;

fn index_char(status: Status) -> char {
    if status.contains(Status::INDEX_NEW) {
        'A'
    } else if status.contains(Status::INDEX_MODIFIED) {
        'M'
    } else if status.contains(Status::INDEX_DELETED) {
        'D'
    } else if status.contains(Status::INDEX_RENAMED) {
        'R'
    } else if status.contains(Status::INDEX_TYPECHANGE) {
        'T'
    } else {
        ' '
    }
}

fn worktree_char(status: Status) -> char {
    if status.contains(Status::WT_MODIFIED) {
        'M'
    } else if status.contains(Status::WT_DELETED) {
        'D'
    } else if status.contains(Status::WT_RENAMED) {
        'R'
    } else if status.contains(Status::WT_TYPECHANGE) {
        'T'
    } else {
        ' '
    }
}

/// Ahead/behind counts of the checked-out branch against its upstream.
pub fn ahead_behind(repo: &Repository) -> Result<Option<(String, usize, usize)>, GitError> {
    let Ok(head) = repo.head() else {
        return Ok(None);
    };
    if !head.is_branch() {
        return Ok(None);
    }
    let Some(name) = head.shorthand() else {
        return Ok(None);
    };
    let branch = repo
        .find_branch(name, BranchType::Local)
        .map_err(GitError::StatusFailed)?;
    let Ok(upstream) = branch.upstream() else {
        return Ok(None);
    };

    let (Some(local), Some(remote)) = (head.target(), upstream.get().target()) else {
        return Ok(None);
    };
    let (ahead, behind) = repo
        .graph_ahead_behind(local, remote)
        .map_err(GitError::StatusFailed)?;

    let upstream_name = upstream_name(&upstream).unwrap_or_default();
    Ok(Some((upstream_name, ahead, behind)))
}

fn upstream_name(upstream: &Branch<'_>) -> Option<String> {
    upstream.name().ok().flatten().map(str::to_string)
}

fn branch_line(repo: &Repository) -> Result<String, GitError> {
    let branch = match repo.head() {
        Ok(head) if head.is_branch() => head.shorthand().unwrap_or("HEAD").to_string(),
        Ok(_) => return Ok("## HEAD (no branch)".to_string()),
        Err(_) => {
            let name = repo
                .find_reference("HEAD")
                .ok()
                .and_then(|r| r.symbolic_target().map(str::to_string))
                .and_then(|t| t.strip_prefix("refs/heads/").map(str::to_string))
                .unwrap_or_else(|| "HEAD".to_string());
            return Ok(format!("## No commits yet on {name}"));
        }
    };

    let mut line = format!("## {branch}");
    if let Some((upstream, ahead, behind)) = ahead_behind(repo)? {
        line.push_str(&format!("...{upstream}"));
        match (ahead, behind) {
            (0, 0) => {}
            (a, 0) => line.push_str(&format!(" [ahead {a}]")),
            (0, b) => line.push_str(&format!(" [behind {b}]")),
            (a, b) => line.push_str(&format!(" [ahead {a}, behind {b}]")),
        }
    }
    Ok(line)
}

/// Render the branch header followed by one `XY path` line per entry.
pub fn short_status(repo: &Repository) -> Result<String, GitError> {
    let mut lines = vec![branch_line(repo)?];

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let statuses = repo.statuses(Some(&mut opts)).map_err(GitError::StatusFailed)?;

    for entry in statuses.iter() {
        let status = entry.status();
        let path = entry.path().unwrap_or_default();
        if status.contains(Status::WT_NEW) && !status.intersects(Status::INDEX_NEW) {
            lines.push(format!("?? {path}"));
            continue;
        }
        let x = index_char(status);
        let y = worktree_char(status);
        if x == ' ' && y == ' ' {
            continue;
        }
        lines.push(format!("{x}{y} {path}"));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn commit_file(repo: &Repository, dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "content\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = git2::Signature::now("Test", "test@test.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[])
            .unwrap();
    }

    #[test]
    fn test_empty_repo_header() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let status = short_status(&repo).unwrap();
        assert!(status.starts_with("## No commits yet on "));
    }

    #[test]
    fn test_entries_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, dir.path(), "tracked.txt");

        std::fs::write(dir.path().join("tracked.txt"), "changed\n").unwrap();
        std::fs::write(dir.path().join("new.txt"), "new\n").unwrap();
        std::fs::write(dir.path().join("staged.txt"), "staged\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("staged.txt")).unwrap();
        index.write().unwrap();

        let status = short_status(&repo).unwrap();
        let lines: Vec<&str> = status.lines().collect();

        assert!(lines[0].starts_with("## "));
        assert!(lines.contains(&" M tracked.txt"));
        assert!(lines.contains(&"?? new.txt"));
        assert!(lines.contains(&"A  staged.txt"));
    }

    #[test]
    fn test_no_upstream_means_no_ahead_info() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, dir.path(), "a.txt");
        assert!(ahead_behind(&repo).unwrap().is_none());
    }
}
