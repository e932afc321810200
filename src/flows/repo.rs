//! Plain repository flows with no completion involved.

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::FlowError;

use super::{AppContext, Flow, FlowControl};

/// Print the branch header and short status.
pub struct StatusFlow;

#[async_trait]
impl Flow for StatusFlow {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.header("STATUS");
        let status = ctx.git.status()?;
        ctx.console.line(&status);
        Ok(FlowControl::Continue)
    }
}

/// Stage every change in the working tree.
pub struct AddFilesFlow;

#[async_trait]
impl Flow for AddFilesFlow {
    fn name(&self) -> &'static str {
        "add files"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.verbose_info("Staging all changes");
        ctx.git.stage_all()?;
        Ok(FlowControl::Continue)
    }
}

/// Push the current branch. A failed push is reported, not fatal.
pub struct PushFlow;

#[async_trait]
impl Flow for PushFlow {
    fn name(&self) -> &'static str {
        "push"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        if ctx.git.staged_file_count()? == 0 && !ctx.git.is_branch_ahead()? {
            ctx.console.info("No files to commit: <push>");
            return Ok(FlowControl::Continue);
        }

        ctx.console.info("Pushing to origin");
        match ctx.git.push() {
            Ok(output) => {
                info!("Push finished");
                ctx.console.line(&output);
            }
            Err(e) => {
                error!("Push failed: {e}");
                ctx.console.line(&e.to_string());
            }
        }

        Ok(FlowControl::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitError;
    use crate::flags::FlagSet;
    use crate::git::MockGitWorkspace;
    use crate::testing::{ScriptedBackend, test_context};

    #[tokio::test]
    async fn test_status_prints_header_and_status() {
        let mut git = MockGitWorkspace::new();
        git.expect_status()
            .returning(|| Ok("## main...origin/main [ahead 1]\n M src/lib.rs".to_string()));
        let (mut ctx, buffer) = test_context(git, &ScriptedBackend::default(), FlagSet::default());

        StatusFlow.run(&mut ctx).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains("STATUS"));
        assert!(out.contains("## main...origin/main [ahead 1]\n M src/lib.rs"));
    }

    #[tokio::test]
    async fn test_add_files_stages_everything() {
        let mut git = MockGitWorkspace::new();
        git.expect_stage_all().times(1).returning(|| Ok(()));
        let (mut ctx, _buffer) = test_context(git, &ScriptedBackend::default(), FlagSet::default());

        AddFilesFlow.run(&mut ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_push_when_ahead() {
        let mut git = MockGitWorkspace::new();
        git.expect_staged_file_count().returning(|| Ok(0));
        git.expect_is_branch_ahead().returning(|| Ok(true));
        git.expect_push()
            .times(1)
            .returning(|| Ok("To github.com:acme/app.git\n   abc..def  main -> main".to_string()));
        let (mut ctx, buffer) = test_context(git, &ScriptedBackend::default(), FlagSet::default());

        PushFlow.run(&mut ctx).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains(">>>> Pushing to origin"));
        assert!(out.contains("main -> main"));
    }

    #[tokio::test]
    async fn test_push_skipped_without_work() {
        let mut git = MockGitWorkspace::new();
        git.expect_staged_file_count().returning(|| Ok(0));
        git.expect_is_branch_ahead().returning(|| Ok(false));
        git.expect_push().never();
        let (mut ctx, buffer) = test_context(git, &ScriptedBackend::default(), FlagSet::default());

        PushFlow.run(&mut ctx).await.unwrap();

        assert!(buffer.contents().contains("No files to commit: <push>"));
    }

    #[tokio::test]
    async fn test_push_failure_does_not_stop_the_queue() {
        let mut git = MockGitWorkspace::new();
        git.expect_staged_file_count().returning(|| Ok(1));
        git.expect_push().returning(|| {
            Err(GitError::CommandFailed {
                operation: "push".to_string(),
                stderr: "fatal: no upstream".to_string(),
            })
        });
        let (mut ctx, buffer) = test_context(git, &ScriptedBackend::default(), FlagSet::default());

        let control = PushFlow.run(&mut ctx).await.unwrap();

        assert_eq!(control, FlowControl::Continue);
        assert!(buffer.contents().contains("fatal: no upstream"));
    }
}
