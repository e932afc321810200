//! Branch naming for a pull request from the staged diff.

use async_trait::async_trait;
use tracing::warn;

use crate::commit::is_no_changes;
use crate::error::FlowError;
use crate::git::is_valid_branch_name;
use crate::llm::CompletionGateway;
use crate::transcript::Turn;

use super::{AppContext, Flow, FlowControl};

const BRANCH_RULES: &str = r#"
        Branch Naming Rules:
        1. Start with one of: feature/, chore/, bug/, hotfix/
        2. Use kebab-case (lowercase with hyphens)
        3. Be descriptive but concise (max 30 characters after prefix)
        4. Use present tense verbs
        5. No special characters except hyphens
        6. English only

        Type Guidelines:
        - feature/: New functionality or enhancements
        - chore/: Maintenance, refactoring, or tooling changes
        - bug/: Bug fixes
        - hotfix/: Critical production fixes

        Examples:
        - feature/user-login
        - feature/payment-integration
        - chore/update-dependencies
        - bug/fix-validation-error
        - hotfix/security-patch
"#;

pub fn build_branch_prompt(diff: &str) -> String {
    format!(
        r#"
        Based on the following git diff, generate a branch name that follows the rules below.

        {BRANCH_RULES}

        Respond with ONLY the branch name, nothing else.

        Diff:
        {diff}
    "#
    )
}

/// Ask for a branch name, create the branch and switch to it.
pub struct PrFlow;

impl PrFlow {
    /// Trimmed suggestion, or `None` when the completion failed or came back empty.
    async fn generate_branch_name(gateway: &CompletionGateway, diff: &str) -> Option<String> {
        let prompt = build_branch_prompt(diff);
        match gateway.complete(&[Turn::user(prompt)]).await {
            Ok(name) => Some(name.trim().to_string()).filter(|n| !n.is_empty()),
            Err(e) => {
                warn!("Error generating branch name: {e}");
                None
            }
        }
    }

    fn checkout(ctx: &AppContext, name: &str) -> Result<(), FlowError> {
        if !is_valid_branch_name(name) {
            return Err(FlowError::InvalidBranchName(name.to_string()));
        }
        ctx.git.create_branch(name)?;
        Ok(())
    }
}

#[async_trait]
impl Flow for PrFlow {
    fn name(&self) -> &'static str {
        "pr branch"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.header("PR BRANCH");

        let diff = ctx.git.staged_diff()?;
        if is_no_changes(&diff) {
            ctx.console
                .verbose_info("No changes to create PR branch for");
            return Ok(FlowControl::Continue);
        }

        let Some(name) = Self::generate_branch_name(&ctx.gateway, &diff).await else {
            ctx.console.info("Failed to generate branch name");
            return Ok(FlowControl::Continue);
        };

        ctx.console.info(&format!("Creating branch: {name}"));
        match Self::checkout(ctx, &name) {
            Ok(()) => ctx.console.info(&format!(
                "Successfully created and switched to branch: {name}"
            )),
            Err(e) => ctx
                .console
                .info(&format!("Failed to create branch with error: {e}")),
        }

        Ok(FlowControl::Continue)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::commit::NO_CHANGES;
    use crate::error::GitError;
    use crate::flags::FlagSet;
    use crate::git::MockGitWorkspace;
    use crate::testing::{ScriptedBackend, test_context};

    const DIFF: &str = "$ diff --git a/src/login.rs b/src/login.rs\n$ +fn login() {}\n";

    fn pr_flags() -> FlagSet {
        FlagSet::parse(["pr"]).unwrap()
    }

    fn git_with_diff(diff: &'static str) -> MockGitWorkspace {
        let mut git = MockGitWorkspace::new();
        git.expect_staged_diff()
            .returning(move || Ok(diff.to_string()));
        git
    }

    #[test]
    fn test_prompt_ends_with_diff_section() {
        let prompt = build_branch_prompt(DIFF);
        assert!(prompt.contains("Respond with ONLY the branch name, nothing else."));
        assert!(prompt.contains("feature/user-login"));
        assert!(prompt.contains(&format!("Diff:\n        {DIFF}")));
    }

    #[tokio::test]
    async fn test_creates_trimmed_branch() {
        let mut git = git_with_diff(DIFF);
        git.expect_create_branch()
            .with(eq("feature/user-login"))
            .times(1)
            .returning(|_| Ok(()));
        let backend = ScriptedBackend::new(vec!["  feature/user-login\n"]);
        let (mut ctx, buffer) = test_context(git, &backend, pr_flags());

        PrFlow.run(&mut ctx).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains("Creating branch: feature/user-login"));
        assert!(out.contains("Successfully created and switched to branch: feature/user-login"));
        assert_eq!(ctx.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_name_is_never_checked_out() {
        let mut git = git_with_diff(DIFF);
        git.expect_create_branch().never();
        let backend = ScriptedBackend::new(vec!["feature/x; rm -rf ~"]);
        let (mut ctx, buffer) = test_context(git, &backend, pr_flags());

        let control = PrFlow.run(&mut ctx).await.unwrap();

        assert_eq!(control, FlowControl::Continue);
        assert!(buffer.contents().contains("Failed to create branch with error"));
    }

    #[tokio::test]
    async fn test_branch_failure_is_reported() {
        let mut git = git_with_diff(DIFF);
        git.expect_create_branch().returning(|name| {
            Err(GitError::BranchFailed {
                name: name.to_string(),
                source: git2::Error::from_str("a branch named 'bug/x' already exists"),
            })
        });
        let backend = ScriptedBackend::new(vec!["bug/x"]);
        let (mut ctx, buffer) = test_context(git, &backend, pr_flags());

        PrFlow.run(&mut ctx).await.unwrap();

        assert!(buffer.contents().contains("already exists"));
    }

    #[tokio::test]
    async fn test_failed_generation() {
        let mut git = git_with_diff(DIFF);
        git.expect_create_branch().never();
        let (mut ctx, buffer) = test_context(git, &ScriptedBackend::default(), pr_flags());

        PrFlow.run(&mut ctx).await.unwrap();

        assert!(buffer.contents().contains("Failed to generate branch name"));
    }

    #[tokio::test]
    async fn test_no_changes_skips_completion() {
        let backend = ScriptedBackend::default();
        let (mut ctx, _buffer) = test_context(git_with_diff(NO_CHANGES), &backend, pr_flags());

        PrFlow.run(&mut ctx).await.unwrap();

        assert!(backend.requests().is_empty());
    }
}
