//! Commit message generation and application.

use async_trait::async_trait;
use tracing::debug;

use crate::commit::{
    build_commit_prompt, commit_text, improvement_hint, is_no_changes, split_big_diff,
    validate_commit_message,
};
use crate::error::FlowError;
use crate::git::PREVIOUS_COMMIT_COUNT;
use crate::interact::is_yes;
use crate::llm::TOKEN_LIMIT;
use crate::transcript::Role;

use super::{AppContext, Flow, FlowControl};

/// Generate a commit message for `diff` and record it in the transcript.
///
/// Diffs over the token ceiling go through split and merge; only the merge
/// prompt and its result are recorded in that case.
pub async fn generate_commit_message(
    ctx: &mut AppContext,
    diff: &str,
) -> Result<String, FlowError> {
    let previous = ctx.git.previous_commit_messages(PREVIOUS_COMMIT_COUNT)?;
    let tokens = ctx.tokens.count(diff);
    debug!("Diff is {tokens} tokens (limit {TOKEN_LIMIT})");

    if tokens > TOKEN_LIMIT {
        ctx.console
            .verbose_info("Diff is too big, splitting into two chunks");
        let outcome = split_big_diff(&ctx.gateway, diff, &previous, ctx.flags.hint()).await?;
        ctx.transcript.append_turn(Role::User, outcome.prompt);
        ctx.transcript
            .append_turn(Role::Assistant, outcome.message.clone());
        return Ok(outcome.message);
    }

    ctx.console.verbose_info(&format!("Diff is: {diff}"));
    let prompt = build_commit_prompt(diff, &previous, ctx.flags.hint());
    ctx.transcript.append_turn(Role::User, prompt);
    Ok(ctx.gateway.complete_and_record(&mut ctx.transcript).await?)
}

/// Generate a commit message, validate it and offer one regeneration.
pub struct CommitFlow;

impl CommitFlow {
    async fn produce(ctx: &mut AppContext, diff: &str) -> Result<String, FlowError> {
        let message = generate_commit_message(ctx, diff).await?;
        ctx.copy_latest_to_clipboard();
        ctx.commit_message = Some(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl Flow for CommitFlow {
    fn name(&self) -> &'static str {
        "commit"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        let diff = ctx.git.staged_diff()?;
        if is_no_changes(&diff) {
            ctx.console.info("No files to commit: <commit>");
            return Ok(FlowControl::Continue);
        }

        ctx.console.header("COMMIT");
        let message = Self::produce(ctx, &diff).await?;

        let validation = validate_commit_message(&message);
        if validation.is_valid {
            if ctx.flags.verbose {
                ctx.console.empty_line(1);
                ctx.console.line("Commit message looks good!");
            }
            return Ok(FlowControl::Continue);
        }

        if ctx.flags.verbose {
            ctx.console.empty_line(1);
            ctx.console.line("Commit message could be improved:");
            for suggestion in &validation.suggestions {
                ctx.console.line(&format!("   • {suggestion}"));
            }
        }

        if ctx.flags.interactive {
            ctx.console.empty_line(1);
            let answer = ctx
                .prompter
                .ask("Would you like to regenerate the commit message? (y/n)")?;
            if is_yes(&answer) {
                ctx.flags
                    .override_hint(improvement_hint(&validation.suggestions));
                let diff = ctx.git.staged_diff()?;
                Self::produce(ctx, &diff).await?;
            }
        }

        Ok(FlowControl::Continue)
    }
}

/// Commit the staged changes with the generated message.
pub struct ApplyCommitFlow;

#[async_trait]
impl Flow for ApplyCommitFlow {
    fn name(&self) -> &'static str {
        "apply commit"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        let staged = ctx.git.staged_file_count()?;
        if staged == 0 {
            if !ctx.git.is_branch_ahead()? {
                ctx.console.info("No files to commit: <apply commit>");
            } else {
                ctx.console
                    .verbose_info("Nothing staged, pushing existing commits");
            }
            return Ok(FlowControl::Continue);
        }

        if ctx.commit_message.is_none() {
            CommitFlow.run(ctx).await?;
        }
        let Some(message) = ctx.commit_message.clone() else {
            ctx.console.info("No commit message was generated: <apply commit>");
            return Ok(FlowControl::Continue);
        };

        let text = commit_text(&message).trim();
        if text.is_empty() {
            return Err(FlowError::EmptyCommitMessage);
        }

        ctx.console
            .verbose_info(&format!("Applying commit with message: {text}"));
        let output = ctx.git.commit(text)?;
        ctx.console.line(&output);

        Ok(FlowControl::Continue)
    }
}
