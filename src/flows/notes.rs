//! Release-facing summaries of last week's commits.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::changelog::append_notes;
use crate::error::FlowError;
use crate::git::last_week;
use crate::interact::is_yes;
use crate::transcript::Role;

use super::{AppContext, Flow, FlowControl};

const PATCH_NOTES_RULES: &str = r#"
      Patch Notes Rules:
      1. Use the git log output to create a list of patch notes.
      2. Group similar changes together.
      3. Do NOT include the commit hash.
      4. Do NOT include the commit message.
      5. Do NOT include the commit date.
      6. Do NOT include the commit author.
      7. Leave out anything that is not relevant to the user.
      8. The notes should be concise and descriptive.
      9. English only.
      10. Should be read by a non-technical person.
      11. Each line should start with a - (dash).
"#;

// Numbering skips 10.
const CL_NOTES_RULES: &str = r#"
      Feature Rules:
      1. Use the git log output to create a list of notes.
      2. Group similar changes together.
      3. Do NOT include the commit hash.
      4. Do NOT include the commit message.
      5. Do NOT include the commit date.
      6. Do NOT include the commit author.
      7. Leave out anything that is not relevant to the CL.
      8. The notes should be concise and descriptive.
      9. English only.
      11. Explain the change in a way that a non-technical person can understand.
      12. Each line should start with a - (dash).
      13. A maximum of 5 notes. - Therefore, group similar changes together so only the most important ones are listed.
"#;

pub fn build_patch_notes_prompt(log: &str) -> String {
    format!(
        r#"
      The user wants to see the patch notes for the last month.
      Based on the following git log output, create a list of patch notes:
      {log}

      {PATCH_NOTES_RULES}

      Please list those notes on new lines.
    "#
    )
}

pub fn build_cl_notes_prompt(log: &str) -> String {
    format!(
        r#"
      The user wants to see what features have been added in the last week.
      Based on the following git log output, create a list of features:

      {log}

      {CL_NOTES_RULES}

      Please list those notes on new lines.
    "#
    )
}

/// Complete `prompt` into the transcript and copy the answer.
async fn summarize(ctx: &mut AppContext, prompt: String) -> Result<(), FlowError> {
    ctx.transcript.append_turn(Role::User, prompt);
    ctx.gateway.complete_and_record(&mut ctx.transcript).await?;
    ctx.copy_latest_to_clipboard();
    ctx.console.empty_line(2);
    Ok(())
}

fn last_week_log(ctx: &AppContext) -> Result<String, FlowError> {
    let log = ctx.git.recent_log(last_week(Utc::now()))?;
    debug!("Summarizing {} commits from the last week", log.len());
    Ok(log.join("\n"))
}

/// User-facing patch notes, optionally appended to the changelog.
pub struct PatchNotesFlow;

#[async_trait]
impl Flow for PatchNotesFlow {
    fn name(&self) -> &'static str {
        "patch notes"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.header("PATCH NOTES");

        let log = last_week_log(ctx)?;
        summarize(ctx, build_patch_notes_prompt(&log)).await?;

        let answer = ctx.prompter.ask("Do you want to write the patch notes? (y/N)")?;
        if is_yes(&answer) {
            let notes = ctx.transcript.latest_content()?;
            append_notes(&ctx.changelog_path, notes)?;
            ctx.console.info(&format!(
                "Patch notes written to file: {}",
                ctx.changelog_path.display()
            ));
        }

        Ok(FlowControl::Continue)
    }
}

/// At most five non-technical feature notes for customer leads.
pub struct ClNotesFlow;

#[async_trait]
impl Flow for ClNotesFlow {
    fn name(&self) -> &'static str {
        "cl notes"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.header("CL NOTES");

        let log = last_week_log(ctx)?;
        summarize(ctx, build_cl_notes_prompt(&log)).await?;

        Ok(FlowControl::Continue)
    }
}
