use async_trait::async_trait;

use crate::commit::collapse_spaces;
use crate::error::FlowError;
use crate::transcript::{Role, UNLOCK_PHRASE};

use super::{AppContext, Flow, FlowControl};

const EXAMPLE_NOTE: &str = "Example: Resolved issue with 'show all' for Feature B module.";

const TIME_ESTIMATE_NOTE: &str =
    "I only accept ranges like 0.5-1 hour, 1-2 hours, or 2-3 days. I just need one range answer.";

/// Turn that lifts the command-only persona for the rest of the run.
pub fn unlock_turn() -> String {
    format!("Good - {UNLOCK_PHRASE} - from now on you can chat like a normal person.")
}

/// Prompt asking for a client note and one time range.
pub fn build_estimate_prompt(hint: Option<&str>) -> String {
    let hint_info = hint
        .filter(|h| !h.trim().is_empty())
        .map(|h| {
            format!(
                r#"
      The user provided this hint for the note. Please incorporate it into your note: "{h}"
        "#
            )
        })
        .unwrap_or_default();

    collapse_spaces(&format!(
        r#"
      Based on the information I have provided, how could a note look like for the client?
      The note should not be very technical, as it is for the client.

      {EXAMPLE_NOTE}

      Also, how long time would you estimate that the changes in the diff would take to implement?
      {TIME_ESTIMATE_NOTE}

      {hint_info}

      Please list those answers in points on new lines.

      Example:
      1. Added functionality to provide estimation. Made the process more user-friendly with non-technical language.
      2. Estimated implementation time: 1-2 hours.
    "#
    ))
}

/// Client note and time range for the conversation so far.
pub struct EstimateFlow;

#[async_trait]
impl Flow for EstimateFlow {
    fn name(&self) -> &'static str {
        "estimate"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.header("Harvest");

        ctx.transcript.append_turn(Role::User, unlock_turn());
        ctx.transcript
            .append_turn(Role::User, build_estimate_prompt(ctx.flags.hint()));
        ctx.gateway.complete_and_record(&mut ctx.transcript).await?;

        Ok(FlowControl::Continue)
    }
}
