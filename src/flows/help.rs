use async_trait::async_trait;

use crate::error::FlowError;
use crate::flags::help_text;

use super::{AppContext, Flow, FlowControl};

/// Print usage and end the run.
pub struct HelpFlow;

#[async_trait]
impl Flow for HelpFlow {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.console.line(&help_text());
        Ok(FlowControl::Halt)
    }
}
