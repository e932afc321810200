//! FIFO queue of flows, drained one at a time.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::error::FlowError;
use crate::flags::FlagSet;

use super::{
    AddFilesFlow, AppContext, ApplyCommitFlow, CliHelpFlow, ClNotesFlow, CommitFlow, EstimateFlow,
    Flow, FlowControl, HelpFlow, PatchNotesFlow, PrFlow, PushFlow, StatusFlow,
};

#[derive(Default)]
pub struct FlowQueue {
    items: VecDeque<Box<dyn Flow>>,
}

impl FlowQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, flow: impl Flow + 'static) {
        self.items.push_back(Box::new(flow));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Names of the queued flows, front first.
    pub fn names(&self) -> Vec<&'static str> {
        self.items.iter().map(|flow| flow.name()).collect()
    }

    /// Run every flow in enqueue order, each to completion before the next.
    ///
    /// The first error stops the drain and is returned. A flow returning
    /// [`FlowControl::Halt`] stops it without error.
    pub async fn drain(&mut self, ctx: &mut AppContext) -> Result<(), FlowError> {
        while let Some(flow) = self.items.pop_front() {
            ctx.console
                .verbose_info(&format!("Running: [{}]", flow.name()));

            if flow.run(ctx).await? == FlowControl::Halt {
                debug!(
                    "{} halted the queue, dropping {} flows",
                    flow.name(),
                    self.items.len()
                );
                self.items.clear();
                return Ok(());
            }
        }

        ctx.console.verbose_info("Done");
        ctx.console.empty_line(1);
        Ok(())
    }
}

/// Build the queue for `flags` in priority order.
pub fn build_queue(flags: &FlagSet) -> FlowQueue {
    let mut queue = FlowQueue::new();

    if flags.patch {
        queue.enqueue(PatchNotesFlow);
    }
    if flags.cl {
        queue.enqueue(ClNotesFlow);
    }
    if flags.help {
        queue.enqueue(HelpFlow);
    }
    if flags.cli_help_only() {
        queue.enqueue(CliHelpFlow);
    }
    if flags.add || flags.gg {
        queue.enqueue(AddFilesFlow);
    }
    if flags.commit || flags.gg {
        queue.enqueue(CommitFlow);
    }
    if flags.push || flags.gg {
        queue.enqueue(ApplyCommitFlow);
        queue.enqueue(PushFlow);
    }
    if flags.estimate {
        queue.enqueue(EstimateFlow);
    }
    if flags.pr {
        queue.enqueue(PrFlow);
    }
    if !flags.has_flow_flag() || flags.add {
        queue.enqueue(StatusFlow);
        queue.enqueue(CommitFlow);
    }

    info!("Queued flows: {}", queue.names().join(", "));
    queue
}
