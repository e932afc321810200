//! User-facing flows and the queue that runs them.
//!
//! Every flow receives the one [`AppContext`] of the run explicitly. The
//! transcript, flags and last commit message live there instead of in
//! module state.

pub mod cli_help;
pub mod commit;
pub mod estimate;
pub mod help;
pub mod notes;
pub mod pr;
pub mod queue;
pub mod repo;

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::clipboard::{Clipboard, SystemClipboard};
use crate::error::FlowError;
use crate::flags::FlagSet;
use crate::git::GitWorkspace;
use crate::history::CliHistory;
use crate::interact::{Prompter, TerminalPrompter};
use crate::llm::{CompletionGateway, TokenCounter};
use crate::output::Console;
use crate::transcript::Transcript;

pub use cli_help::CliHelpFlow;
pub use commit::{ApplyCommitFlow, CommitFlow, generate_commit_message};
pub use estimate::EstimateFlow;
pub use help::HelpFlow;
pub use notes::{ClNotesFlow, PatchNotesFlow};
pub use pr::PrFlow;
pub use queue::{FlowQueue, build_queue};
pub use repo::{AddFilesFlow, PushFlow, StatusFlow};

/// What the queue should do after a flow finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    Continue,
    /// Stop draining; remaining flows are dropped.
    Halt,
}

/// One queued, user-facing operation.
#[async_trait]
pub trait Flow: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError>;
}

/// Everything a flow may read or change during one run.
pub struct AppContext {
    pub flags: FlagSet,
    pub transcript: Transcript,
    pub gateway: CompletionGateway,
    pub git: Box<dyn GitWorkspace>,
    pub tokens: Box<dyn TokenCounter>,
    pub console: Console,
    pub prompter: Box<dyn Prompter>,
    pub clipboard: Box<dyn Clipboard>,
    pub history: CliHistory,
    pub changelog_path: PathBuf,
    pub shell_history_path: Option<PathBuf>,
    /// Latest generated commit message, as returned by the model.
    pub commit_message: Option<String>,
}

impl AppContext {
    /// Context with terminal prompts, the system clipboard and an in-memory
    /// CLI history. Callers override the remaining fields as needed.
    pub fn new(
        flags: FlagSet,
        gateway: CompletionGateway,
        git: Box<dyn GitWorkspace>,
        tokens: Box<dyn TokenCounter>,
        console: Console,
    ) -> Self {
        Self {
            flags,
            transcript: Transcript::new(),
            gateway,
            git,
            tokens,
            console,
            prompter: Box::new(TerminalPrompter),
            clipboard: Box::new(SystemClipboard),
            history: CliHistory::in_memory(),
            changelog_path: PathBuf::from("CHANGELOG.md"),
            shell_history_path: None,
            commit_message: None,
        }
    }

    /// Copy the latest transcript turn. Failures are only logged.
    pub fn copy_latest_to_clipboard(&self) {
        let Ok(text) = self.transcript.latest_content() else {
            return;
        };
        if let Err(e) = self.clipboard.copy(text) {
            warn!("Could not copy to clipboard: {e}");
        }
    }
}
