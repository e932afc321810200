//! Interactive terminal questions.

use dialoguer::{History, Input};

use crate::history::CliHistory;

/// Source of answers to interactive questions.
pub trait Prompter: Send {
    fn ask(&mut self, question: &str) -> Result<String, dialoguer::Error>;

    /// Ask with up/down recall over `history`. Recording the answer is left
    /// to the caller.
    fn ask_with_history(
        &mut self,
        question: &str,
        history: &CliHistory,
    ) -> Result<String, dialoguer::Error>;
}

/// Whether an answer means "yes".
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prompter reading from the terminal via dialoguer.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<String, dialoguer::Error> {
        Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
    }

    fn ask_with_history(
        &mut self,
        question: &str,
        history: &CliHistory,
    ) -> Result<String, dialoguer::Error> {
        let mut recall = HistoryRecall(history);
        Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .history_with(&mut recall)
            .interact_text()
    }
}

/// Read-only view of the persisted history for dialoguer's recall.
struct HistoryRecall<'a>(&'a CliHistory);

impl History<String> for HistoryRecall<'_> {
    fn read(&self, pos: usize) -> Option<String> {
        self.0.entries().get(pos).cloned()
    }

    fn write(&mut self, _val: &String) {}
}
