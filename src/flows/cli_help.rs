//! Conversational shell-command help.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FlowError;
use crate::interact::is_yes;
use crate::transcript::Role;

use super::{AppContext, Flow, FlowControl};

/// Shell history lines included in the first question.
pub const SHELL_HISTORY_LINES: usize = 50;

pub const NO_HISTORY: &str = "No history found";

const RULES: &str = r#"
      1. Single-line format.
      2. Do NOT try to format it like code / include ``` in the message.
"#;

/// Last [`SHELL_HISTORY_LINES`] lines of the shell history file.
pub fn read_shell_history(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return NO_HISTORY.to_string();
    };

    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let lines: Vec<&str> = text.lines().collect();
            let start = lines.len().saturating_sub(SHELL_HISTORY_LINES);
            lines[start..].join("\n")
        }
        Err(e) => {
            debug!("No shell history at {}: {}", path.display(), e);
            NO_HISTORY.to_string()
        }
    }
}

/// First-round prompt with rules and shell history, or the bare follow-up.
pub fn build_cli_help_prompt(input: &str, shell_history: &str, follow_up: bool) -> String {
    let user_input_message = format!(
        r#"
        The user provided this information:
        {input}
    "#
    );

    let body = if follow_up {
        user_input_message
    } else {
        format!(
            r#"
        Rules:
        {RULES}

        Which Mac command would you use to solve this problem?
        {user_input_message}

        This is the history of the user's last 50 commands:
        {shell_history}

    "#
        )
    };

    format!(
        r#"
    {body}
    Answer only with the command, not the explanation.
    "#
    )
}

fn wants_follow_up(answer: &str) -> bool {
    answer.trim().is_empty() || is_yes(answer)
}

/// Ask for a problem, answer with one command and loop on follow-ups.
/// Ends the run when the user is done.
pub struct CliHelpFlow;

#[async_trait]
impl Flow for CliHelpFlow {
    fn name(&self) -> &'static str {
        "cli help"
    }

    async fn run(&self, ctx: &mut AppContext) -> Result<FlowControl, FlowError> {
        ctx.history.load();
        let shell_history = read_shell_history(ctx.shell_history_path.as_deref());

        ctx.console.header("CLI HELP");

        let mut follow_up = false;
        loop {
            let question = if follow_up {
                "Tell me more about the problem:"
            } else {
                "What is the problem?"
            };
            let input = ctx.prompter.ask_with_history(question, &ctx.history)?;
            ctx.history.append(&input);

            let prompt = build_cli_help_prompt(&input, &shell_history, follow_up);
            ctx.transcript.append_turn(Role::User, prompt);
            ctx.console.empty_line(1);
            ctx.gateway.complete_and_record(&mut ctx.transcript).await?;
            ctx.copy_latest_to_clipboard();
            ctx.console.empty_line(2);

            let answer = ctx.prompter.ask("Do you need a follow-up? (y/n)")?;
            if !wants_follow_up(&answer) {
                break;
            }
            follow_up = true;
        }

        Ok(FlowControl::Halt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FlagSet;
    use crate::git::MockGitWorkspace;
    use crate::history::CliHistory;
    use crate::testing::{FakePrompter, RecordingClipboard, ScriptedBackend, test_context};

    #[test]
    fn test_shell_history_keeps_last_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zsh_history");
        let lines: Vec<String> = (0..60).map(|i| format!("cmd {i}")).collect();
        fs::write(&path, lines.join("\n")).unwrap();

        let history = read_shell_history(Some(&path));

        assert_eq!(history.lines().count(), SHELL_HISTORY_LINES);
        assert!(history.starts_with("cmd 10\n"));
        assert!(history.ends_with("cmd 59"));
    }

    #[test]
    fn test_shell_history_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zsh_history");
        fs::write(&path, b"ls\n\xff\xfe\ngit status\n").unwrap();

        let history = read_shell_history(Some(&path));

        assert!(history.starts_with("ls\n"));
        assert!(history.ends_with("git status"));
    }

    #[test]
    fn test_missing_shell_history() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            read_shell_history(Some(&dir.path().join("missing"))),
            NO_HISTORY
        );
        assert_eq!(read_shell_history(None), NO_HISTORY);
    }

    #[test]
    fn test_follow_up_prompt_omits_context() {
        let first = build_cli_help_prompt("disk is full", "ls", false);
        assert!(first.contains("Which Mac command"));
        assert!(first.contains("ls"));

        let follow_up = build_cli_help_prompt("only in /tmp", "ls", true);
        assert!(!follow_up.contains("Which Mac command"));
        assert!(follow_up.contains("only in /tmp"));
        assert!(follow_up.contains("Answer only with the command, not the explanation."));
    }

    #[test]
    fn test_follow_up_answers() {
        assert!(wants_follow_up(""));
        assert!(wants_follow_up("y"));
        assert!(wants_follow_up("yes"));
        assert!(!wants_follow_up("n"));
    }

    #[tokio::test]
    async fn test_follow_up_loop_then_halt() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("history");
        let backend = ScriptedBackend::new(vec!["du -sh *", "du -sh /tmp/*"]);
        let prompter = FakePrompter::new(vec!["disk is full", "", "only in /tmp", "n"]);
        let clipboard = RecordingClipboard::default();
        let (mut ctx, buffer) =
            test_context(MockGitWorkspace::new(), &backend, FlagSet::parse(["--"]).unwrap());
        ctx.prompter = Box::new(prompter.clone());
        ctx.clipboard = Box::new(clipboard.clone());
        ctx.history = CliHistory::new(&history_path);

        let control = CliHelpFlow.run(&mut ctx).await.unwrap();

        assert_eq!(control, FlowControl::Halt);
        assert_eq!(
            prompter.questions(),
            vec![
                "What is the problem?",
                "Do you need a follow-up? (y/n)",
                "Tell me more about the problem:",
                "Do you need a follow-up? (y/n)",
            ]
        );
        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        // Follow-ups see the whole conversation.
        assert_eq!(requests[1].len(), 4);
        assert!(!requests[1][3].content.contains("Which Mac command"));
        assert_eq!(clipboard.copied(), vec!["du -sh *", "du -sh /tmp/*"]);
        assert_eq!(
            fs::read_to_string(&history_path).unwrap(),
            "disk is full\nonly in /tmp\n"
        );
        assert_eq!(buffer.contents().matches("CLI HELP").count(), 1);
    }
}
