//! Command-line flags.
//!
//! Arguments are first normalized leniently: unknown flags, unknown short
//! characters and stray words are dropped, and clustered short flags such as
//! `-CP` are expanded. The surviving tokens are then parsed by clap. When
//! nothing at all is recognized, the raw arguments become the hint.

use clap::{CommandFactory, Parser, ValueEnum};
use tracing::debug;

use crate::error::FlagError;

/// Bare-word shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shortcut {
    /// Add all files, get a commit message, commit and push to origin
    Gg,
    /// Create a new branch named after the staged changes
    Pr,
}

#[derive(Parser, Debug)]
#[command(
    name = "gitgpt",
    about = "Commit messages, estimates, branch names, patch notes and shell help from your git changes",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    after_long_help = "Run `gitgpt --` on its own to get CLI help.\n\
                       Without any flow flag, shows the status and proposes a commit message."
)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long)]
    help: bool,

    /// Get an estimate and client note for the changes
    #[arg(short = 'E', long)]
    estimate: bool,

    /// Get a commit message
    #[arg(short = 'C', long)]
    commit: bool,

    /// Commit and push to origin
    #[arg(short = 'P', long)]
    push: bool,

    /// Add all files
    #[arg(short = 'A', long)]
    add: bool,

    /// Show verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Allow interactive improvement of commit messages
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Provide a hint for the assistant
    #[arg(long, value_name = "TEXT")]
    hint: Option<String>,

    /// Get patch notes for the last week
    #[arg(long)]
    patch: bool,

    /// Get customer lead notes for the last week
    #[arg(long)]
    cl: bool,

    #[arg(long = "cli-help", hide = true)]
    cli_help: bool,

    #[arg(long, hide = true)]
    voice: bool,

    #[arg(value_enum, value_name = "SHORTCUT")]
    shortcuts: Vec<Shortcut>,
}

const LONG_FLAGS: [&str; 11] = [
    "help",
    "estimate",
    "commit",
    "push",
    "add",
    "verbose",
    "interactive",
    "hint",
    "voice",
    "patch",
    "cl",
];

const SHORT_FLAGS: [char; 7] = ['h', 'E', 'C', 'P', 'A', 'v', 'i'];

/// Rewrite raw arguments into tokens clap accepts. Returns the tokens and
/// whether anything was recognized.
fn normalize<S: AsRef<str>>(raw: &[S]) -> (Vec<String>, bool) {
    let mut tokens = Vec::new();
    let mut recognized = false;

    for arg in raw {
        let arg = arg.as_ref();
        let (key, value) = match arg.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (arg, None),
        };

        if key == "--" {
            tokens.push("--cli-help".to_string());
            recognized = true;
        } else if let Some(name) = key.strip_prefix("--") {
            if !LONG_FLAGS.contains(&name) {
                debug!("Ignoring unknown flag {key}");
                continue;
            }
            recognized = true;
            if name == "hint" {
                tokens.push(format!("--hint={}", value.unwrap_or_default()));
            } else {
                tokens.push(format!("--{name}"));
            }
        } else if let Some(cluster) = key.strip_prefix('-') {
            for c in cluster.chars() {
                if SHORT_FLAGS.contains(&c) {
                    tokens.push(format!("-{c}"));
                    recognized = true;
                } else {
                    debug!("Ignoring unknown short flag -{c}");
                }
            }
        } else if arg == "gg" || arg == "pr" {
            tokens.push(arg.to_string());
            recognized = true;
        } else {
            debug!("Ignoring argument {arg}");
        }
    }

    (tokens, recognized)
}

/// Parsed flags for one run. Only the hint may change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub help: bool,
    pub estimate: bool,
    pub commit: bool,
    pub push: bool,
    pub add: bool,
    pub verbose: bool,
    pub interactive: bool,
    pub patch: bool,
    pub cl: bool,
    pub cli_help: bool,
    pub gg: bool,
    pub pr: bool,
    hint: Option<String>,
}

impl FlagSet {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        let (tokens, recognized) = normalize(&raw);

        let cli = Cli::try_parse_from(std::iter::once("gitgpt".to_string()).chain(tokens))
            .map_err(FlagError::Invalid)?;

        let mut hint = cli.hint.filter(|h| !h.is_empty());
        if !recognized && !raw.is_empty() {
            hint = Some(raw.join(" "));
        }

        Ok(Self {
            help: cli.help,
            estimate: cli.estimate,
            commit: cli.commit,
            push: cli.push,
            add: cli.add,
            verbose: cli.verbose,
            interactive: cli.interactive,
            patch: cli.patch,
            cl: cli.cl,
            cli_help: cli.cli_help,
            gg: cli.shortcuts.contains(&Shortcut::Gg),
            pr: cli.shortcuts.contains(&Shortcut::Pr),
            hint,
        })
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Replace the hint for a regeneration round.
    pub fn override_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    /// Whether any flag selecting a flow is present. Modifiers such as
    /// `--verbose`, `--interactive` and `--hint` do not count.
    pub fn has_flow_flag(&self) -> bool {
        self.help
            || self.estimate
            || self.commit
            || self.push
            || self.add
            || self.patch
            || self.cl
            || self.cli_help
            || self.gg
            || self.pr
    }

    /// `--` given without any other flow flag.
    pub fn cli_help_only(&self) -> bool {
        self.cli_help
            && !(self.help
                || self.estimate
                || self.commit
                || self.push
                || self.add
                || self.patch
                || self.cl
                || self.gg
                || self.pr)
    }
}

/// Long help text rendered from the flag definitions.
pub fn help_text() -> String {
    Cli::command().render_long_help().to_string()
}
