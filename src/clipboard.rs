//! Best-effort clipboard access through platform helper binaries.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ClipboardError;

/// Helpers tried in order, with their arguments.
const HELPERS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("clip", &[]),
];

pub trait Clipboard: Send {
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard backed by the first helper found on `PATH`.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let &(program, args) = HELPERS
            .iter()
            .find(|(program, _)| which::which(program).is_ok())
            .ok_or(ClipboardError::Unavailable)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Io { program, source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|source| ClipboardError::Io { program, source })?;
        }

        let status = child
            .wait()
            .map_err(|source| ClipboardError::Io { program, source })?;
        if !status.success() {
            return Err(ClipboardError::NonZeroExit {
                program,
                code: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}

/// Clipboard that discards everything.
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn copy(&self, _text: &str) -> Result<(), ClipboardError> {
        Ok(())
    }
}
