//! Terminal output: section headers, info lines and streamed assistant text.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// ANSI colors used by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Assistant,
    Info,
    Header,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Assistant => 32,
            Color::Info => 34,
            Color::Header => 33,
        }
    }
}

/// Shared console handle. Cloning shares the same writer.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
    verbose: bool,
}

impl Console {
    pub fn stdout(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }

    pub fn with_writer(writer: impl Write + Send + 'static, verbose: bool) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
            verbose,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Write text, optionally wrapped in a color. Write failures are ignored.
    pub fn write(&self, text: &str, color: Option<Color>) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let _ = match color {
            Some(color) => write!(out, "\x1b[{}m{}\x1b[0m", color.code(), text),
            None => write!(out, "{text}"),
        };
        let _ = out.flush();
    }

    pub fn empty_line(&self, times: usize) {
        self.write(&"\n".repeat(times), None);
    }

    pub fn header(&self, title: &str) {
        self.empty_line(1);
        self.write(
            &format!("-------------------- {title} ---------------------"),
            Some(Color::Header),
        );
        self.empty_line(2);
    }

    pub fn info(&self, text: &str) {
        self.empty_line(1);
        self.write(&format!(">>>> {text}"), Some(Color::Info));
        self.empty_line(2);
    }

    /// Info line shown only with `--verbose`.
    pub fn verbose_info(&self, text: &str) {
        if self.verbose {
            self.empty_line(1);
            self.write(&format!(">>>> {text}"), Some(Color::Info));
            self.empty_line(1);
        }
    }

    /// Forward one streamed fragment of assistant text.
    pub fn assistant_fragment(&self, text: &str) {
        self.write(text, Some(Color::Assistant));
    }

    pub fn line(&self, text: &str) {
        self.write(&format!("{text}\n"), None);
    }
}

/// In-memory writer for capturing console output in tests.
#[derive(Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
