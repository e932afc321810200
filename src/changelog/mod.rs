//! Changelog output for generated patch notes.

pub mod writer;

pub use writer::{append_notes, format_notes_section};
