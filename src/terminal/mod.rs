//! Terminal collaborators for shell sessions.
//!
//! A terminal reads one line at a time under a prompt and exposes the raw
//! streams a session writes to.

mod editor;
mod stream;

pub use editor::RustylineTerminal;
pub use stream::StreamTerminal;

use crate::session::{InputStream, OutputStream};
use async_trait::async_trait;
use std::io;

/// Result of reading one line from a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A line of input, without its terminator.
    Line(String),
    /// End of input.
    Eof,
    /// The user interrupted line editing (e.g. Ctrl-C at the prompt).
    Interrupted,
}

/// Line-oriented terminal used by shell sessions.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Shows `prompt` and reads one line.
    async fn read_line(&self, prompt: &str) -> io::Result<LineEvent>;

    /// Raw input stream of the terminal.
    fn input(&self) -> InputStream;

    /// Raw output stream of the terminal.
    fn output(&self) -> OutputStream;

    /// Flushes pending output.
    fn flush(&self) -> io::Result<()> {
        self.output().flush()
    }
}
