//! Terminal backed by plain streams (pipes, files, tests).

use super::{LineEvent, Terminal};
use crate::session::{InputStream, OutputStream};
use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

type PendingRead = JoinHandle<io::Result<Option<String>>>;

/// A [`Terminal`] that writes prompts to an output stream and reads lines
/// from an input stream. It never reports [`LineEvent::Interrupted`].
///
/// Reads run on the blocking pool. A read whose caller gave up is kept and
/// its line is returned by the next `read_line`, so no input is lost.
#[derive(Debug, Clone)]
pub struct StreamTerminal {
    input: InputStream,
    output: OutputStream,
    show_prompt: bool,
    pending: Arc<Mutex<Option<PendingRead>>>,
}

impl StreamTerminal {
    /// Creates a terminal over the given streams.
    pub fn new(input: InputStream, output: OutputStream) -> Self {
        Self {
            input,
            output,
            show_prompt: true,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Terminal over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(InputStream::stdin(), OutputStream::stdout())
    }

    /// Enables or disables writing prompts.
    pub fn with_prompt(mut self, show_prompt: bool) -> Self {
        self.show_prompt = show_prompt;
        self
    }
}

#[async_trait]
impl Terminal for StreamTerminal {
    async fn read_line(&self, prompt: &str) -> io::Result<LineEvent> {
        if self.show_prompt {
            self.output.write_str(prompt)?;
            self.output.flush()?;
        }

        let mut pending = self.pending.lock().await;
        let read = pending.get_or_insert_with(|| {
            let input = self.input.clone();
            tokio::task::spawn_blocking(move || input.read_line())
        });
        let joined = read.await;
        *pending = None;
        let line = joined.map_err(io::Error::other)??;

        Ok(match line {
            Some(line) => LineEvent::Line(line),
            None => LineEvent::Eof,
        })
    }

    fn input(&self) -> InputStream {
        self.input.clone()
    }

    fn output(&self) -> OutputStream {
        self.output.clone()
    }
}
