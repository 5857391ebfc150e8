//! Shared fixtures for session tests.

use async_trait::async_trait;
use console_toolkit::commands::{
    Bundle, Command, CommandContext, CommandHelp, CommandRegistry, ExitCode,
};
use console_toolkit::config::ShellConfig;
use console_toolkit::error::{ConsoleError, Result};
use console_toolkit::session::{InputStream, MemoryBuffer, OutputStream};
use console_toolkit::terminal::{LineEvent, Terminal};
use console_toolkit::Console;
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};

/// Terminal fed line by line from the test body.
pub struct ChannelTerminal {
    events: Mutex<mpsc::UnboundedReceiver<LineEvent>>,
    output: OutputStream,
}

impl ChannelTerminal {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedSender<LineEvent>, MemoryBuffer) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (output, buffer) = OutputStream::memory();
        let terminal = Arc::new(Self {
            events: Mutex::new(rx),
            output,
        });
        (terminal, tx, buffer)
    }
}

#[async_trait]
impl Terminal for ChannelTerminal {
    async fn read_line(&self, prompt: &str) -> io::Result<LineEvent> {
        self.output.write_str(prompt)?;
        Ok(self.events.lock().await.recv().await.unwrap_or(LineEvent::Eof))
    }

    fn input(&self) -> InputStream {
        InputStream::empty()
    }

    fn output(&self) -> OutputStream {
        self.output.clone()
    }
}

/// Sends a line to a [`ChannelTerminal`].
pub fn line(text: &str) -> LineEvent {
    LineEvent::Line(text.to_string())
}

/// `block`: announces itself, then waits until interrupted.
pub struct BlockCommand {
    pub started: Arc<Notify>,
}

const BLOCK_HELP: CommandHelp = CommandHelp {
    usage: None,
    summary: "Wait until interrupted.",
    detail: "Blocks until the session is interrupted.",
};

#[async_trait]
impl Command for BlockCommand {
    fn help(&self) -> &CommandHelp {
        &BLOCK_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _: &str, _: &[String]) -> Result<ExitCode> {
        self.started.notify_one();
        ctx.cancel.cancelled().await;
        Err(ConsoleError::Interrupted)
    }
}

/// `fail`: always errors.
pub struct FailCommand;

const FAIL_HELP: CommandHelp = CommandHelp {
    usage: None,
    summary: "Always fails.",
    detail: "Returns an execution error.",
};

#[async_trait]
impl Command for FailCommand {
    fn help(&self) -> &CommandHelp {
        &FAIL_HELP
    }

    async fn execute(&self, _: &CommandContext<'_>, _: &str, _: &[String]) -> Result<ExitCode> {
        Err(ConsoleError::execution("disk on fire"))
    }
}

/// Shell settings without a greeting and with short prompts.
pub fn quiet_shell() -> ShellConfig {
    ShellConfig {
        greeting: String::new(),
        prompt: "$ ".to_string(),
        continuation_prompt: "> ".to_string(),
        crlf: false,
    }
}

/// A console with a test bundle in front of the built-ins.
pub fn test_console() -> (Arc<Console>, Arc<Notify>) {
    let started = Arc::new(Notify::new());
    let tests = Bundle::new("Test commands")
        .with(
            "block",
            Arc::new(BlockCommand {
                started: Arc::clone(&started),
            }),
        )
        .with("fail", Arc::new(FailCommand));
    let registry =
        CommandRegistry::from_bundles(vec![tests, console_toolkit::commands::builtin_bundle()]);
    (Arc::new(Console::new(registry, quiet_shell())), started)
}

/// Blocking reader fed with text from the test body. Reads block until
/// text arrives and hit end of input once the sender is dropped.
pub struct ChannelReader {
    chunks: std::sync::mpsc::Receiver<String>,
    partial: Vec<u8>,
}

impl ChannelReader {
    pub fn new() -> (std::sync::mpsc::Sender<String>, InputStream) {
        let (tx, rx) = std::sync::mpsc::channel();
        let reader = Self {
            chunks: rx,
            partial: Vec::new(),
        };
        (tx, InputStream::new(io::BufReader::new(reader)))
    }
}

impl io::Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.partial.is_empty() {
            match self.chunks.recv() {
                Ok(text) => self.partial = text.into_bytes(),
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.partial.len());
        buf[..n].copy_from_slice(&self.partial[..n]);
        self.partial.drain(..n);
        Ok(n)
    }
}
