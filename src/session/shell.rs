//! Interactive shell sessions.
//!
//! The read loop keeps a buffer of accumulated text. Each line read is
//! appended (joined with `\n`) and the whole buffer is reparsed; when the
//! parser needs more input the next line is read under the continuation
//! prompt. A complete command is dispatched and the buffer reset.

use super::{InputStream, OutputStream, Session, SessionCore, ShellRequest};
use crate::commands::{find_command, CommandContext, CommandInput, ExitCode, ParseOutcome};
use crate::console::Console;
use crate::error::{ConsoleError, Result};
use crate::terminal::{LineEvent, Terminal};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// A read-eval-print loop on a [`Terminal`].
pub struct ShellSession {
    console: Arc<Console>,
    request: ShellRequest,
    input: InputStream,
    out: OutputStream,
    core: SessionCore,
    exit_value: Mutex<Option<ExitCode>>,
}

impl ShellSession {
    pub(crate) fn new(console: Arc<Console>, request: ShellRequest) -> Self {
        let crlf = console.shell_config().crlf;
        let out = request.terminal.output().with_crlf(crlf);
        let input = request.terminal.input();
        Self {
            console,
            request,
            input,
            out,
            core: SessionCore::new(),
            exit_value: Mutex::new(None),
        }
    }

    /// The request this session serves.
    pub fn request(&self) -> &ShellRequest {
        &self.request
    }

    /// The terminal the session runs on.
    pub fn terminal(&self) -> &Arc<dyn Terminal> {
        &self.request.terminal
    }

    /// Output stream commands write to. Errors go to the same stream.
    pub fn output(&self) -> &OutputStream {
        &self.out
    }

    /// Asks the loop to stop after the current command with `value`.
    pub fn set_exit_value(&self, value: ExitCode) {
        debug!(value, "Shell exit requested");
        *self.exit_value.lock().unwrap_or_else(|p| p.into_inner()) = Some(value);
    }

    /// The exit value set by `exit`/`quit`, if any.
    pub fn exit_value(&self) -> Option<ExitCode> {
        *self.exit_value.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Runs `nested` in place of this session's current command, routing
    /// interrupts to it until it returns.
    pub async fn run_nested(&self, nested: Arc<dyn Session>) -> Result<ExitCode> {
        self.core.set_nested(Some(Arc::clone(&nested)));
        let _restore = scopeguard::guard(&self.core, |core| core.set_nested(None));
        nested.execute().await
    }

    async fn read_loop(&self) -> Result<()> {
        let settings = self.console.shell_config();
        if let Some(greeting) = settings.greeting() {
            self.out.println(greeting)?;
        }

        let mut buffer = String::new();
        while self.exit_value().is_none() {
            let prompt = if buffer.is_empty() {
                &settings.prompt
            } else {
                &settings.continuation_prompt
            };

            let cancel = self.core.token();
            let event = tokio::select! {
                event = self.request.terminal.read_line(prompt) => event?,
                _ = cancel.cancelled() => LineEvent::Interrupted,
            };
            let line = match event {
                LineEvent::Line(line) => line,
                LineEvent::Eof => {
                    debug!("End of input");
                    break;
                }
                LineEvent::Interrupted => {
                    buffer.clear();
                    self.core.renew();
                    self.out.println("")?;
                    continue;
                }
            };

            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(&line);

            let words = match self.console.parser().parse(&buffer) {
                Ok(ParseOutcome::NeedsMore) => continue,
                Ok(ParseOutcome::Complete(words)) => words,
                Err(e) => {
                    self.out.println(&format!("Error: {e}"))?;
                    buffer.clear();
                    continue;
                }
            };
            buffer.clear();
            if words.is_empty() {
                continue;
            }

            let Some(binding) = find_command(
                self.console.parser(),
                self.console.registry(),
                &self.out,
                &CommandInput::Args(words),
            ) else {
                continue;
            };

            let cancel = self.core.token();
            let ctx = CommandContext {
                console: &self.console,
                env: &self.request.env,
                input: &self.input,
                out: &self.out,
                err: &self.out,
                cancel: &cancel,
                shell: Some(self),
            };
            match binding.execute(&ctx).await {
                Ok(code) => {
                    debug!(command = %binding.name(), code, "Command finished");
                    if cancel.is_cancelled() {
                        self.core.renew();
                    }
                }
                Err(ConsoleError::Interrupted) => {
                    debug!(command = %binding.name(), "Command interrupted");
                    self.request.terminal.flush()?;
                    self.out.println("")?;
                    self.core.renew();
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Session for ShellSession {
    async fn execute(&self) -> Result<ExitCode> {
        self.core.begin()?;
        let _running = scopeguard::guard(&self.core, SessionCore::finish);
        info!(args = ?self.request.args, "Shell session started");

        let code = match self.read_loop().await {
            Ok(()) => self.exit_value().unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "Shell session failed");
                if let Err(io) = self.out.println(&format!("Error: {e}")) {
                    warn!(error = %io, "Could not report shell failure");
                }
                1
            }
        };
        let _ = self.out.flush();

        info!(code, "Shell session finished");
        Ok(code)
    }

    fn interrupt(&self) -> bool {
        self.core.interrupt()
    }
}
