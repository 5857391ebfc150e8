//! Built-in command handlers.
//!
//! Each handler is a small [`Command`] implementation that works against a
//! [`CommandContext`].

pub mod help;
pub mod subshell;
pub mod system;

use super::bundle::Bundle;
use super::definitions::Command;
use crate::console::Console;
use crate::error::{ConsoleError, Result};
use crate::session::{Environment, InputStream, OutputStream, ShellSession};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What a command sees of the session running it.
pub struct CommandContext<'a> {
    /// Console that created the session.
    pub console: &'a Arc<Console>,
    /// Environment of the request.
    pub env: &'a Environment,
    /// Input stream of the request.
    pub input: &'a InputStream,
    /// Output stream of the request.
    pub out: &'a OutputStream,
    /// Error stream of the request.
    pub err: &'a OutputStream,
    /// Fires when the session is interrupted.
    pub cancel: &'a CancellationToken,
    /// The enclosing shell session, if any.
    pub shell: Option<&'a ShellSession>,
}

impl CommandContext<'_> {
    /// Returns [`ConsoleError::Interrupted`] if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(ConsoleError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Description of the built-in bundle.
pub const BUILTIN_DESCRIPTION: &str = "Built-in commands";

/// The built-in commands: `date`, `echo`, `exit`, `help`, `quit`, `sleep`
/// and `subshell`.
pub fn builtin_bundle() -> Bundle {
    let exit: Arc<dyn Command> = Arc::new(system::ExitCommand);
    Bundle::new(BUILTIN_DESCRIPTION)
        .with("date", Arc::new(system::DateCommand))
        .with("echo", Arc::new(system::EchoCommand))
        .with("exit", Arc::clone(&exit))
        .with("help", Arc::new(help::HelpCommand))
        .with("quit", exit)
        .with("sleep", Arc::new(system::SleepCommand))
        .with("subshell", Arc::new(subshell::SubshellCommand))
}
