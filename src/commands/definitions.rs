//! The command interface and its help metadata.
//!
//! Every command carries a static [`CommandHelp`] so help output and usage
//! errors are generated from one place.

use super::handlers::CommandContext;
use crate::error::Result;
use crate::session::OutputStream;
use async_trait::async_trait;

/// Integer exit status of a command or session.
pub type ExitCode = i32;

/// Exit value reported when a one-shot session is cooperatively cancelled.
pub const INTERRUPTED_EXIT: ExitCode = 130;

/// Help metadata for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHelp {
    /// Argument synopsis, e.g. `[command]`. `None` for commands without arguments.
    pub usage: Option<&'static str>,
    /// One-line description shown in listings.
    pub summary: &'static str,
    /// Longer description shown by `help NAME`.
    pub detail: &'static str,
}

/// A named action executable from a session.
#[async_trait]
pub trait Command: Send + Sync {
    /// Returns the help metadata.
    fn help(&self) -> &CommandHelp;

    /// Argument synopsis.
    fn usage(&self) -> Option<&'static str> {
        self.help().usage
    }

    /// One-line description.
    fn summary(&self) -> &'static str {
        self.help().summary
    }

    /// Detailed description.
    fn detail(&self) -> &'static str {
        self.help().detail
    }

    /// Runs the command. `name` is the name it was invoked under and `args`
    /// excludes it.
    ///
    /// Returning [`ConsoleError::Interrupted`](crate::error::ConsoleError::Interrupted)
    /// signals that cancellation was observed.
    async fn execute(&self, ctx: &CommandContext<'_>, name: &str, args: &[String])
        -> Result<ExitCode>;
}

/// Formats the usage line for `name`.
pub fn usage_line(name: &str, usage: Option<&str>) -> String {
    match usage {
        Some(usage) if !usage.is_empty() => format!("Usage: {name} {usage}"),
        _ => format!("Usage: {name}"),
    }
}

/// Prints the usage line for `command` to `err`.
pub fn print_usage(err: &OutputStream, name: &str, command: &dyn Command) -> Result<()> {
    err.println(&usage_line(name, command.usage()))?;
    Ok(())
}
