//! Dispatch pipeline: resolve input to a command and run it.
//!
//! Resolution parses raw text when needed, takes the first word as the
//! command name and looks it up in the registry. Failures are reported to
//! an error stream as one-line messages; they never reach the caller as
//! errors.

use super::bundle::CommandRegistry;
use super::definitions::{Command, ExitCode};
use super::handlers::CommandContext;
use super::parser::{CommandLineParser, ParseOutcome};
use crate::error::{ConsoleError, Result};
use crate::session::OutputStream;
use std::sync::Arc;
use tracing::{debug, warn};

/// A command to resolve, either raw text or an already split argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    /// Raw command text, parsed before lookup.
    Line(String),
    /// Pre-tokenized words; the first is the command name.
    Args(Vec<String>),
}

impl From<&str> for CommandInput {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(args: Vec<String>) -> Self {
        Self::Args(args)
    }
}

/// A command line bound to the command it names.
#[derive(Clone)]
pub struct ResolvedBinding {
    command: Arc<dyn Command>,
    name: String,
    args: Vec<String>,
}

impl ResolvedBinding {
    /// Binds `command` under `name` with `args`.
    pub fn new(command: Arc<dyn Command>, name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command,
            name: name.into(),
            args,
        }
    }

    /// The command.
    pub fn command(&self) -> &Arc<dyn Command> {
        &self.command
    }

    /// The name the command was invoked under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments after the command name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns its exit code.
    ///
    /// Command failures are printed as `Error: MESSAGE` and become exit code
    /// 1. Only [`ConsoleError::Interrupted`] is returned as an error.
    pub async fn execute(&self, ctx: &CommandContext<'_>) -> Result<ExitCode> {
        debug!(command = %self.name, args = ?self.args, "Executing command");
        match self.command.execute(ctx, &self.name, &self.args).await {
            Ok(code) => Ok(code),
            Err(ConsoleError::Interrupted) => Err(ConsoleError::Interrupted),
            Err(e) => {
                warn!(command = %self.name, error = %e, "Command failed");
                ctx.err.println(&format!("Error: {e}"))?;
                Ok(1)
            }
        }
    }
}

impl std::fmt::Debug for ResolvedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Resolves `input` against `registry`.
///
/// Raw text that still needs a continuation line is rejected as a parse
/// error at the end of the text.
pub fn resolve(
    parser: &dyn CommandLineParser,
    registry: &CommandRegistry,
    input: &CommandInput,
) -> Result<ResolvedBinding> {
    let words = match input {
        CommandInput::Args(args) => args.clone(),
        CommandInput::Line(line) => match parser.parse(line)? {
            ParseOutcome::Complete(words) => words,
            ParseOutcome::NeedsMore => {
                return Err(ConsoleError::parse(line.chars().count(), "incomplete command"))
            }
        },
    };

    let mut words = words.into_iter();
    let name = words.next().ok_or(ConsoleError::EmptyCommand)?;
    if registry.is_empty() {
        return Err(ConsoleError::NoCommands);
    }
    let command = registry
        .lookup(&name)
        .cloned()
        .ok_or_else(|| ConsoleError::CommandNotFound(name.clone()))?;

    Ok(ResolvedBinding::new(command, name, words.collect()))
}

/// Formats a resolution failure the way it is shown to users.
pub fn describe_failure(error: &ConsoleError) -> String {
    match error {
        ConsoleError::Parse { offset, message } => format!("Error@{offset}: {message}"),
        other => format!("Error: {other}"),
    }
}

/// Resolves `input`, printing any failure to `err`.
pub fn find_command(
    parser: &dyn CommandLineParser,
    registry: &CommandRegistry,
    err: &OutputStream,
    input: &CommandInput,
) -> Option<ResolvedBinding> {
    match resolve(parser, registry, input) {
        Ok(binding) => Some(binding),
        Err(e) => {
            debug!(error = %e, "Command resolution failed");
            if let Err(io) = err.println(&describe_failure(&e)) {
                warn!(error = %io, "Could not report resolution failure");
            }
            None
        }
    }
}
