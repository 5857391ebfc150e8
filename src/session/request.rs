//! Requests describing what a session should run.

use super::io::{InputStream, OutputStream};
use crate::commands::CommandInput;
use crate::terminal::Terminal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable environment variables visible to commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Creates an environment from name/value pairs.
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Snapshot of the process environment.
    pub fn from_process() -> Self {
        Self::new(std::env::vars())
    }

    /// Looks up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Iterates over variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if no variables are set.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Request for a one-shot command execution.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Input available to the command.
    pub input: InputStream,
    /// Normal output.
    pub out: OutputStream,
    /// Error output.
    pub err: OutputStream,
    /// Environment visible to the command.
    pub env: Environment,
    /// The command to run, raw or pre-tokenized.
    pub command: CommandInput,
}

impl ExecRequest {
    /// Creates a request over the given streams with an empty environment.
    pub fn new(
        input: InputStream,
        out: OutputStream,
        err: OutputStream,
        command: CommandInput,
    ) -> Self {
        Self {
            input,
            out,
            err,
            env: Environment::default(),
            command,
        }
    }

    /// Replaces the environment.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }
}

/// Request for an interactive shell session.
#[derive(Clone)]
pub struct ShellRequest {
    /// Terminal the shell reads from and writes to.
    pub terminal: Arc<dyn Terminal>,
    /// Extra arguments the shell was started with.
    pub args: Vec<String>,
    /// Environment visible to commands.
    pub env: Environment,
}

impl ShellRequest {
    /// Creates a request on `terminal` with no arguments and an empty environment.
    pub fn new(terminal: Arc<dyn Terminal>) -> Self {
        Self {
            terminal,
            args: Vec::new(),
            env: Environment::default(),
        }
    }

    /// Sets the shell arguments.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Replaces the environment.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }
}

impl std::fmt::Debug for ShellRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellRequest")
            .field("args", &self.args)
            .field("env", &self.env.len())
            .finish_non_exhaustive()
    }
}
