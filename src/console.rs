//! The console: parser, command registry and shell settings in one place.
//!
//! Sessions are created from a shared `Arc<Console>` so that commands such
//! as `help` and `subshell` can reach back into it.

use crate::commands::{
    builtin_bundle, find_command, CommandInput, CommandLineParser, CommandRegistry,
    ResolvedBinding, SimpleParser,
};
use crate::config::ShellConfig;
use crate::session::{ExecRequest, ExecSession, OutputStream, ShellRequest, ShellSession};
use std::sync::Arc;
use tracing::debug;

/// Creates exec and shell sessions over one set of commands.
pub struct Console {
    parser: Arc<dyn CommandLineParser>,
    registry: CommandRegistry,
    shell: ShellConfig,
}

impl Console {
    /// Creates a console with the default parser.
    pub fn new(registry: CommandRegistry, shell: ShellConfig) -> Self {
        Self {
            parser: Arc::new(SimpleParser),
            registry,
            shell,
        }
    }

    /// A console with only the built-in commands and default settings.
    pub fn builtin() -> Self {
        Self::new(
            CommandRegistry::from_bundles(vec![builtin_bundle()]),
            ShellConfig::default(),
        )
    }

    /// Replaces the command line parser.
    pub fn with_parser(mut self, parser: Arc<dyn CommandLineParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the shell settings.
    pub fn with_shell_config(mut self, shell: ShellConfig) -> Self {
        self.shell = shell;
        self
    }

    /// The command line parser.
    pub fn parser(&self) -> &dyn CommandLineParser {
        self.parser.as_ref()
    }

    /// The command registry.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Shell settings.
    pub fn shell_config(&self) -> &ShellConfig {
        &self.shell
    }

    /// Resolves `input`, printing any failure to `err`.
    pub fn find_command(&self, err: &OutputStream, input: &CommandInput) -> Option<ResolvedBinding> {
        find_command(self.parser(), &self.registry, err, input)
    }

    /// Creates a session for the request's command.
    ///
    /// Returns `None` after printing the reason to the request's error
    /// stream if the command cannot be resolved.
    pub fn new_exec_session(self: &Arc<Self>, request: ExecRequest) -> Option<ExecSession> {
        let binding = self.find_command(&request.err, &request.command)?;
        Some(self.new_exec_session_with(request, binding))
    }

    /// Creates a session for an already resolved command.
    pub fn new_exec_session_with(
        self: &Arc<Self>,
        request: ExecRequest,
        binding: ResolvedBinding,
    ) -> ExecSession {
        debug!(command = %binding.name(), "Creating exec session");
        ExecSession::new(Arc::clone(self), request, binding)
    }

    /// Creates an interactive session on the request's terminal.
    pub fn new_shell_session(self: &Arc<Self>, request: ShellRequest) -> ShellSession {
        debug!(args = ?request.args, "Creating shell session");
        ShellSession::new(Arc::clone(self), request)
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("registry", &self.registry)
            .field("shell", &self.shell)
            .finish_non_exhaustive()
    }
}
