//! The `subshell` command.

use super::CommandContext;
use crate::commands::definitions::{Command, CommandHelp, ExitCode};
use crate::error::Result;
use crate::session::ShellRequest;
use async_trait::async_trait;
use std::sync::Arc;

/// `subshell [arg ...]`: runs a nested shell on the current terminal.
///
/// The nested shell inherits the environment and receives the arguments
/// as its request arguments. Interrupts sent to the outer shell reach the
/// nested one while it runs.
pub struct SubshellCommand;

const SUBSHELL_HELP: CommandHelp = CommandHelp {
    usage: Some("[arg ...]"),
    summary: "Start a nested shell session.",
    detail: "Starts a new shell session on the same terminal with the same environment. \
             The nested shell ends with exit, quit or end of input, and its exit value \
             becomes the value of this command.",
};

#[async_trait]
impl Command for SubshellCommand {
    fn help(&self) -> &CommandHelp {
        &SUBSHELL_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, name: &str, args: &[String]) -> Result<ExitCode> {
        let Some(shell) = ctx.shell else {
            ctx.err.println(&format!(
                "Error: the \"{name}\" command only works within shell sessions"
            ))?;
            return Ok(1);
        };

        let request = ShellRequest::new(Arc::clone(shell.terminal()))
            .with_args(args.to_vec())
            .with_env(ctx.env.clone());
        let nested = Arc::new(ctx.console.new_shell_session(request));
        shell.run_nested(nested).await
    }
}
