//! The `help` command.

use super::CommandContext;
use crate::commands::definitions::{print_usage, Command, CommandHelp, ExitCode};
use crate::commands::help::{format_details, list_commands};
use crate::error::Result;
use async_trait::async_trait;

/// `help [command]`: lists commands or describes one.
pub struct HelpCommand;

const HELP_HELP: CommandHelp = CommandHelp {
    usage: Some("[command]"),
    summary: "Displays information about available commands.",
    detail: "When used with no arguments, lists all of the available console commands along with \
             short descriptions.\nWhen used with a specific command, displays detailed \
             information about that command.",
};

#[async_trait]
impl Command for HelpCommand {
    fn help(&self) -> &CommandHelp {
        &HELP_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, name: &str, args: &[String]) -> Result<ExitCode> {
        let registry = ctx.console.registry();
        match args {
            [] => {
                ctx.out.println("")?;
                list_commands(ctx.out, registry.bundles())?;
                Ok(0)
            }
            [topic] => match registry.lookup(topic) {
                Some(command) => {
                    ctx.out.write_str(&format_details(topic, command.as_ref()))?;
                    Ok(0)
                }
                None => {
                    ctx.out.println(&format!("{topic}: command not found"))?;
                    Ok(1)
                }
            },
            _ => {
                print_usage(ctx.err, name, self)?;
                Ok(1)
            }
        }
    }
}
