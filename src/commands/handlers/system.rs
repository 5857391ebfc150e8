//! General purpose commands (date, echo, exit/quit, sleep).

use super::CommandContext;
use crate::commands::definitions::{print_usage, Command, CommandHelp, ExitCode};
use crate::error::{ConsoleError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// `date`: prints the current local time.
pub struct DateCommand;

const DATE_HELP: CommandHelp = CommandHelp {
    usage: None,
    summary: "Display the current time and date.",
    detail: "Displays the current local time and date.",
};

#[async_trait]
impl Command for DateCommand {
    fn help(&self) -> &CommandHelp {
        &DATE_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, name: &str, args: &[String]) -> Result<ExitCode> {
        if !args.is_empty() {
            print_usage(ctx.err, name, self)?;
            return Ok(1);
        }
        let now = chrono::Local::now();
        ctx.out.println(&now.format("%a %b %d %H:%M:%S %:z %Y").to_string())?;
        Ok(0)
    }
}

/// `echo`: prints its arguments separated by spaces.
pub struct EchoCommand;

const ECHO_HELP: CommandHelp = CommandHelp {
    usage: Some("[arg ...]"),
    summary: "Echoes command line arguments.",
    detail: "Prints the command line arguments separated by spaces.",
};

#[async_trait]
impl Command for EchoCommand {
    fn help(&self) -> &CommandHelp {
        &ECHO_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _name: &str, args: &[String]) -> Result<ExitCode> {
        ctx.out.println(&args.join(" "))?;
        Ok(0)
    }
}

/// `exit` / `quit`: ends the shell with an exit value.
pub struct ExitCommand;

const EXIT_HELP: CommandHelp = CommandHelp {
    usage: Some("[value]"),
    summary: "Exit the shell.",
    detail: "Causes the shell to exit with the specified integer exit value (default zero).",
};

#[async_trait]
impl Command for ExitCommand {
    fn help(&self) -> &CommandHelp {
        &EXIT_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, name: &str, args: &[String]) -> Result<ExitCode> {
        let value = match args {
            [] => 0,
            [value] => match value.parse::<ExitCode>() {
                Ok(value) => value,
                Err(_) => {
                    ctx.err.println(&format!("Error: invalid exit value \"{value}\""))?;
                    return Ok(1);
                }
            },
            _ => {
                print_usage(ctx.err, name, self)?;
                return Ok(1);
            }
        };

        if let Some(shell) = ctx.shell {
            shell.set_exit_value(value);
        }
        Ok(value)
    }
}

/// `sleep`: waits for a number of seconds, stopping early on interrupt.
pub struct SleepCommand;

const SLEEP_HELP: CommandHelp = CommandHelp {
    usage: Some("seconds"),
    summary: "Sleep for a while.",
    detail: "Sleeps for the specified number of seconds. Fractional seconds are supported.",
};

fn parse_seconds(text: &str) -> Option<Duration> {
    let secs: f64 = text.parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

#[async_trait]
impl Command for SleepCommand {
    fn help(&self) -> &CommandHelp {
        &SLEEP_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, name: &str, args: &[String]) -> Result<ExitCode> {
        let [secs] = args else {
            print_usage(ctx.err, name, self)?;
            return Ok(1);
        };
        let Some(duration) = parse_seconds(secs) else {
            ctx.err.println(&format!("Error: invalid seconds \"{secs}\""))?;
            return Ok(1);
        };

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(0),
            _ = ctx.cancel.cancelled() => Err(ConsoleError::Interrupted),
        }
    }
}
