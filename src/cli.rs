//! Command-line argument parsing for ctk.
//!
//! Uses clap to parse CLI arguments.

use crate::commands::CommandInput;
use clap::Parser;
use std::path::PathBuf;

/// What the binary should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Interactive shell on the terminal.
    Shell,
    /// One-shot execution of a single command.
    Exec(CommandInput),
    /// Print the command listing and exit.
    List,
}

/// Run console commands once or interactively.
#[derive(Parser, Debug)]
#[command(name = "ctk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command and arguments to execute (omit for an interactive shell)
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        conflicts_with = "command"
    )]
    pub words: Vec<String>,

    /// Command line to parse and execute
    #[arg(short = 'c', long, value_name = "STRING")]
    pub command: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "CTK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to the log file even in exec mode
    #[arg(long)]
    pub log_file: bool,

    /// List available commands and exit
    #[arg(long, conflicts_with_all = ["words", "command"])]
    pub list: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Determines the run mode from the arguments.
    pub fn mode(&self) -> Mode {
        if self.list {
            Mode::List
        } else if let Some(line) = &self.command {
            Mode::Exec(CommandInput::Line(line.clone()))
        } else if !self.words.is_empty() {
            Mode::Exec(CommandInput::Args(self.words.clone()))
        } else {
            Mode::Shell
        }
    }

    /// Returns true if logs should go to the log file.
    pub fn use_file_logging(&self) -> bool {
        self.log_file || self.mode() == Mode::Shell
    }
}
