//! ctk - run console commands once or in an interactive shell.

use anyhow::Context;
use console_toolkit::activity::Worker;
use console_toolkit::cli::{Cli, Mode};
use console_toolkit::commands::help::list_commands;
use console_toolkit::commands::ExitCode;
use console_toolkit::config::Config;
use console_toolkit::logging;
use console_toolkit::session::{
    Environment, ExecRequest, InputStream, OutputStream, Session, SessionActivity, ShellRequest,
};
use console_toolkit::terminal::{RustylineTerminal, StreamTerminal, Terminal};
use console_toolkit::Console;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("ctk: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

#[tokio::main]
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config_path();
    let config = Config::load_from_file(&config_path)?;

    if cli.use_file_logging() {
        logging::init_file_logging(&config.log_level);
    } else {
        logging::init_stderr_logging(&config.log_level);
    }
    info!("Loaded config from: {}", config_path.display());

    let console = Arc::new(Console::builtin().with_shell_config(config.shell.clone()));

    let session: Arc<dyn Session> = match cli.mode() {
        Mode::List => {
            list_commands(&OutputStream::stdout(), console.registry().bundles())?;
            return Ok(0);
        }
        Mode::Exec(command) => {
            let request = ExecRequest::new(
                InputStream::stdin(),
                OutputStream::stdout(),
                OutputStream::stderr(),
                command,
            )
            .with_env(Environment::from_process());
            match console.new_exec_session(request) {
                Some(session) => Arc::new(session),
                None => return Ok(1),
            }
        }
        Mode::Shell => {
            let terminal: Arc<dyn Terminal> = if std::io::stdin().is_terminal() {
                Arc::new(RustylineTerminal::new().context("could not open the terminal")?)
            } else {
                Arc::new(StreamTerminal::stdio().with_prompt(false))
            };
            let request = ShellRequest::new(terminal).with_env(Environment::from_process());
            Arc::new(console.new_shell_session(request))
        }
    };

    let runner = Arc::new(
        SessionActivity::new(session, Worker::current()?)
            .with_shutdown_wait(config.activity.shutdown_wait()),
    );
    runner.start()?;

    let signals = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received");
                runner.interrupt();
            }
        })
    };

    let code = runner.wait().await;
    signals.abort();
    runner.close();

    info!(code, "Session finished");
    Ok(code)
}
