//! Integration tests for one-shot exec sessions.

use super::support::test_console;
use async_trait::async_trait;
use console_toolkit::activity::{ActivityOutcome, Worker};
use console_toolkit::commands::{
    Bundle, Command, CommandContext, CommandHelp, CommandInput, CommandProvider, CommandRegistry,
    ExitCode, INTERRUPTED_EXIT,
};
use console_toolkit::config::ShellConfig;
use console_toolkit::error::Result;
use console_toolkit::session::{
    Environment, ExecRequest, InputStream, MemoryBuffer, OutputStream, Session, SessionActivity,
};
use console_toolkit::Console;
use std::sync::Arc;

fn request(command: CommandInput) -> (ExecRequest, MemoryBuffer, MemoryBuffer) {
    let (out, out_buf) = OutputStream::memory();
    let (err, err_buf) = OutputStream::memory();
    (ExecRequest::new(InputStream::empty(), out, err, command), out_buf, err_buf)
}

/// `env NAME`: prints a variable from the request environment.
struct EnvCommand;

const ENV_HELP: CommandHelp = CommandHelp {
    usage: Some("name"),
    summary: "Print an environment variable.",
    detail: "Prints the value of the named variable.",
};

#[async_trait]
impl Command for EnvCommand {
    fn help(&self) -> &CommandHelp {
        &ENV_HELP
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _: &str, args: &[String]) -> Result<ExitCode> {
        match args.first().and_then(|name| ctx.env.get(name)) {
            Some(value) => {
                ctx.out.println(value)?;
                Ok(0)
            }
            None => Ok(2),
        }
    }
}

struct Shadowing;

impl CommandProvider for Shadowing {
    fn description(&self) -> String {
        "Shadowing commands".to_string()
    }

    fn commands(&self) -> Vec<(String, Arc<dyn Command>)> {
        vec![("echo".to_string(), Arc::new(EnvCommand) as Arc<dyn Command>)]
    }
}

#[tokio::test]
async fn test_exec_line_with_quotes() {
    let (console, _) = test_console();
    let (request, out, err) = request(CommandInput::from(r#"echo "hello  world" "!""#));

    let session = console.new_exec_session(request).unwrap();
    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(out.contents(), "hello  world !\n");
    assert_eq!(err.contents(), "");
}

#[tokio::test]
async fn test_exec_pre_tokenized_args() {
    let (console, _) = test_console();
    let args = vec!["echo".to_string(), "\"not parsed\"".to_string()];
    let (request, out, _) = request(CommandInput::Args(args));

    console.new_exec_session(request).unwrap().execute().await.unwrap();
    assert_eq!(out.contents(), "\"not parsed\"\n");
}

#[tokio::test]
async fn test_exec_sees_request_environment() {
    let bundle = Bundle::new("env").with("env", Arc::new(EnvCommand));
    let console = Arc::new(Console::new(
        CommandRegistry::from_bundles(vec![bundle]),
        ShellConfig::default(),
    ));
    let (request, out, _) = request(CommandInput::from("env GREETING"));
    let request = request.with_env(Environment::new([("GREETING", "hej")]));

    let session = console.new_exec_session(request).unwrap();
    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(out.contents(), "hej\n");
}

#[tokio::test]
async fn test_exec_command_failure_becomes_exit_one() {
    let (console, _) = test_console();
    let (request, _, err) = request(CommandInput::from("fail"));

    let session = console.new_exec_session(request).unwrap();
    assert_eq!(session.execute().await.unwrap(), 1);
    assert_eq!(err.contents(), "Error: disk on fire\n");
}

#[tokio::test]
async fn test_exec_syntax_error_creates_no_session() {
    let (console, _) = test_console();
    let (request, _, err) = request(CommandInput::from(r#"echo "\u00g3""#));

    assert!(console.new_exec_session(request).is_none());
    assert_eq!(err.contents(), "Error@6: invalid Unicode escape\n");
}

#[tokio::test]
async fn test_subshell_refused_in_exec_session() {
    let (console, _) = test_console();
    let (request, _, err) = request(CommandInput::from("subshell"));

    let session = console.new_exec_session(request).unwrap();
    assert_eq!(session.execute().await.unwrap(), 1);
    assert!(err.contents().contains("only works within shell sessions"));
}

#[tokio::test]
async fn test_discovered_providers_take_precedence_over_later_bundles() {
    let shadowing = Shadowing;
    let mut registry = CommandRegistry::discover([&shadowing as &dyn CommandProvider]);
    registry.push(console_toolkit::commands::builtin_bundle());
    let console = Arc::new(Console::new(registry, ShellConfig::default()));

    let (request, out, _) = request(CommandInput::from("echo HOME"));
    let request = request.with_env(Environment::new([("HOME", "/root")]));
    console.new_exec_session(request).unwrap().execute().await.unwrap();
    assert_eq!(out.contents(), "/root\n");

    let (request, out, _) = request_help();
    console.new_exec_session(request).unwrap().execute().await.unwrap();
    let listing = out.contents();
    let shadow_pos = listing.find("=== Shadowing commands").unwrap();
    let builtin_pos = listing.find("=== Built-in commands").unwrap();
    assert!(shadow_pos < builtin_pos);
    assert_eq!(listing.matches("  echo  ").count(), 1);
}

fn request_help() -> (ExecRequest, MemoryBuffer, MemoryBuffer) {
    request(CommandInput::from("help"))
}

#[tokio::test]
async fn test_interrupted_exec_reports_reserved_code() {
    let (console, started) = test_console();
    let (request, _, _) = request(CommandInput::from("block"));
    let session = Arc::new(console.new_exec_session(request).unwrap());

    let runner = SessionActivity::new(session, Worker::current().unwrap());
    runner.start().unwrap();
    started.notified().await;

    assert!(runner.interrupt());
    assert_eq!(runner.wait().await, INTERRUPTED_EXIT);
    assert_eq!(runner.exit_value(), Some(INTERRUPTED_EXIT));
}

#[test]
fn test_exec_on_owned_worker_from_blocking_caller() {
    let (console, _) = test_console();
    let (request, out, _) = request(CommandInput::from("echo owned"));
    let session = Arc::new(console.new_exec_session(request).unwrap());

    let runner = SessionActivity::new(session, Worker::owned("exec-test").unwrap());
    let done = runner.start().unwrap();

    assert_eq!(done.wait_blocking(), ActivityOutcome::Finished);
    assert_eq!(runner.exit_value(), Some(0));
    assert_eq!(out.contents(), "owned\n");
    runner.close();
}
