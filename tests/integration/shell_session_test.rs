//! Integration tests for interactive shell sessions.

use super::support::{line, quiet_shell, test_console, ChannelReader, ChannelTerminal};
use console_toolkit::activity::Worker;
use console_toolkit::session::{
    InputStream, OutputStream, Session, SessionActivity, ShellRequest, ShellSession,
};
use console_toolkit::terminal::{LineEvent, StreamTerminal};
use console_toolkit::Console;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn scripted_shell(script: &str) -> (ShellSession, console_toolkit::session::MemoryBuffer) {
    let console = Arc::new(Console::builtin().with_shell_config(quiet_shell()));
    let (out, buffer) = OutputStream::memory();
    let terminal = StreamTerminal::new(InputStream::from_text(script), out);
    (console.new_shell_session(ShellRequest::new(Arc::new(terminal))), buffer)
}

#[tokio::test]
async fn test_multi_line_command_is_reassembled() {
    let (session, out) = scripted_shell("echo this \\\nis \"a\nquoted\" test\n");
    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(out.contents(), "$ > > this is a\nquoted test\n$ ");
}

#[tokio::test]
async fn test_quit_sets_exit_value() {
    let (session, _) = scripted_shell("echo a\nquit 12\n");
    assert_eq!(session.execute().await.unwrap(), 12);
}

#[tokio::test]
async fn test_help_inside_shell_goes_to_terminal() {
    let (session, out) = scripted_shell("help sleep\n");
    session.execute().await.unwrap();
    assert!(out.contents().contains("Usage:\n    sleep seconds\n"));
}

#[tokio::test]
async fn test_command_error_is_reported_and_loop_continues() {
    let (console, _) = test_console();
    let (out, buffer) = OutputStream::memory();
    let terminal = StreamTerminal::new(InputStream::from_text("fail\necho still here\n"), out);
    let session = console.new_shell_session(ShellRequest::new(Arc::new(terminal)));

    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(
        buffer.contents(),
        "$ Error: disk on fire\n$ still here\n$ "
    );
}

#[tokio::test]
async fn test_user_interrupt_discards_partial_command() {
    let (console, _) = test_console();
    let (terminal, lines, out) = ChannelTerminal::new();
    let session = console.new_shell_session(ShellRequest::new(terminal));

    lines.send(line("echo \"unfinished")).unwrap();
    lines.send(LineEvent::Interrupted).unwrap();
    lines.send(line("echo fresh")).unwrap();
    drop(lines);

    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(out.contents(), "$ > \n$ fresh\n$ ");
}

#[tokio::test]
async fn test_interrupt_at_prompt_keeps_next_line() {
    let console = Arc::new(Console::builtin().with_shell_config(quiet_shell()));
    let (input, stdin) = ChannelReader::new();
    let (out, buffer) = OutputStream::memory();
    let terminal = StreamTerminal::new(stdin, out);
    let session = Arc::new(console.new_shell_session(ShellRequest::new(Arc::new(terminal))));

    let running = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.execute().await }
    });

    // The read is in flight once the prompt is out
    while buffer.contents() != "$ " {
        tokio::task::yield_now().await;
    }
    assert!(session.interrupt());

    input.send("echo first\n".to_string()).unwrap();
    input.send("echo second\n".to_string()).unwrap();
    drop(input);

    assert_eq!(running.await.unwrap().unwrap(), 0);
    assert_eq!(buffer.contents(), "$ \n$ first\n$ second\n$ ");
}

#[tokio::test]
async fn test_interrupt_stops_command_but_not_shell() {
    let (console, started) = test_console();
    let (terminal, lines, out) = ChannelTerminal::new();
    let session: Arc<ShellSession> =
        Arc::new(console.new_shell_session(ShellRequest::new(terminal)));

    let runner = SessionActivity::new(session.clone(), Worker::current().unwrap());
    runner.start().unwrap();

    lines.send(line("block")).unwrap();
    started.notified().await;
    assert!(runner.interrupt());

    lines.send(line("echo after")).unwrap();
    lines.send(line("exit 2")).unwrap();

    assert_eq!(runner.wait().await, 2);
    assert_eq!(out.contents(), "$ \n$ after\n$ ");
    assert!(!session.interrupt());
}

#[tokio::test]
async fn test_subshell_runs_nested_loop() {
    let (session, out) = scripted_shell("subshell\necho inner\nexit 3\necho outer\n");
    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(session.exit_value(), None);
    assert_eq!(out.contents(), "$ $ inner\n$ $ outer\n$ ");
}

#[tokio::test]
async fn test_interrupt_is_routed_to_subshell() {
    let (console, started) = test_console();
    let (terminal, lines, out) = ChannelTerminal::new();
    let outer = Arc::new(console.new_shell_session(ShellRequest::new(terminal)));

    let runner = SessionActivity::new(outer.clone(), Worker::current().unwrap());
    runner.start().unwrap();

    lines.send(line("subshell")).unwrap();
    lines.send(line("block")).unwrap();
    started.notified().await;

    // Lands in the subshell, which keeps running
    assert!(outer.interrupt());
    lines.send(line("echo nested")).unwrap();
    lines.send(line("exit 5")).unwrap();
    lines.send(line("echo back")).unwrap();
    drop(lines);

    assert_eq!(runner.wait().await, 0);
    assert_eq!(out.contents(), "$ $ \n$ nested\n$ $ back\n$ ");
}

#[tokio::test]
async fn test_end_of_input_while_continuing_ends_shell() {
    let (session, out) = scripted_shell("echo \"open\n");
    assert_eq!(session.execute().await.unwrap(), 0);
    assert_eq!(out.contents(), "$ > ");
}
