//! Binary tests for exec and piped shell modes.

use super::common::run_ctk;

#[test]
fn test_exec_positional_words() {
    let (code, stdout, _) = run_ctk(&["echo", "hello", "world"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "hello world\n");
}

#[test]
fn test_exec_command_string() {
    let (code, stdout, _) = run_ctk(&["-c", r#"echo "a  b" \141"#], "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "a  b 141\n");
}

#[test]
fn test_exec_exit_value_becomes_process_status() {
    let (code, _, _) = run_ctk(&["exit", "42"], "");
    assert_eq!(code, 42);
}

#[test]
fn test_exec_unknown_command() {
    let (code, stdout, stderr) = run_ctk(&["frobnicate"], "");
    assert_eq!(code, 1);
    assert_eq!(stdout, "");
    assert!(stderr.contains("Error: command \"frobnicate\" not found"));
}

#[test]
fn test_exec_syntax_error() {
    let (code, _, stderr) = run_ctk(&["-c", r#"echo "\w""#], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("Error@6: invalid backslash escape"));
}

#[test]
fn test_list_commands() {
    let (code, stdout, _) = run_ctk(&["--list"], "");
    assert_eq!(code, 0);
    assert!(stdout.starts_with("=== Built-in commands\n"));
    assert!(stdout.contains("  sleep "));
}

#[test]
fn test_piped_shell_session() {
    let (code, stdout, _) = run_ctk(&[], "echo one\necho \"two\nlines\"\nquit 7\necho never\n");
    assert_eq!(code, 7);
    assert_eq!(stdout, "one\ntwo\nlines\n");
}
