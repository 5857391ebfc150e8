//! Common test utilities for binary tests.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Returns the path to the ctk binary built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ctk"))
}

/// Runs ctk with the given arguments and stdin contents.
/// Returns (exit code, stdout, stderr).
pub fn run_ctk(args: &[&str], stdin: &str) -> (i32, String, String) {
    let config = tempfile::NamedTempFile::new().expect("Failed to create config file");
    std::fs::write(config.path(), "log_level = \"off\"\n[shell]\ngreeting = \"\"\n")
        .expect("Failed to write config file");

    let mut child = Command::new(binary_path())
        .arg("--config")
        .arg(config.path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    if let Some(mut input) = child.stdin.take() {
        input
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
    }
    let output = child.wait_with_output().expect("Failed to wait for ctk");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
