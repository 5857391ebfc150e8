//! Console toolkit: cancellable console sessions over a quoting command-line
//! parser and bundle-based command dispatch.
//!
//! A [`Console`] owns the parser and the command registry and creates
//! sessions: an [`ExecSession`](session::ExecSession) runs one command, a
//! [`ShellSession`](session::ShellSession) runs a read loop on a
//! [`Terminal`](terminal::Terminal). Sessions run inside an
//! [`Activity`](activity::Activity), which gives them a start-once,
//! interrupt, close lifecycle.

pub mod activity;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod session;
pub mod terminal;

pub use console::Console;
pub use error::{ConsoleError, Result};
