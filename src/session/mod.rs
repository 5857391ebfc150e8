//! Console sessions.
//!
//! A session executes once: either a single command ([`ExecSession`]) or an
//! interactive read loop ([`ShellSession`]). [`Session::interrupt`] may be
//! called from anywhere at any time; it only has an effect while the
//! session is executing.

mod exec;
mod io;
mod request;
mod runner;
mod shell;

pub use exec::ExecSession;
pub use io::{InputStream, MemoryBuffer, OutputStream};
pub use request::{Environment, ExecRequest, ShellRequest};
pub use runner::SessionActivity;
pub use shell::ShellSession;

use crate::commands::ExitCode;
use crate::error::{ConsoleError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A runnable console session.
#[async_trait]
pub trait Session: Send + Sync {
    /// Runs the session to completion and returns its exit value.
    ///
    /// Fails with [`ConsoleError::InvalidState`] if called twice. A one-shot
    /// session returns [`ConsoleError::Interrupted`] when its command was
    /// cancelled.
    async fn execute(&self) -> Result<ExitCode>;

    /// Requests cooperative cancellation of whatever the session is doing.
    ///
    /// Returns false if the session is not executing.
    fn interrupt(&self) -> bool;
}

struct CoreState {
    executed: bool,
    running: bool,
    cancel: CancellationToken,
    nested: Option<Arc<dyn Session>>,
}

/// Execution bookkeeping shared by the session types.
pub(crate) struct SessionCore {
    state: Mutex<CoreState>,
}

impl SessionCore {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CoreState {
                executed: false,
                running: false,
                cancel: CancellationToken::new(),
                nested: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks the session as executing. Only succeeds once.
    pub(crate) fn begin(&self) -> Result<CancellationToken> {
        let mut state = self.lock();
        if state.executed {
            return Err(ConsoleError::invalid_state("already executed"));
        }
        state.executed = true;
        state.running = true;
        Ok(state.cancel.clone())
    }

    /// Marks the session as no longer executing.
    pub(crate) fn finish(&self) {
        let mut state = self.lock();
        state.running = false;
        state.nested = None;
    }

    /// Token for the operation currently in progress.
    pub(crate) fn token(&self) -> CancellationToken {
        self.lock().cancel.clone()
    }

    /// Replaces a consumed token so later operations start uncancelled.
    pub(crate) fn renew(&self) -> CancellationToken {
        let mut state = self.lock();
        state.cancel = CancellationToken::new();
        state.cancel.clone()
    }

    pub(crate) fn set_nested(&self, nested: Option<Arc<dyn Session>>) {
        self.lock().nested = nested;
    }

    pub(crate) fn interrupt(&self) -> bool {
        let state = self.lock();
        if !state.running {
            return false;
        }
        if let Some(nested) = &state.nested {
            debug!("Forwarding interrupt to nested session");
            return nested.interrupt();
        }
        state.cancel.cancel();
        true
    }
}
