//! Running a session as an activity.
//!
//! This is what a transport does with a session: start it on a worker,
//! forward cancellation signals to [`Session::interrupt`] and report the
//! final exit value.

use super::Session;
use crate::activity::{Activity, ActivityOutcome, CompletionHandle, Work, Worker};
use crate::commands::{ExitCode, INTERRUPTED_EXIT};
use crate::error::{ConsoleError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct SessionWork {
    session: Arc<dyn Session>,
    exit_value: Mutex<Option<ExitCode>>,
}

impl SessionWork {
    fn record(&self, value: ExitCode) {
        *self.exit_value.lock().unwrap_or_else(|p| p.into_inner()) = Some(value);
    }

    fn exit_value(&self) -> Option<ExitCode> {
        *self.exit_value.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl Work for SessionWork {
    async fn perform(&self, cancel: CancellationToken) -> Result<()> {
        let execution = self.session.execute();
        tokio::pin!(execution);

        let result = tokio::select! {
            biased;
            result = &mut execution => result,
            _ = cancel.cancelled() => {
                debug!("Forwarding activity cancellation to session");
                self.session.interrupt();
                execution.await
            }
        };

        match result {
            Ok(value) => {
                self.record(value);
                Ok(())
            }
            Err(ConsoleError::Interrupted) => {
                self.record(INTERRUPTED_EXIT);
                Err(ConsoleError::Interrupted)
            }
            Err(e) => {
                self.record(1);
                Err(e)
            }
        }
    }

    fn handle_error(&self, error: &ConsoleError) {
        warn!(error = %error, "Session failed");
    }
}

/// A session bound to an [`Activity`].
pub struct SessionActivity {
    activity: Activity,
    work: Arc<SessionWork>,
}

impl SessionActivity {
    /// Prepares `session` to run on `worker`.
    pub fn new(session: Arc<dyn Session>, worker: Worker) -> Self {
        let work = Arc::new(SessionWork {
            session,
            exit_value: Mutex::new(None),
        });
        let activity = Activity::new(Arc::clone(&work) as Arc<dyn Work>, worker);
        Self { activity, work }
    }

    /// Sets how long closing waits for an owned worker.
    pub fn with_shutdown_wait(self, wait: Duration) -> Self {
        self.activity.set_shutdown_wait(wait);
        self
    }

    /// The underlying activity.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Starts the session.
    pub fn start(&self) -> Result<CompletionHandle> {
        self.activity.start()
    }

    /// Forwards an interrupt to the session.
    pub fn interrupt(&self) -> bool {
        self.work.session.interrupt()
    }

    /// Closes the activity, cancelling the session if it is still running.
    pub fn close(&self) {
        self.activity.close();
    }

    /// The session's exit value, once it has completed.
    pub fn exit_value(&self) -> Option<ExitCode> {
        self.work.exit_value()
    }

    /// Waits for the session and returns its exit value.
    ///
    /// A session cancelled before it ran reports the interrupted exit value.
    pub async fn wait(&self) -> ExitCode {
        let outcome = self.activity.completion().wait().await;
        self.exit_value().unwrap_or(match outcome {
            ActivityOutcome::Finished => 0,
            ActivityOutcome::Failed(_) => 1,
            ActivityOutcome::Interrupted | ActivityOutcome::Abandoned => INTERRUPTED_EXIT,
        })
    }

    /// Starts the session and waits for its exit value.
    pub async fn run(&self) -> Result<ExitCode> {
        self.start()?;
        Ok(self.wait().await)
    }
}
