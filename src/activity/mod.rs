//! Lifecycle state machine for cancellable background work.
//!
//! An [`Activity`] runs a [`Work`] body at most once on a [`Worker`] and
//! moves through `Initial -> Started -> Completed -> Closed`. Closing is
//! idempotent, releases the worker if the activity owns it, and runs the
//! body's release hook exactly once. Cancellation is cooperative: the body
//! receives a [`CancellationToken`] and returns [`ConsoleError::Interrupted`]
//! when it observes it.

mod completion;
mod worker;

pub use completion::CompletionHandle;
pub use worker::Worker;

use crate::error::{ConsoleError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use std::time::Duration;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long [`Activity::close`] waits for an owned worker to stop.
pub const DEFAULT_SHUTDOWN_WAIT: Duration = Duration::from_millis(1000);

/// Lifecycle state of an activity. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActivityState {
    /// Created, not yet started.
    Initial,
    /// Body scheduled or running.
    Started,
    /// Body finished or was skipped.
    Completed,
    /// Resources released.
    Closed,
}

/// How an activity ended, as reported by [`CompletionHandle::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityOutcome {
    /// The body returned normally.
    Finished,
    /// The body was cancelled, either before it ran or while running.
    Interrupted,
    /// The body failed with the given message.
    Failed(String),
    /// The activity was closed before the body reported an outcome.
    Abandoned,
}

/// The body of an activity.
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Runs the body. Returning [`ConsoleError::Interrupted`] is the normal
    /// way to end after observing `cancel`.
    async fn perform(&self, cancel: CancellationToken) -> Result<()>;

    /// Called when [`perform`](Self::perform) fails with anything other than
    /// an interruption.
    fn handle_error(&self, error: &ConsoleError) {
        warn!(error = %error, category = error.category(), "Activity failed");
    }

    /// Releases resources. Called exactly once, when the activity closes.
    fn release(&self) {}
}

/// Adapts an async closure into a [`Work`] body.
pub struct FnWork<F>(F);

#[async_trait]
impl<F, Fut> Work for FnWork<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn perform(&self, cancel: CancellationToken) -> Result<()> {
        (self.0)(cancel).await
    }
}

struct Inner {
    state: ActivityState,
    worker: Option<Worker>,
    cancel: CancellationToken,
    shutdown_wait: Duration,
    outcome: Option<ActivityOutcome>,
    released: bool,
    body_thread: Option<ThreadId>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // A runtime cannot be dropped from async context; never block here
        if let Some(Worker::Owned(runtime)) = self.worker.take() {
            runtime.shutdown_background();
        }
    }
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<ActivityState>,
    work: Arc<dyn Work>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn outcome(&self) -> Option<ActivityOutcome> {
        self.lock().outcome.clone()
    }

    fn set_state(&self, inner: &mut Inner, state: ActivityState) {
        inner.state = state;
        self.state_tx.send_replace(state);
    }

    fn interrupt(&self) -> bool {
        let inner = self.lock();
        if inner.state != ActivityState::Started || inner.cancel.is_cancelled() {
            return false;
        }
        inner.cancel.cancel();
        true
    }

    fn close(&self) {
        let (worker, wait, release, from_body) = {
            let mut inner = self.lock();
            if inner.state == ActivityState::Closed {
                return;
            }
            self.set_state(&mut inner, ActivityState::Closed);
            inner.cancel.cancel();
            let release = !inner.released;
            inner.released = true;
            let from_body = inner.body_thread == Some(thread::current().id());
            (inner.worker.take(), inner.shutdown_wait, release, from_body)
        };

        if let Some(Worker::Owned(runtime)) = worker {
            // The body's own thread cannot wait for itself
            if from_body {
                runtime.shutdown_background();
            } else {
                shutdown_owned(runtime, wait);
            }
        }

        if release {
            self.work.release();
        }
        debug!("Activity closed");
    }

    async fn run(self: Arc<Self>) {
        let cancel = {
            let mut inner = self.lock();
            if inner.state == ActivityState::Closed {
                return;
            }
            if inner.cancel.is_cancelled() {
                // Cancelled before the body ran: complete without closing
                inner.outcome = Some(ActivityOutcome::Interrupted);
                self.set_state(&mut inner, ActivityState::Completed);
                return;
            }
            inner.body_thread = Some(thread::current().id());
            inner.cancel.clone()
        };

        let shared = scopeguard::guard(self, |shared| shared.close());

        let outcome = match shared.work.perform(cancel).await {
            Ok(()) => ActivityOutcome::Finished,
            Err(ConsoleError::Interrupted) => ActivityOutcome::Interrupted,
            Err(e) => {
                shared.work.handle_error(&e);
                ActivityOutcome::Failed(e.to_string())
            }
        };

        let mut inner = shared.lock();
        inner.outcome = Some(outcome);
        if inner.state < ActivityState::Completed {
            shared.set_state(&mut inner, ActivityState::Completed);
        }
    }
}

/// Stops an owned runtime, waiting up to `wait` for its worker thread.
fn shutdown_owned(runtime: Runtime, wait: Duration) {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Err(_) => runtime.shutdown_timeout(wait),
        Ok(RuntimeFlavor::MultiThread) => {
            tokio::task::block_in_place(|| runtime.shutdown_timeout(wait));
        }
        Ok(_) => {
            // A current-thread caller cannot block in place; wait on a helper
            let stopper = thread::Builder::new()
                .name("activity-shutdown".to_string())
                .spawn(move || runtime.shutdown_timeout(wait));
            match stopper {
                Ok(stopper) => {
                    if stopper.join().is_err() {
                        warn!("Worker shutdown panicked");
                    }
                }
                Err(e) => warn!(error = %e, "Could not wait for worker shutdown"),
            }
        }
    }
}

/// A run-once, cancellable unit of work with an explicit lifecycle.
#[derive(Clone)]
pub struct Activity {
    shared: Arc<Shared>,
}

impl Activity {
    /// Creates an activity that will run `work` on `worker`.
    pub fn new(work: Arc<dyn Work>, worker: Worker) -> Self {
        let (state_tx, _) = watch::channel(ActivityState::Initial);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: ActivityState::Initial,
                    worker: Some(worker),
                    cancel: CancellationToken::new(),
                    shutdown_wait: DEFAULT_SHUTDOWN_WAIT,
                    outcome: None,
                    released: false,
                    body_thread: None,
                }),
                state_tx,
                work,
            }),
        }
    }

    /// Creates an activity from an async closure.
    pub fn from_fn<F, Fut>(worker: Worker, body: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::new(Arc::new(FnWork(body)), worker)
    }

    /// Schedules the body on the worker.
    ///
    /// Fails with [`ConsoleError::InvalidState`] unless the activity is in
    /// its initial state.
    pub fn start(&self) -> Result<CompletionHandle> {
        {
            let mut inner = self.shared.lock();
            match inner.state {
                ActivityState::Initial => {}
                ActivityState::Closed => {
                    return Err(ConsoleError::invalid_state("activity is closed"))
                }
                _ => return Err(ConsoleError::invalid_state("already started")),
            }
            let handle = inner
                .worker
                .as_ref()
                .map(Worker::handle)
                .ok_or_else(|| ConsoleError::invalid_state("activity has no worker"))?;
            self.shared.set_state(&mut inner, ActivityState::Started);
            handle.spawn(Arc::clone(&self.shared).run());
        }
        debug!("Activity started");
        Ok(self.completion())
    }

    /// Returns a handle that resolves when the activity completes.
    pub fn completion(&self) -> CompletionHandle {
        CompletionHandle::new(Arc::clone(&self.shared))
    }

    /// Requests cancellation of the running body.
    ///
    /// Returns true only if the activity was started and had not already
    /// been asked to stop.
    pub fn interrupt(&self) -> bool {
        self.shared.interrupt()
    }

    /// Closes the activity and releases its resources. Safe to call more
    /// than once and from inside the body.
    pub fn close(&self) {
        self.shared.close();
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ActivityState {
        self.shared.lock().state
    }

    /// Returns true until the body has finished.
    pub fn is_active(&self) -> bool {
        self.state() < ActivityState::Completed
    }

    /// Returns true once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.state() == ActivityState::Closed
    }

    /// Sets how long closing waits for an owned worker.
    pub fn set_shutdown_wait(&self, wait: Duration) {
        self.shared.lock().shutdown_wait = wait;
    }

    /// Returns how long closing waits for an owned worker.
    pub fn shutdown_wait(&self) -> Duration {
        self.shared.lock().shutdown_wait
    }
}

impl std::fmt::Debug for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activity")
            .field("state", &self.state())
            .finish()
    }
}
