//! Execution resources for activities.

use crate::error::{ConsoleError, Result};
use std::fmt;
use tokio::runtime::{Builder, Handle, Runtime};

/// Where an activity body runs.
///
/// An owned worker is a private single-threaded runtime that the activity
/// shuts down when it closes. A shared worker only borrows a handle to a
/// runtime somebody else manages.
pub enum Worker {
    /// Runtime created for and owned by one activity.
    Owned(Runtime),
    /// Handle to a runtime owned elsewhere.
    Shared(Handle),
}

impl Worker {
    /// Creates a private runtime with a single named worker thread.
    pub fn owned(thread_name: impl Into<String>) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name(thread_name)
            .enable_all()
            .build()?;
        Ok(Self::Owned(runtime))
    }

    /// Wraps a handle to an externally managed runtime.
    pub fn shared(handle: Handle) -> Self {
        Self::Shared(handle)
    }

    /// Uses the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::Shared)
            .map_err(|_| ConsoleError::invalid_state("no async runtime is running"))
    }

    /// Returns true if the activity owns this worker.
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    pub(crate) fn handle(&self) -> Handle {
        match self {
            Self::Owned(runtime) => runtime.handle().clone(),
            Self::Shared(handle) => handle.clone(),
        }
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned(_) => f.write_str("Worker::Owned"),
            Self::Shared(_) => f.write_str("Worker::Shared"),
        }
    }
}
