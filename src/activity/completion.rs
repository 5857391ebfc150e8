//! Waiting on activity completion.

use super::{ActivityOutcome, ActivityState, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A cloneable handle that resolves when an activity finishes.
///
/// The handle may be obtained before the activity is started; waiting parks
/// until the body has run (or the activity was closed without running it).
#[derive(Clone)]
pub struct CompletionHandle {
    shared: Arc<Shared>,
    state: watch::Receiver<ActivityState>,
}

impl CompletionHandle {
    pub(super) fn new(shared: Arc<Shared>) -> Self {
        let state = shared.state_tx.subscribe();
        Self { shared, state }
    }

    /// Waits for the activity to complete and returns how it ended.
    pub async fn wait(&self) -> ActivityOutcome {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s >= ActivityState::Completed).await;
        self.shared.outcome().unwrap_or(ActivityOutcome::Abandoned)
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    pub async fn wait_timeout(&self, timeout: Duration) -> Option<ActivityOutcome> {
        tokio::time::timeout(timeout, self.wait()).await.ok()
    }

    /// Blocks the calling thread until the activity completes.
    ///
    /// Must not be called from a thread that drives the activity's worker.
    pub fn wait_blocking(&self) -> ActivityOutcome {
        futures::executor::block_on(self.wait())
    }

    /// Returns true once the activity has completed or closed.
    pub fn is_done(&self) -> bool {
        *self.state.borrow() >= ActivityState::Completed
    }

    /// Requests cancellation of the activity body.
    pub fn cancel(&self) -> bool {
        self.shared.interrupt()
    }
}

impl std::fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("state", &*self.state.borrow())
            .finish()
    }
}
