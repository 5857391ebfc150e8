//! Integration tests for activity lifecycles under concurrency.

use async_trait::async_trait;
use console_toolkit::activity::{Activity, ActivityOutcome, ActivityState, Work, Worker};
use console_toolkit::error::{ConsoleError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Counting {
    releases: AtomicUsize,
}

struct Pause(Arc<Counting>, Duration);

#[async_trait]
impl Work for Pause {
    async fn perform(&self, cancel: CancellationToken) -> Result<()> {
        tokio::select! {
            _ = tokio::time::sleep(self.1) => Ok(()),
            _ = cancel.cancelled() => Err(ConsoleError::Interrupted),
        }
    }

    fn release(&self) {
        self.0.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interrupt_racing_completion_is_harmless() {
    for i in 0..50u64 {
        let counting = Arc::new(Counting::default());
        let work = Pause(Arc::clone(&counting), Duration::from_micros(i * 20));
        let activity = Activity::new(Arc::new(work), Worker::current().unwrap());

        let done = activity.start().unwrap();
        let interrupter = {
            let activity = activity.clone();
            tokio::spawn(async move { activity.interrupt() })
        };

        let outcome = done.wait().await;
        interrupter.await.unwrap();
        assert!(
            matches!(outcome, ActivityOutcome::Finished | ActivityOutcome::Interrupted),
            "unexpected outcome {outcome:?}"
        );

        activity.close();
        assert_eq!(counting.releases.load(Ordering::SeqCst), 1);
        assert!(!activity.interrupt());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_close_releases_once() {
    let counting = Arc::new(Counting::default());
    let work = Pause(Arc::clone(&counting), Duration::from_secs(30));
    let activity = Activity::new(Arc::new(work), Worker::current().unwrap());
    let done = activity.start().unwrap();

    let closers: Vec<_> = (0..8)
        .map(|_| {
            let activity = activity.clone();
            tokio::spawn(async move { activity.close() })
        })
        .collect();
    for closer in closers {
        closer.await.unwrap();
    }

    assert_eq!(activity.state(), ActivityState::Closed);
    let outcome = done.wait().await;
    assert_ne!(outcome, ActivityOutcome::Finished);
    assert_eq!(counting.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_completion_handle_from_another_task() {
    let activity = Activity::from_fn(Worker::current().unwrap(), |_cancel| async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(())
    });

    let waiter = {
        let done = activity.completion();
        tokio::spawn(async move { done.wait().await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    activity.start().unwrap();

    assert_eq!(waiter.await.unwrap(), ActivityOutcome::Finished);
    assert!(!activity.is_active());
}

#[test]
fn test_cancel_through_completion_handle() {
    let activity = Activity::from_fn(Worker::owned("cancel-test").unwrap(), |cancel| async move {
        cancel.cancelled().await;
        Err(ConsoleError::Interrupted)
    });
    let done = activity.start().unwrap();

    assert!(done.cancel());
    assert_eq!(done.wait_blocking(), ActivityOutcome::Interrupted);
    assert!(!activity.is_active());

    activity.close();
    assert!(activity.is_closed());
}
