//! Debounced background writes.
//!
//! A [`Debouncer`] holds at most one [`PendingSave`]. Scheduling new work
//! releases the previous timer first, so a burst of changes collapses into a
//! single write once the burst has been quiet for the configured delay.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// A write waiting for its timer.
///
/// Releasing (or dropping) the handle cancels the write if the timer has not
/// fired yet. A write that already started is left to finish.
#[derive(Debug)]
pub struct PendingSave {
    task: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

impl PendingSave {
    /// Run `work` after `delay` on the current tokio runtime.
    pub fn spawn<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
            work.await;
        });
        Self { task, fired }
    }

    /// Whether the timer has fired.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Cancel the write. Returns true if it had not started yet.
    pub fn release(self) -> bool {
        // Drop aborts the timer
        !self.has_fired()
    }
}

impl Drop for PendingSave {
    fn drop(&mut self) {
        if !self.has_fired() {
            self.task.abort();
        }
    }
}

/// Owner of the single outstanding [`PendingSave`].
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingSave>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any waiting write with `work`, due after the delay.
    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.pending.take()
            && previous.release()
        {
            log::trace!("Superseded pending write");
        }
        self.pending = Some(PendingSave::spawn(self.delay, work));
    }

    /// Whether a write is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.has_fired())
    }

    /// Drop the waiting write. Returns true if one was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some_and(PendingSave::release)
    }
}
