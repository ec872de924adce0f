use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const SYMBOL_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Last-call-wins delay.
///
/// Each call waits out the delay and only runs if no newer call arrived in
/// the meantime. A result that finishes after a newer call started is
/// discarded as well, so callers never see stale data.
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// `None` when superseded.
    pub async fn run<F, Fut, T>(&self, task: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            return None;
        }

        let output = task().await;
        if !self.is_current(ticket) {
            log::debug!("Discarding superseded debounced result");
            return None;
        }
        Some(output)
    }

    /// Invalidate any pending call without starting a new one.
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }
}
