//! Periodic progress updates for a running fast.
//!
//! A [`FastingTicker`] owns a tokio task that re-derives progress once per
//! period. The task is aborted when the ticker is cancelled or dropped, so a
//! view that goes away never leaves periodic work behind. It also stops on its
//! own once the fast is no longer active.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::engine::{FastingProgress, FastingState};

/// Default refresh period for elapsed-time displays.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct FastingTicker {
    handle: JoinHandle<()>,
}

impl FastingTicker {
    /// Spawn the ticker on the current tokio runtime.
    ///
    /// `on_tick` runs once immediately and then every `period`.
    pub fn spawn<F>(state: FastingState, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(FastingProgress) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match state.progress() {
                    Some(progress) => on_tick(progress),
                    None => break,
                }
            }
            debug!("fasting ticker finished");
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop ticking.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for FastingTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn running_fast() -> FastingState {
        let mut state = FastingState::default();
        state.start();
        state
    }

    #[tokio::test]
    async fn ticks_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let ticker = FastingTicker::spawn(running_fast(), Duration::from_millis(5), move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        ticker.cancel();
        let after_cancel = count.load(Ordering::SeqCst);
        assert!(after_cancel >= 2, "expected several ticks, got {after_cancel}");

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test]
    async fn idle_state_finishes_immediately() {
        let ticker = FastingTicker::spawn(FastingState::default(), Duration::from_millis(5), |_| {
            panic!("idle fast must not tick");
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(ticker.is_finished());
    }
}
