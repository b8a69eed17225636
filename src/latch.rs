// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! A countdown latch for async code.

use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Lets tasks wait until a number of events have happened.
///
/// The count only goes down and stops at zero. Once it reaches zero every
/// current and future waiter is released.
#[derive(Debug)]
pub struct CountDownLatch {
    count: watch::Sender<usize>,
}

impl CountDownLatch {
    pub fn new(count: usize) -> CountDownLatch {
        let (count, _) = watch::channel(count);
        CountDownLatch { count }
    }

    /// Decrements the count, releasing waiters when it reaches zero.
    pub fn count_down(&self) {
        self.count.send_modify(|count| {
            *count = count.saturating_sub(1);
        });
        debug!(count = *self.count.borrow(), "latch count down");
    }

    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Waits until the count reaches zero.
    pub async fn wait(&self) {
        let mut rx = self.count.subscribe();
        // the sender lives in self, so the channel can't close while we wait
        let _ = rx.wait_for(|count| *count == 0).await;
    }

    /// Waits until the count reaches zero or `timeout` elapses.
    ///
    /// Returns `false` if the timeout elapsed first.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn released_when_count_reaches_zero() {
        let latch = Arc::new(CountDownLatch::new(2));

        let waiter = tokio::spawn({
            let latch = latch.clone();
            async move { latch.wait().await }
        });

        latch.count_down();
        assert_eq!(latch.count(), 1);
        assert!(!waiter.is_finished());

        latch.count_down();
        waiter.await.unwrap();
        assert_eq!(latch.count(), 0);
    }

    #[tokio::test]
    async fn count_saturates_at_zero() {
        let latch = CountDownLatch::new(1);

        latch.count_down();
        latch.count_down();

        assert_eq!(latch.count(), 0);
        assert!(latch.wait_timeout(Duration::from_millis(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_timeout_gives_up() {
        let latch = CountDownLatch::new(1);
        let started = tokio::time::Instant::now();

        assert!(!latch.wait_timeout(Duration::from_secs(10)).await);
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert_eq!(latch.count(), 1);
    }
}
