use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex as TokioMutex;
use tokio::time::{sleep, Instant};

/// Sliding-window request budget shared across concurrent tasks.
///
/// Holds the claim times of recent requests; a new request claims a slot as
/// soon as fewer than `limit` claims remain inside the window, sleeping until
/// the oldest claim expires otherwise. The slot is claimed on wake, so a
/// request that waited is counted at the time it actually proceeds.
#[derive(Debug)]
pub struct SharedRateLimiter {
    slots: TokioMutex<VecDeque<Instant>>,
    limit: usize,
    window: Duration,
}

impl SharedRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            slots: TokioMutex::new(VecDeque::new()),
            limit: limit.max(1) as usize,
            window,
        }
    }

    /// Claim a request slot, sleeping until one is free.
    /// Returns the total time spent waiting so callers can log throttling.
    pub async fn acquire(&self) -> Duration {
        let mut waited = Duration::ZERO;
        loop {
            let now = Instant::now();
            let mut slots = self.slots.lock().await;

            while let Some(&oldest) = slots.front() {
                if now.duration_since(oldest) >= self.window {
                    slots.pop_front();
                } else {
                    break;
                }
            }

            if slots.len() < self.limit {
                slots.push_back(now);
                return waited;
            }

            let wait = match slots.front() {
                Some(&oldest) => self.window.saturating_sub(now.duration_since(oldest)),
                None => Duration::ZERO,
            };

            // Lock is dropped while sleeping so other tasks can claim expired slots
            drop(slots);
            sleep(wait).await;
            waited += wait;
        }
    }
}
