//! Sliding-window sticker counter

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rankbot_core::UserId;

/// Per-member sticker timestamps within the last `window`
#[derive(Clone)]
pub struct StickerRateTracker {
    window: Duration,
    events: Arc<DashMap<UserId, VecDeque<DateTime<Utc>>>>,
}

impl StickerRateTracker {
    pub fn new(window_secs: u64) -> Self {
        Self {
            window: i64::try_from(window_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            events: Arc::new(DashMap::new()),
        }
    }

    /// Record a sticker and return how many fall inside the window, this one included.
    ///
    /// Entries at least `window` old are dropped.
    pub fn record(&self, user: UserId, now: DateTime<Utc>) -> usize {
        let cutoff = self.cutoff(now);
        let mut events = self.events.entry(user).or_default();
        events.push_back(now);
        while events.front().is_some_and(|t| *t <= cutoff) {
            events.pop_front();
        }
        events.len()
    }

    /// Forget members whose whole window has expired
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let cutoff = self.cutoff(now);
        let before = self.events.len();
        self.events
            .retain(|_, events| events.back().is_some_and(|t| *t > cutoff));
        before - self.events.len()
    }

    pub fn tracked_members(&self) -> usize {
        self.events.len()
    }

    /// Oldest instant still outside the window
    fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl std::fmt::Debug for StickerRateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickerRateTracker")
            .field("window", &self.window)
            .field("tracked_members", &self.events.len())
            .finish()
    }
}
