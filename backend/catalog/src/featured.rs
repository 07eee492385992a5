use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Fixed-interval rotation over `len` featured items.
///
/// Position is derived from elapsed time alone, so every caller that agrees
/// on the clock agrees on the current item without any shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    len: usize,
    interval: Duration,
}

impl Rotation {
    pub fn new(len: usize, interval: Duration) -> Self {
        Self { len, interval }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index_at(&self, elapsed: Duration) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let interval = self.interval.as_millis().max(1);
        let ticks = elapsed.as_millis() / interval;

        Some((ticks % self.len as u128) as usize)
    }

    pub fn next_change_in(&self, elapsed: Duration) -> Duration {
        let interval = self.interval.as_millis().max(1);
        let remaining = interval - elapsed.as_millis() % interval;

        Duration::from_millis(remaining as u64)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(0, DEFAULT_INTERVAL)
    }
}
