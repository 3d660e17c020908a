use crate::clock::ClockSource;
use std::sync::atomic::{AtomicU64, Ordering};

/// A manually advanced clock source, for tests.
pub struct Mock {
    offset: AtomicU64,
}

impl Mock {
    pub fn new(offset: u64) -> Self {
        Self {
            offset: AtomicU64::new(offset),
        }
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn increment(&self, millis: u64) {
        self.offset.fetch_add(millis, Ordering::Release);
    }
}

impl ClockSource for Mock {
    fn now_millis(&self) -> u64 { self.offset.load(Ordering::Acquire) }
}
