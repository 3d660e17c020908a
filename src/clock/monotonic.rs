use crate::clock::ClockSource;
use std::time::Instant;

/// A clock source backed by the system monotonic clock.
pub struct Monotonic {
    origin: Instant,
}

impl Monotonic {
    pub fn new() -> Monotonic {
        Monotonic {
            origin: Instant::now(),
        }
    }
}

impl Default for Monotonic {
    fn default() -> Monotonic { Monotonic::new() }
}

impl ClockSource for Monotonic {
    fn now_millis(&self) -> u64 { self.origin.elapsed().as_millis() as u64 }
}
