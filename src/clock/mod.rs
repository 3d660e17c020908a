use std::sync::Arc;

mod mock;
pub use self::mock::Mock;
mod monotonic;
pub use self::monotonic::Monotonic;

/// A source of elapsed wall time.
pub trait ClockSource {
    /// Milliseconds elapsed from an arbitrary fixed origin.
    fn now_millis(&self) -> u64;
}

impl<T: ClockSource> ClockSource for Arc<T> {
    fn now_millis(&self) -> u64 { (**self).now_millis() }
}

/// Cheaply cloneable handle to a clock source.
#[derive(Clone)]
pub struct Clock {
    source: Arc<dyn ClockSource + Send + Sync>,
}

impl Clock {
    /// Creates a clock backed by the system monotonic clock.
    pub fn monotonic() -> Clock {
        Clock {
            source: Arc::new(Monotonic::new()),
        }
    }

    /// Creates a clock backed by a manually advanced mock source.
    ///
    /// Returns the clock and a handle used to advance it.
    pub fn mock() -> (Clock, Arc<Mock>) {
        let mock = Arc::new(Mock::new(0));
        let clock = Clock {
            source: Arc::new(mock.clone()),
        };
        (clock, mock)
    }

    /// Current reading of the clock, in milliseconds.
    pub fn now_millis(&self) -> u64 { self.source.now_millis() }
}
