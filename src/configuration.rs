use crate::{clock::Clock, logger::PerformanceCounterLogger, sink::PerfCounterSink};
use std::{fmt::Display, hash::Hash, marker::PhantomData, time::Duration};
use thiserror::Error;

/// Errors raised while building a logger from a configuration.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// The sink category name was empty or all whitespace.
    #[error("argument 'category_name' cannot be blank")]
    BlankCategoryName,

    /// The sink category description was empty or all whitespace.
    #[error("argument 'category_description' cannot be blank")]
    BlankCategoryDescription,
}

/// Builder for a [`PerformanceCounterLogger`].
///
/// Defaults: a 4096-event channel capacity, a one second flush interval, and the system
/// monotonic clock.
#[derive(Clone)]
pub struct Configuration<T> {
    marker: PhantomData<T>,
    pub(crate) category_name: String,
    pub(crate) category_description: String,
    pub(crate) capacity: usize,
    pub(crate) flush_interval: Duration,
    pub(crate) clock: Clock,
}

impl<T: Clone + Eq + Hash + Display> Configuration<T> {
    /// Creates a configuration publishing into the named sink category.
    pub fn new(category_name: &str, category_description: &str) -> Configuration<T> {
        Configuration {
            marker: PhantomData,
            category_name: category_name.to_string(),
            category_description: category_description.to_string(),
            capacity: 4096,
            flush_interval: Duration::from_secs(1),
            clock: Clock::monotonic(),
        }
    }

    /// Sets the capacity of the bounded event channel.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the interval between publish flushes.
    pub fn flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    /// Replaces the clock; tests substitute a mock here.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the logger around the given sink.
    pub fn build<S: PerfCounterSink>(self, sink: S) -> Result<PerformanceCounterLogger<T, S>, ConfigurationError> {
        if self.category_name.trim().is_empty() {
            return Err(ConfigurationError::BlankCategoryName);
        }
        if self.category_description.trim().is_empty() {
            return Err(ConfigurationError::BlankCategoryDescription);
        }
        Ok(PerformanceCounterLogger::from_config(self, sink))
    }
}
