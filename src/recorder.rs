use crate::{
    clock::Clock,
    metric::{Metric, MetricEvent},
};
use crossbeam_channel::Sender;
use thiserror::Error;

/// Error raised when a metric event could not be handed to the publish loop.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("failed to record metric event, channel full or disconnected")]
pub struct RecordError;

/// Cheaply cloneable handle for recording metric events.
///
/// Recording never blocks: events are pushed onto a bounded channel and folded into the
/// running totals by the publish loop. When the channel is full or the loop has shut down,
/// the event is not recorded and an error is returned.
#[derive(Clone)]
pub struct Recorder<T> {
    event_tx: Sender<MetricEvent<T>>,
    clock: Clock,
}

impl<T: Clone> Recorder<T> {
    pub(crate) fn new(event_tx: Sender<MetricEvent<T>>, clock: Clock) -> Recorder<T> {
        Recorder { event_tx, clock }
    }

    /// Records one occurrence of a count metric.
    pub fn increment(&self, metric: &Metric<T>) -> Result<(), RecordError> {
        self.send(MetricEvent::Increment(metric.key().clone()))
    }

    /// Adds to the running total of an amount metric.
    pub fn add(&self, metric: &Metric<T>, amount: i64) -> Result<(), RecordError> {
        self.send(MetricEvent::Add(metric.key().clone(), amount))
    }

    /// Sets the latest value of a status metric.
    pub fn set(&self, metric: &Metric<T>, value: i64) -> Result<(), RecordError> {
        self.send(MetricEvent::Set(metric.key().clone(), value))
    }

    /// Marks the beginning of an interval metric span.
    ///
    /// The clock is read here, at the recording call, not when the event is drained.
    pub fn begin(&self, metric: &Metric<T>) -> Result<(), RecordError> {
        self.send(MetricEvent::Begin(metric.key().clone(), self.clock.now_millis()))
    }

    /// Marks the end of an interval metric span.
    pub fn end(&self, metric: &Metric<T>) -> Result<(), RecordError> {
        self.send(MetricEvent::End(metric.key().clone(), self.clock.now_millis()))
    }

    fn send(&self, event: MetricEvent<T>) -> Result<(), RecordError> {
        self.event_tx.try_send(event).map_err(|_| RecordError)
    }
}
