use std::fmt::{self, Display};

/// The kind of measurement a raw metric records.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MetricKind {
    /// A discrete occurrence of an event.
    Count,

    /// A quantity attached to an occurrence, e.g. bytes received.
    Amount,

    /// A latest-value gauge.
    ///
    /// Status values operate in last-write-wins mode and cannot be incremented or decremented;
    /// callers measure them externally and record the whole value.
    Status,

    /// A duration, recorded as begin/end pairs and totalled in milliseconds.
    Interval,
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MetricKind::Count => write!(f, "count"),
            MetricKind::Amount => write!(f, "amount"),
            MetricKind::Status => write!(f, "status"),
            MetricKind::Interval => write!(f, "interval"),
        }
    }
}

/// Units of elapsed time an aggregate can be rated over.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Length of the unit in milliseconds.
    pub fn as_millis(self) -> u64 {
        match self {
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Hour => 3_600_000,
            TimeUnit::Day => 86_400_000,
        }
    }
}

/// Descriptor for a raw metric.
///
/// Declared once by the application and immutable afterwards. The key is the metric's stable
/// identity; the name is what it publishes under, and must be unique across all metrics and
/// aggregates handed to the same logger.
#[derive(Clone, Debug)]
pub struct Metric<T> {
    key: T,
    kind: MetricKind,
    name: String,
    description: String,
}

impl<T> Metric<T> {
    /// Declares a count metric.
    pub fn count(key: T, name: &str, description: &str) -> Metric<T> {
        Metric::new(key, MetricKind::Count, name, description)
    }

    /// Declares an amount metric.
    pub fn amount(key: T, name: &str, description: &str) -> Metric<T> {
        Metric::new(key, MetricKind::Amount, name, description)
    }

    /// Declares a status metric.
    pub fn status(key: T, name: &str, description: &str) -> Metric<T> {
        Metric::new(key, MetricKind::Status, name, description)
    }

    /// Declares an interval metric.
    pub fn interval(key: T, name: &str, description: &str) -> Metric<T> {
        Metric::new(key, MetricKind::Interval, name, description)
    }

    fn new(key: T, kind: MetricKind, name: &str, description: &str) -> Metric<T> {
        Metric {
            key,
            kind,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub fn key(&self) -> &T { &self.key }

    pub fn kind(&self) -> MetricKind { self.kind }

    pub fn name(&self) -> &str { &self.name }

    pub fn description(&self) -> &str { &self.description }
}

/// A recorded metric event.
///
/// Events are the decoupled way of submitting measurements to the publish loop; begin/end
/// events carry the clock reading taken when the recording call was made.
#[derive(Clone, Debug)]
pub(crate) enum MetricEvent<T> {
    Increment(T),
    Add(T, i64),
    Set(T, i64),
    Begin(T, u64),
    End(T, u64),
}
