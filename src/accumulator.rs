use crate::metric::{MetricEvent, TimeUnit};
use fnv::FnvBuildHasher;
use hashbrown::HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::{fmt::Display, hash::Hash};
use tracing::warn;

/// Running totals for all raw metrics, owned by the publish loop.
///
/// Counts and amounts are running sums, statuses are latest values, intervals are running
/// sums of paired begin/end spans in milliseconds. Totals exist for every key that has ever
/// recorded an event, whether or not the metric was registered for publication.
pub(crate) struct Accumulator<T> {
    counts: HashMap<T, i64, FnvBuildHasher>,
    amounts: HashMap<T, i64, FnvBuildHasher>,
    statuses: HashMap<T, i64, FnvBuildHasher>,
    intervals: HashMap<T, i64, FnvBuildHasher>,
    pending_intervals: HashMap<T, u64, FnvBuildHasher>,
    started_at: Option<u64>,
}

impl<T: Clone + Eq + Hash + Display> Accumulator<T> {
    pub(crate) fn new() -> Accumulator<T> {
        Accumulator {
            counts: HashMap::default(),
            amounts: HashMap::default(),
            statuses: HashMap::default(),
            intervals: HashMap::default(),
            pending_intervals: HashMap::default(),
            started_at: None,
        }
    }

    /// Marks the beginning of the run; total run time is measured from here.
    pub(crate) fn start(&mut self, now: u64) { self.started_at = Some(now); }

    /// Folds one recorded event into the totals.
    pub(crate) fn apply(&mut self, event: MetricEvent<T>) {
        match event {
            MetricEvent::Increment(key) => {
                *self.counts.entry(key).or_insert(0) += 1;
            },
            MetricEvent::Add(key, amount) => {
                *self.amounts.entry(key).or_insert(0) += amount;
            },
            MetricEvent::Set(key, value) => {
                self.statuses.insert(key, value);
            },
            MetricEvent::Begin(key, at) => {
                // A repeated begin restarts the pending span.
                self.pending_intervals.insert(key, at);
            },
            MetricEvent::End(key, at) => match self.pending_intervals.remove(&key) {
                Some(begin) => {
                    *self.intervals.entry(key).or_insert(0) += at.saturating_sub(begin) as i64;
                },
                None => warn!(metric = %key, "dropping interval end without a matching begin"),
            },
        }
    }

    /// Takes a consistent point-in-time view of the totals.
    pub(crate) fn snapshot(&self, now: u64) -> TotalsSnapshot<T> {
        TotalsSnapshot {
            counts: self.counts.clone(),
            amounts: self.amounts.clone(),
            statuses: self.statuses.clone(),
            intervals: self.intervals.clone(),
            run_time_millis: match self.started_at {
                Some(started_at) => now.saturating_sub(started_at),
                None => 0,
            },
        }
    }
}

/// A point-in-time view of the running totals.
///
/// Keys that never recorded an event read as zero.
#[derive(Clone, Debug)]
pub struct TotalsSnapshot<T> {
    counts: HashMap<T, i64, FnvBuildHasher>,
    amounts: HashMap<T, i64, FnvBuildHasher>,
    statuses: HashMap<T, i64, FnvBuildHasher>,
    intervals: HashMap<T, i64, FnvBuildHasher>,
    run_time_millis: u64,
}

impl<T: Clone + Eq + Hash> TotalsSnapshot<T> {
    /// Total occurrences of a count metric.
    pub fn count_total(&self, key: &T) -> i64 { *self.counts.get(key).unwrap_or(&0) }

    /// Running total of an amount metric.
    pub fn amount_total(&self, key: &T) -> i64 { *self.amounts.get(key).unwrap_or(&0) }

    /// Latest recorded value of a status metric.
    pub fn status_value(&self, key: &T) -> i64 { *self.statuses.get(key).unwrap_or(&0) }

    /// Total milliseconds spent in an interval metric's completed spans.
    pub fn interval_total(&self, key: &T) -> i64 { *self.intervals.get(key).unwrap_or(&0) }

    /// Total run time since start, in milliseconds; zero if the logger never started.
    pub fn run_time_millis(&self) -> u64 { self.run_time_millis }

    /// Whole units of the given size elapsed since start.
    pub fn elapsed_units(&self, unit: TimeUnit) -> u64 { self.run_time_millis / unit.as_millis() }
}

impl<T> Serialize for TotalsSnapshot<T>
where
    T: Clone + Eq + Hash + Display,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let field_count =
            self.counts.len() + self.amounts.len() + self.statuses.len() + self.intervals.len() + 1;
        let mut map = serializer.serialize_map(Some(field_count))?;
        for (k, v) in &self.counts {
            map.serialize_entry(&format!("{}", k), v)?;
        }
        for (k, v) in &self.amounts {
            map.serialize_entry(&format!("{}", k), v)?;
        }
        for (k, v) in &self.statuses {
            map.serialize_entry(&format!("{}", k), v)?;
        }
        for (k, v) in &self.intervals {
            map.serialize_entry(&format!("{}", k), v)?;
        }
        map.serialize_entry("run_time_ms", &self.run_time_millis)?;
        map.end()
    }
}
