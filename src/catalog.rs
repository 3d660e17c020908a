use crate::metric::{Metric, MetricKind};
use fnv::FnvBuildHasher;
use hashbrown::{HashMap, HashSet};
use std::{fmt::Display, hash::Hash};
use thiserror::Error;

/// Errors raised while registering metrics or defining aggregates.
///
/// All of these are synchronous configuration-time failures: fatal to the call that caused
/// them, but the logger is left unchanged and the caller may retry with a corrected
/// definition.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DefinitionError {
    /// A required string argument was empty or all whitespace.
    #[error("argument '{0}' cannot be blank")]
    BlankArgument(&'static str),

    /// A metric with the same key has already been registered.
    #[error("metric '{0}' has already been registered")]
    DuplicateMetric(String),

    /// The publish name is already taken by another metric or aggregate counter.
    #[error("metric or metric aggregate with name '{0}' has already been registered")]
    NameCollision(String),

    /// The name plus its worst-case counter suffix exceeds the sink's name length limit.
    #[error("name '{name}' cannot exceed {max} characters")]
    NameTooLong { name: String, max: usize },

    /// The sink rejects names with leading or trailing whitespace.
    #[error("name '{0}' cannot contain leading or trailing whitespace")]
    NameWhitespace(String),

    /// The sink rejects names containing a double-quote.
    #[error("name '{0}' cannot contain the '\"' character")]
    NameDoubleQuote(String),

    /// The sink rejects names containing control characters.
    #[error("name '{0}' cannot contain control characters")]
    NameControlCharacter(String),

    /// An aggregate referenced a metric of the wrong kind.
    #[error("metric '{metric}' is a {actual} metric, expected {expected}")]
    KindMismatch {
        metric: String,
        expected: MetricKind,
        actual: MetricKind,
    },
}

/// Registry of raw metrics plus the namespace of publishable counter names.
///
/// The namespace is shared between raw metrics and every counter an aggregate definition
/// derives, so a collision anywhere in that set fails the registration or definition that
/// introduced it, regardless of ordering.
pub(crate) struct MetricCatalog<T> {
    metrics: Vec<Metric<T>>,
    by_key: HashMap<T, usize, FnvBuildHasher>,
    reserved: HashSet<String, FnvBuildHasher>,
}

impl<T: Clone + Eq + Hash + Display> MetricCatalog<T> {
    pub(crate) fn new() -> MetricCatalog<T> {
        MetricCatalog {
            metrics: Vec::new(),
            by_key: HashMap::default(),
            reserved: HashSet::default(),
        }
    }

    /// Registers a raw metric for direct publication.
    ///
    /// The metric's name is reserved in the namespace; its content is not validated here, that
    /// happens once all metrics are known, when the sink counters are created.
    pub(crate) fn register(&mut self, metric: Metric<T>) -> Result<(), DefinitionError> {
        if self.lookup(metric.key()).is_some() {
            return Err(DefinitionError::DuplicateMetric(metric.key().to_string()));
        }
        if self.is_name_reserved(metric.name()) {
            return Err(DefinitionError::NameCollision(metric.name().to_string()));
        }

        self.reserved.insert(metric.name().to_string());
        self.by_key.insert(metric.key().clone(), self.metrics.len());
        self.metrics.push(metric);
        Ok(())
    }

    /// Reserves a set of counter names, all or nothing.
    ///
    /// A failed reservation leaves the namespace untouched, so the caller can retry with a
    /// corrected name.
    pub(crate) fn reserve_all(&mut self, names: &[String]) -> Result<(), DefinitionError> {
        for name in names {
            if self.is_name_reserved(name) {
                return Err(DefinitionError::NameCollision(name.clone()));
            }
        }
        for name in names {
            self.reserved.insert(name.clone());
        }
        Ok(())
    }

    /// Whether a publish name is already taken by any metric or aggregate counter.
    pub(crate) fn is_name_reserved(&self, name: &str) -> bool { self.reserved.contains(name) }

    /// Looks up a registered metric by its key.
    pub(crate) fn lookup(&self, key: &T) -> Option<&Metric<T>> {
        self.by_key.get(key).map(move |idx| &self.metrics[*idx])
    }

    /// All registered metrics, in registration order.
    pub(crate) fn metrics(&self) -> &[Metric<T>] { &self.metrics }
}
