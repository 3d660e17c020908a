use crate::metric::TimeUnit;

/// A derived aggregate over one or two raw metrics' running totals.
///
/// Definitions are immutable values created at configuration time, before any sink counters
/// exist. `name` is the base publish name; depending on the variant, suffixed companion
/// counters are derived from it when the sink category is created.
#[derive(Clone, Debug)]
pub enum AggregateDefinition<T> {
    /// Occurrences of a count metric per unit of elapsed time.
    CountOverTimeUnit {
        count: T,
        time_unit: TimeUnit,
        name: String,
        description: String,
    },

    /// Total of an amount metric per occurrence of a count metric.
    AmountOverCount {
        amount: T,
        count: T,
        name: String,
        description: String,
    },

    /// Total of an amount metric per unit of elapsed time.
    AmountOverTimeUnit {
        amount: T,
        time_unit: TimeUnit,
        name: String,
        description: String,
    },

    /// Ratio of two amount metric totals.
    AmountOverAmount {
        numerator: T,
        denominator: T,
        name: String,
        description: String,
    },

    /// Total of an interval metric per occurrence of a count metric.
    IntervalOverCount {
        interval: T,
        count: T,
        name: String,
        description: String,
    },

    /// Total of an interval metric as a fraction of the logger's total run time.
    IntervalOverTotalRunTime {
        interval: T,
        name: String,
        description: String,
    },
}

impl<T> AggregateDefinition<T> {
    pub fn name(&self) -> &str {
        match self {
            AggregateDefinition::CountOverTimeUnit { name, .. }
            | AggregateDefinition::AmountOverCount { name, .. }
            | AggregateDefinition::AmountOverTimeUnit { name, .. }
            | AggregateDefinition::AmountOverAmount { name, .. }
            | AggregateDefinition::IntervalOverCount { name, .. }
            | AggregateDefinition::IntervalOverTotalRunTime { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AggregateDefinition::CountOverTimeUnit { description, .. }
            | AggregateDefinition::AmountOverCount { description, .. }
            | AggregateDefinition::AmountOverTimeUnit { description, .. }
            | AggregateDefinition::AmountOverAmount { description, .. }
            | AggregateDefinition::IntervalOverCount { description, .. }
            | AggregateDefinition::IntervalOverTotalRunTime { description, .. } => description,
        }
    }

    /// Whether the variant publishes an instantaneous companion counter.
    ///
    /// The two raw-fraction variants instead publish a plain base counter; the sink computes
    /// their ratio itself from the raw numerator/denominator pair.
    pub(crate) fn has_instantaneous(&self) -> bool {
        !matches!(
            self,
            AggregateDefinition::AmountOverAmount { .. } | AggregateDefinition::IntervalOverTotalRunTime { .. }
        )
    }

    /// The time unit in the denominator, if the variant rates over elapsed time.
    pub(crate) fn time_unit(&self) -> Option<TimeUnit> {
        match self {
            AggregateDefinition::CountOverTimeUnit { time_unit, .. }
            | AggregateDefinition::AmountOverTimeUnit { time_unit, .. } => Some(*time_unit),
            _ => None,
        }
    }

    /// Position of the variant in the sink's counter-creation ordering.
    pub(crate) fn variant_order(&self) -> usize {
        match self {
            AggregateDefinition::CountOverTimeUnit { .. } => 0,
            AggregateDefinition::AmountOverCount { .. } => 1,
            AggregateDefinition::AmountOverTimeUnit { .. } => 2,
            AggregateDefinition::AmountOverAmount { .. } => 3,
            AggregateDefinition::IntervalOverCount { .. } => 4,
            AggregateDefinition::IntervalOverTotalRunTime { .. } => 5,
        }
    }
}

pub(crate) const VARIANT_COUNT: usize = 6;
