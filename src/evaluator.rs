use crate::{accumulator::TotalsSnapshot, aggregate::AggregateDefinition, metric::TimeUnit};
use std::hash::Hash;

/// The values an aggregate publishes for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AggregateValue {
    /// Value for the primary counter.
    pub(crate) primary: i64,

    /// Raw numerator for the instantaneous companion counter, if the variant has one.
    pub(crate) instantaneous: Option<i64>,

    /// Denominator for the base companion counter, if one is published this tick.
    pub(crate) base: Option<i64>,
}

/// Computes the published values for one aggregate from the current totals.
///
/// Returns `None` when the variant's skip condition holds (zero denominator, or no elapsed
/// time yet). A skipped aggregate writes none of its counters this tick, leaving their prior
/// sink values in place; publishing zeros instead would be misleading before any data exists.
pub(crate) fn evaluate<T>(definition: &AggregateDefinition<T>, totals: &TotalsSnapshot<T>) -> Option<AggregateValue>
where
    T: Clone + Eq + Hash,
{
    match definition {
        AggregateDefinition::CountOverTimeUnit { count, time_unit, .. } => {
            let instances = totals.count_total(count);
            let units = totals.elapsed_units(*time_unit) as i64;
            if units == 0 {
                return None;
            }
            Some(AggregateValue {
                primary: ratio(instances, units),
                instantaneous: Some(instances),
                base: instantaneous_base(*time_unit, units),
            })
        },
        AggregateDefinition::AmountOverCount { amount, count, .. } => {
            let total = totals.amount_total(amount);
            let instances = totals.count_total(count);
            if instances == 0 {
                return None;
            }
            Some(AggregateValue {
                primary: ratio(total, instances),
                instantaneous: Some(total),
                base: Some(instances),
            })
        },
        AggregateDefinition::AmountOverTimeUnit { amount, time_unit, .. } => {
            let total = totals.amount_total(amount);
            let units = totals.elapsed_units(*time_unit) as i64;
            if units == 0 {
                return None;
            }
            Some(AggregateValue {
                primary: ratio(total, units),
                instantaneous: Some(total),
                base: instantaneous_base(*time_unit, units),
            })
        },
        AggregateDefinition::AmountOverAmount { numerator, denominator, .. } => {
            let denominator_total = totals.amount_total(denominator);
            if denominator_total == 0 {
                return None;
            }
            Some(AggregateValue {
                primary: totals.amount_total(numerator),
                instantaneous: None,
                base: Some(denominator_total),
            })
        },
        AggregateDefinition::IntervalOverCount { interval, count, .. } => {
            let total = totals.interval_total(interval);
            let instances = totals.count_total(count);
            if instances == 0 {
                return None;
            }
            Some(AggregateValue {
                primary: ratio(total, instances),
                instantaneous: Some(total),
                base: Some(instances),
            })
        },
        AggregateDefinition::IntervalOverTotalRunTime { interval, .. } => {
            let run_time = totals.run_time_millis() as i64;
            if run_time <= 0 {
                return None;
            }
            Some(AggregateValue {
                primary: totals.interval_total(interval),
                instantaneous: None,
                base: Some(run_time),
            })
        },
    }
}

/// Truncating floating-point division, as published to integer-valued counters.
fn ratio(numerator: i64, denominator: i64) -> i64 { (numerator as f64 / denominator as f64) as i64 }

/// Per-second rates let the sink derive the denominator itself; all other time units need the
/// elapsed unit count published to an accompanying base counter.
fn instantaneous_base(time_unit: TimeUnit, units: i64) -> Option<i64> {
    if time_unit == TimeUnit::Second {
        None
    } else {
        Some(units)
    }
}
