use crate::{
    aggregate::{AggregateDefinition, VARIANT_COUNT},
    catalog::DefinitionError,
    evaluator::AggregateValue,
    metric::{Metric, TimeUnit},
    sink::{CounterCreationData, CounterHandle, CounterType, PerfCounterSink, SinkError},
};
use fnv::FnvBuildHasher;
use hashbrown::HashMap;
use std::{fmt::Display, hash::Hash};
use thiserror::Error;
use tracing::info;

/// Longest counter name the sink accepts.
pub const MAX_COUNTER_NAME_LENGTH: usize = 80;

pub(crate) const INSTANTANEOUS_POSTFIX: &str = "Instantaneous";
pub(crate) const BASE_POSTFIX: &str = "Base";

/// Errors from the one-shot counter creation step.
///
/// Name validation failures abort the whole step before the sink is touched; category
/// failures abort it with the sink's own error preserved as the cause. Either way no counter
/// handles exist afterwards and the previous category, if any, may remain in place.
#[derive(Debug, Error)]
pub enum CreateCountersError {
    /// Counter creation was already performed on this logger.
    #[error("performance counters have already been created")]
    AlreadyCreated,

    /// A registered metric's name is empty.
    #[error("the name of metric '{key}' is blank")]
    BlankMetricName { key: String },

    /// A registered metric's name exceeds the sink's length limit.
    #[error("the name of metric '{key}' exceeds the {max} character limit imposed by the sink")]
    MetricNameTooLong { key: String, max: usize },

    /// A registered metric's name has leading or trailing whitespace.
    #[error("the name of metric '{key}' cannot contain leading or trailing whitespace")]
    MetricNameWhitespace { key: String },

    /// A registered metric's name contains a double-quote.
    #[error("the name of metric '{key}' cannot contain the '\"' character")]
    MetricNameDoubleQuote { key: String },

    /// A registered metric's name contains control characters.
    #[error("the name of metric '{key}' cannot contain control characters")]
    MetricNameControlCharacter { key: String },

    /// The sink failed while replacing the category.
    #[error("failed to create performance counter category")]
    CategoryCreation(#[source] SinkError),
}

/// Errors from binding counter handles at start.
#[derive(Debug, Error)]
pub enum StartError {
    /// `create_performance_counters` has not run yet.
    #[error("performance counters have not been created")]
    CountersNotCreated,

    /// The sink failed to produce a handle for a counter.
    #[error("failed to bind counter '{name}'")]
    CounterBinding {
        name: String,
        #[source]
        source: SinkError,
    },
}

pub(crate) fn instantaneous_name(name: &str) -> String { format!("{}{}", name, INSTANTANEOUS_POSTFIX) }

pub(crate) fn base_name(name: &str) -> String { format!("{}{}", name, BASE_POSTFIX) }

pub(crate) fn instantaneous_base_name(name: &str) -> String {
    format!("{}{}{}", name, INSTANTANEOUS_POSTFIX, BASE_POSTFIX)
}

fn instantaneous_description(description: &str) -> String {
    format!("{} (instantaneous counter)", description)
}

fn base_description(description: &str) -> String { format!("{} (base counter)", description) }

fn instantaneous_base_description(description: &str) -> String {
    format!("{} (instantaneous base counter)", description)
}

/// Validates an aggregate's base name against the sink's constraints, leaving room for the
/// given worst-case suffix budget.
pub(crate) fn validate_aggregate_name(name: &str, suffix_budget: usize) -> Result<(), DefinitionError> {
    if name.chars().count() + suffix_budget > MAX_COUNTER_NAME_LENGTH {
        return Err(DefinitionError::NameTooLong {
            name: name.to_string(),
            max: MAX_COUNTER_NAME_LENGTH - suffix_budget,
        });
    }
    if name != name.trim() {
        return Err(DefinitionError::NameWhitespace(name.to_string()));
    }
    if name.contains('"') {
        return Err(DefinitionError::NameDoubleQuote(name.to_string()));
    }
    if name.chars().any(char::is_control) {
        return Err(DefinitionError::NameControlCharacter(name.to_string()));
    }
    Ok(())
}

/// Worst-case counter name suffix an aggregate definition reserves room for.
pub(crate) fn suffix_budget<T>(definition: &AggregateDefinition<T>) -> usize {
    if definition.has_instantaneous() {
        INSTANTANEOUS_POSTFIX.len() + BASE_POSTFIX.len()
    } else {
        BASE_POSTFIX.len()
    }
}

fn validate_metric_name<T: Display>(metric: &Metric<T>) -> Result<(), CreateCountersError> {
    let name = metric.name();
    let key = || metric.key().to_string();
    if name.is_empty() {
        return Err(CreateCountersError::BlankMetricName { key: key() });
    }
    if name.chars().count() > MAX_COUNTER_NAME_LENGTH {
        return Err(CreateCountersError::MetricNameTooLong {
            key: key(),
            max: MAX_COUNTER_NAME_LENGTH,
        });
    }
    if name != name.trim() {
        return Err(CreateCountersError::MetricNameWhitespace { key: key() });
    }
    if name.contains('"') {
        return Err(CreateCountersError::MetricNameDoubleQuote { key: key() });
    }
    if name.chars().any(char::is_control) {
        return Err(CreateCountersError::MetricNameControlCharacter { key: key() });
    }
    Ok(())
}

/// The ordered counter set one aggregate definition maps onto.
///
/// Rate-over-time variants publish a per-second rate counter when the unit is seconds (the
/// sink derives the denominator itself) and an average plus base pair for larger units; the
/// raw-fraction variants publish a raw numerator plus base pair.
pub(crate) fn counter_set<T>(definition: &AggregateDefinition<T>) -> Vec<CounterCreationData> {
    let name = definition.name();
    let description = definition.description();
    match definition {
        AggregateDefinition::CountOverTimeUnit { time_unit, .. }
        | AggregateDefinition::AmountOverTimeUnit { time_unit, .. } => {
            let mut set = vec![CounterCreationData::new(name, description, CounterType::NumberOfItems64)];
            if *time_unit == TimeUnit::Second {
                set.push(CounterCreationData::new(
                    &instantaneous_name(name),
                    &instantaneous_description(description),
                    CounterType::RateOfCountsPerSecond64,
                ));
            } else {
                set.push(CounterCreationData::new(
                    &instantaneous_name(name),
                    &instantaneous_description(description),
                    CounterType::AverageCount64,
                ));
                set.push(CounterCreationData::new(
                    &instantaneous_base_name(name),
                    &instantaneous_base_description(description),
                    CounterType::AverageBase,
                ));
            }
            set
        },
        AggregateDefinition::AmountOverCount { .. } | AggregateDefinition::IntervalOverCount { .. } => vec![
            CounterCreationData::new(name, description, CounterType::NumberOfItems64),
            CounterCreationData::new(
                &instantaneous_name(name),
                &instantaneous_description(description),
                CounterType::AverageCount64,
            ),
            CounterCreationData::new(
                &instantaneous_base_name(name),
                &instantaneous_base_description(description),
                CounterType::AverageBase,
            ),
        ],
        AggregateDefinition::AmountOverAmount { .. } | AggregateDefinition::IntervalOverTotalRunTime { .. } => vec![
            CounterCreationData::new(name, description, CounterType::RawFraction),
            CounterCreationData::new(&base_name(name), &base_description(description), CounterType::RawBase),
        ],
    }
}

/// Maps registered metrics and aggregate definitions onto the sink's counter set.
///
/// Owns the sink capability and, after `start`, the live counter handles. Handles are
/// released when the projector is dropped, on every exit path.
pub(crate) struct SinkProjector<S: PerfCounterSink> {
    sink: S,
    category_name: String,
    category_description: String,
    creation_data: Vec<CounterCreationData>,
    counters: HashMap<String, S::Handle, FnvBuildHasher>,
    created: bool,
}

impl<S: PerfCounterSink> SinkProjector<S> {
    pub(crate) fn new(sink: S, category_name: String, category_description: String) -> SinkProjector<S> {
        SinkProjector {
            sink,
            category_name,
            category_description,
            creation_data: Vec::new(),
            counters: HashMap::default(),
            created: false,
        }
    }

    /// One-shot creation of the sink category and its counter table.
    ///
    /// Builds the creation list (raw metrics in registration order, then each aggregate's
    /// counter set grouped in variant order), validates every raw metric name, then replaces
    /// the category: delete if it exists, create anew.
    pub(crate) fn create_performance_counters<T: Clone + Eq + Hash + Display>(
        &mut self,
        metrics: &[Metric<T>],
        aggregates: &[AggregateDefinition<T>],
    ) -> Result<(), CreateCountersError> {
        if self.created {
            return Err(CreateCountersError::AlreadyCreated);
        }

        let mut creation_data = Vec::new();
        for metric in metrics {
            validate_metric_name(metric)?;
            creation_data.push(CounterCreationData::new(
                metric.name(),
                metric.description(),
                CounterType::NumberOfItems64,
            ));
        }
        for order in 0..VARIANT_COUNT {
            for definition in aggregates.iter().filter(|d| d.variant_order() == order) {
                creation_data.extend(counter_set(definition));
            }
        }

        self.replace_category(&creation_data)
            .map_err(CreateCountersError::CategoryCreation)?;
        info!(
            category = %self.category_name,
            counters = creation_data.len(),
            "created performance counter category"
        );

        self.creation_data = creation_data;
        self.created = true;
        Ok(())
    }

    fn replace_category(&mut self, creation_data: &[CounterCreationData]) -> Result<(), SinkError> {
        if self.sink.category_exists(&self.category_name)? {
            self.sink.delete_category(&self.category_name)?;
        }
        self.sink
            .create_category(&self.category_name, &self.category_description, creation_data)
    }

    /// Binds every created counter to a live sink handle.
    pub(crate) fn start(&mut self) -> Result<(), StartError> {
        if !self.created {
            return Err(StartError::CountersNotCreated);
        }
        for data in &self.creation_data {
            let handle = self
                .sink
                .create_counter(&self.category_name, &data.name, false)
                .map_err(|source| StartError::CounterBinding {
                    name: data.name.clone(),
                    source,
                })?;
            self.counters.insert(data.name.clone(), handle);
        }
        info!(
            category = %self.category_name,
            counters = self.counters.len(),
            "bound performance counter handles"
        );
        Ok(())
    }

    /// Writes a raw value to the named counter; a no-op if the name was never bound.
    pub(crate) fn write(&mut self, name: &str, value: i64) {
        if let Some(counter) = self.counters.get_mut(name) {
            counter.set_raw_value(value);
        }
    }

    /// Writes one evaluated aggregate to its counter set.
    pub(crate) fn publish_aggregate<T>(&mut self, definition: &AggregateDefinition<T>, value: AggregateValue) {
        let name = definition.name();
        self.write(name, value.primary);
        if let Some(instantaneous) = value.instantaneous {
            self.write(&instantaneous_name(name), instantaneous);
        }
        if let Some(base) = value.base {
            let base_counter = if value.instantaneous.is_some() {
                instantaneous_base_name(name)
            } else {
                base_name(name)
            };
            self.write(&base_counter, base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        counter_set, instantaneous_base_name, instantaneous_name, suffix_budget, validate_aggregate_name,
        CreateCountersError, SinkProjector, StartError,
    };
    use crate::{
        aggregate::AggregateDefinition,
        catalog::DefinitionError,
        evaluator::AggregateValue,
        metric::{Metric, TimeUnit},
        sink::{CounterType, MockSink},
    };

    fn projector(sink: &MockSink) -> SinkProjector<MockSink> {
        SinkProjector::new(
            sink.clone(),
            "TestCategory".to_string(),
            "Description of Test Category".to_string(),
        )
    }

    fn names_and_types(definition: &AggregateDefinition<&'static str>) -> Vec<(String, CounterType)> {
        counter_set(definition)
            .into_iter()
            .map(|data| (data.name, data.counter_type))
            .collect()
    }

    #[test]
    fn test_counter_set_count_over_second() {
        let definition = AggregateDefinition::CountOverTimeUnit {
            count: "msg_rx",
            time_unit: TimeUnit::Second,
            name: "MessagesReceivedPerSecond".to_string(),
            description: "The number of messages received per second.".to_string(),
        };
        assert_eq!(
            names_and_types(&definition),
            vec![
                ("MessagesReceivedPerSecond".to_string(), CounterType::NumberOfItems64),
                (
                    "MessagesReceivedPerSecondInstantaneous".to_string(),
                    CounterType::RateOfCountsPerSecond64
                ),
            ]
        );
    }

    #[test]
    fn test_counter_set_count_over_minute() {
        let definition = AggregateDefinition::CountOverTimeUnit {
            count: "msg_rx",
            time_unit: TimeUnit::Minute,
            name: "MessagesReceivedPerMinute".to_string(),
            description: "The number of messages received per minute.".to_string(),
        };
        assert_eq!(
            names_and_types(&definition),
            vec![
                ("MessagesReceivedPerMinute".to_string(), CounterType::NumberOfItems64),
                (
                    "MessagesReceivedPerMinuteInstantaneous".to_string(),
                    CounterType::AverageCount64
                ),
                (
                    "MessagesReceivedPerMinuteInstantaneousBase".to_string(),
                    CounterType::AverageBase
                ),
            ]
        );
    }

    #[test]
    fn test_counter_set_amount_over_count() {
        let definition = AggregateDefinition::AmountOverCount {
            amount: "bytes_rx",
            count: "msg_rx",
            name: "BytesReceivedPerMessage".to_string(),
            description: "The number of bytes received per message.".to_string(),
        };
        assert_eq!(
            names_and_types(&definition),
            vec![
                ("BytesReceivedPerMessage".to_string(), CounterType::NumberOfItems64),
                (
                    "BytesReceivedPerMessageInstantaneous".to_string(),
                    CounterType::AverageCount64
                ),
                (
                    "BytesReceivedPerMessageInstantaneousBase".to_string(),
                    CounterType::AverageBase
                ),
            ]
        );
    }

    #[test]
    fn test_counter_set_amount_over_time_unit() {
        let second = AggregateDefinition::AmountOverTimeUnit {
            amount: "bytes_rx",
            time_unit: TimeUnit::Second,
            name: "BytesReceivedPerSecond".to_string(),
            description: "The number of bytes received per second.".to_string(),
        };
        assert_eq!(
            names_and_types(&second),
            vec![
                ("BytesReceivedPerSecond".to_string(), CounterType::NumberOfItems64),
                (
                    "BytesReceivedPerSecondInstantaneous".to_string(),
                    CounterType::RateOfCountsPerSecond64
                ),
            ]
        );

        let hour = AggregateDefinition::AmountOverTimeUnit {
            amount: "bytes_rx",
            time_unit: TimeUnit::Hour,
            name: "BytesReceivedPerHour".to_string(),
            description: "The number of bytes received per hour.".to_string(),
        };
        assert_eq!(
            names_and_types(&hour),
            vec![
                ("BytesReceivedPerHour".to_string(), CounterType::NumberOfItems64),
                ("BytesReceivedPerHourInstantaneous".to_string(), CounterType::AverageCount64),
                (
                    "BytesReceivedPerHourInstantaneousBase".to_string(),
                    CounterType::AverageBase
                ),
            ]
        );
    }

    #[test]
    fn test_counter_set_fraction_variants() {
        let ratio = AggregateDefinition::AmountOverAmount {
            numerator: "cached_bytes",
            denominator: "total_bytes",
            name: "CachedBytesFraction".to_string(),
            description: "Fraction of bytes served from cache.".to_string(),
        };
        assert_eq!(
            names_and_types(&ratio),
            vec![
                ("CachedBytesFraction".to_string(), CounterType::RawFraction),
                ("CachedBytesFractionBase".to_string(), CounterType::RawBase),
            ]
        );

        let runtime = AggregateDefinition::IntervalOverTotalRunTime {
            interval: "proc_time",
            name: "TimeProcessing".to_string(),
            description: "Fraction of run time spent processing.".to_string(),
        };
        assert_eq!(
            names_and_types(&runtime),
            vec![
                ("TimeProcessing".to_string(), CounterType::RawFraction),
                ("TimeProcessingBase".to_string(), CounterType::RawBase),
            ]
        );
    }

    #[test]
    fn test_counter_set_interval_over_count() {
        let definition = AggregateDefinition::IntervalOverCount {
            interval: "read_time",
            count: "read_ops",
            name: "ReadTimePerOperation".to_string(),
            description: "Average disk read time per operation.".to_string(),
        };
        assert_eq!(
            names_and_types(&definition),
            vec![
                ("ReadTimePerOperation".to_string(), CounterType::NumberOfItems64),
                ("ReadTimePerOperationInstantaneous".to_string(), CounterType::AverageCount64),
                (
                    "ReadTimePerOperationInstantaneousBase".to_string(),
                    CounterType::AverageBase
                ),
            ]
        );
    }

    #[test]
    fn test_counter_descriptions() {
        let definition = AggregateDefinition::AmountOverCount {
            amount: "bytes_rx",
            count: "msg_rx",
            name: "BytesReceivedPerMessage".to_string(),
            description: "The number of bytes received per message".to_string(),
        };
        let set = counter_set(&definition);
        assert_eq!(set[0].description, "The number of bytes received per message");
        assert_eq!(
            set[1].description,
            "The number of bytes received per message (instantaneous counter)"
        );
        assert_eq!(
            set[2].description,
            "The number of bytes received per message (instantaneous base counter)"
        );
    }

    #[test]
    fn test_validate_aggregate_name_length_budgets() {
        // 63 characters with the 17 character "InstantaneousBase" budget is the limit.
        let longest = "a".repeat(63);
        assert_eq!(validate_aggregate_name(&longest, 17), Ok(()));
        let too_long = "a".repeat(64);
        assert_eq!(
            validate_aggregate_name(&too_long, 17),
            Err(DefinitionError::NameTooLong {
                name: too_long.clone(),
                max: 63,
            })
        );

        // 76 characters with the 4 character "Base" budget is the limit.
        let longest = "a".repeat(76);
        assert_eq!(validate_aggregate_name(&longest, 4), Ok(()));
        let too_long = "a".repeat(77);
        assert_eq!(
            validate_aggregate_name(&too_long, 4),
            Err(DefinitionError::NameTooLong {
                name: too_long.clone(),
                max: 76,
            })
        );
    }

    #[test]
    fn test_validate_aggregate_name_characters() {
        assert_eq!(
            validate_aggregate_name(" WhitespaceName ", 17),
            Err(DefinitionError::NameWhitespace(" WhitespaceName ".to_string()))
        );
        assert_eq!(
            validate_aggregate_name("DoubleQuote\"Name", 17),
            Err(DefinitionError::NameDoubleQuote("DoubleQuote\"Name".to_string()))
        );
        assert_eq!(
            validate_aggregate_name("Control\u{2}Name", 17),
            Err(DefinitionError::NameControlCharacter("Control\u{2}Name".to_string()))
        );
    }

    #[test]
    fn test_suffix_budget_per_variant() {
        let averaged = AggregateDefinition::AmountOverCount {
            amount: "bytes_rx",
            count: "msg_rx",
            name: "BytesReceivedPerMessage".to_string(),
            description: "Bytes per message.".to_string(),
        };
        assert_eq!(suffix_budget(&averaged), 17);

        let fraction = AggregateDefinition::IntervalOverTotalRunTime {
            interval: "proc_time",
            name: "TimeProcessing".to_string(),
            description: "Fraction of run time spent processing.".to_string(),
        };
        assert_eq!(suffix_budget(&fraction), 4);
    }

    #[test]
    fn test_create_orders_metrics_before_aggregates() {
        let sink = MockSink::new();
        let mut projector = projector(&sink);

        let metrics = vec![
            Metric::count("msg_rx", "MessagesReceived", "The number of messages received."),
            Metric::amount("bytes_rx", "MessageBytesReceived", "Bytes in received messages."),
        ];
        // Deliberately defined in reverse variant order; creation must regroup them.
        let aggregates = vec![
            AggregateDefinition::IntervalOverTotalRunTime {
                interval: "proc_time",
                name: "TimeProcessing".to_string(),
                description: "Fraction of run time spent processing.".to_string(),
            },
            AggregateDefinition::CountOverTimeUnit {
                count: "msg_rx",
                time_unit: TimeUnit::Second,
                name: "MessagesReceivedPerSecond".to_string(),
                description: "The number of messages received per second.".to_string(),
            },
        ];
        projector.create_performance_counters(&metrics, &aggregates).unwrap();

        let (category, description, counters) = sink.created().unwrap();
        assert_eq!(category, "TestCategory");
        assert_eq!(description, "Description of Test Category");
        let names: Vec<&str> = counters.iter().map(|data| data.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "MessagesReceived",
                "MessageBytesReceived",
                "MessagesReceivedPerSecond",
                "MessagesReceivedPerSecondInstantaneous",
                "TimeProcessing",
                "TimeProcessingBase",
            ]
        );
        assert!(sink.deleted().is_empty());
    }

    #[test]
    fn test_create_deletes_existing_category() {
        let sink = MockSink::new();
        sink.set_existing("TestCategory");
        let mut projector = projector(&sink);

        let metrics = vec![Metric::count("msg_rx", "MessagesReceived", "The number of messages received.")];
        projector
            .create_performance_counters::<&str>(&metrics, &[])
            .unwrap();

        assert_eq!(sink.deleted(), vec!["TestCategory".to_string()]);
        assert!(sink.created().is_some());
    }

    #[test]
    fn test_create_is_one_shot() {
        let sink = MockSink::new();
        let mut projector = projector(&sink);
        projector.create_performance_counters::<&str>(&[], &[]).unwrap();

        let err = projector.create_performance_counters::<&str>(&[], &[]).unwrap_err();
        assert!(matches!(err, CreateCountersError::AlreadyCreated));
    }

    #[test]
    fn test_create_wraps_sink_failure_with_cause() {
        let sink = MockSink::new();
        sink.fail_exists("access denied");
        let mut projector = projector(&sink);

        let err = projector.create_performance_counters::<&str>(&[], &[]).unwrap_err();
        assert_eq!(err.to_string(), "failed to create performance counter category");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "access denied");
    }

    #[test]
    fn test_create_rejects_invalid_metric_names() {
        let cases: Vec<(Metric<&str>, &str)> = vec![
            (Metric::status("blank", "", "Blank name."), "is blank"),
            (
                Metric::status("long", &"a".repeat(81), "Too long."),
                "exceeds the 80 character limit",
            ),
            (
                Metric::status("ws", " AvailableMemory", "Whitespace."),
                "leading or trailing whitespace",
            ),
            (
                Metric::status("quote", "Available\"Memory", "Quote."),
                "cannot contain the '\"' character",
            ),
            (
                Metric::status("ctrl", "Available\u{1}Memory", "Control."),
                "cannot contain control characters",
            ),
        ];

        for (metric, expected) in cases {
            let sink = MockSink::new();
            let mut projector = projector(&sink);
            let err = projector
                .create_performance_counters(&[metric], &[] as &[AggregateDefinition<&str>])
                .unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected '{}' in '{}'",
                expected,
                err
            );
            // Validation failures abort before the sink is touched.
            assert!(sink.created().is_none());
        }
    }

    #[test]
    fn test_start_requires_created_counters() {
        let sink = MockSink::new();
        let mut projector = projector(&sink);

        let err = projector.start().unwrap_err();
        assert!(matches!(err, StartError::CountersNotCreated));
    }

    #[test]
    fn test_start_binds_every_counter() {
        let sink = MockSink::new();
        let mut projector = projector(&sink);
        let metrics = vec![Metric::count("msg_rx", "MessagesReceived", "The number of messages received.")];
        let aggregates = vec![AggregateDefinition::AmountOverCount {
            amount: "bytes_rx",
            count: "msg_rx",
            name: "BytesReceivedPerMessage".to_string(),
            description: "Bytes per message.".to_string(),
        }];
        projector.create_performance_counters(&metrics, &aggregates).unwrap();
        projector.start().unwrap();

        assert_eq!(
            sink.bound(),
            vec![
                "MessagesReceived".to_string(),
                "BytesReceivedPerMessage".to_string(),
                "BytesReceivedPerMessageInstantaneous".to_string(),
                "BytesReceivedPerMessageInstantaneousBase".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_to_unbound_counter_is_noop() {
        let sink = MockSink::new();
        let mut projector = projector(&sink);
        projector.create_performance_counters::<&str>(&[], &[]).unwrap();
        projector.start().unwrap();

        projector.write("NeverRegistered", 42);
        assert!(sink.writes("NeverRegistered").is_empty());
    }

    #[test]
    fn test_publish_aggregate_routes_base_suffix() {
        let sink = MockSink::new();
        let mut projector = projector(&sink);
        let averaged = AggregateDefinition::AmountOverCount {
            amount: "bytes_rx",
            count: "msg_rx",
            name: "BytesReceivedPerMessage".to_string(),
            description: "Bytes per message.".to_string(),
        };
        let fraction = AggregateDefinition::AmountOverAmount {
            numerator: "cached_bytes",
            denominator: "total_bytes",
            name: "CachedBytesFraction".to_string(),
            description: "Fraction of bytes served from cache.".to_string(),
        };
        projector
            .create_performance_counters::<&str>(&[], &[averaged.clone(), fraction.clone()])
            .unwrap();
        projector.start().unwrap();

        projector.publish_aggregate(
            &averaged,
            AggregateValue {
                primary: 254,
                instantaneous: Some(509),
                base: Some(2),
            },
        );
        assert_eq!(sink.writes("BytesReceivedPerMessage"), vec![254]);
        assert_eq!(sink.writes(&instantaneous_name("BytesReceivedPerMessage")), vec![509]);
        assert_eq!(
            sink.writes(&instantaneous_base_name("BytesReceivedPerMessage")),
            vec![2]
        );

        projector.publish_aggregate(
            &fraction,
            AggregateValue {
                primary: 588,
                instantaneous: None,
                base: Some(528),
            },
        );
        assert_eq!(sink.writes("CachedBytesFraction"), vec![588]);
        assert_eq!(sink.writes("CachedBytesFractionBase"), vec![528]);
    }
}
