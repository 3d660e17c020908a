use crate::{
    accumulator::Accumulator,
    aggregate::AggregateDefinition,
    catalog::{DefinitionError, MetricCatalog},
    clock::Clock,
    configuration::Configuration,
    control::{ControlMessage, Controller},
    evaluator,
    metric::{Metric, MetricEvent, MetricKind, TimeUnit},
    projector::{self, CreateCountersError, SinkProjector, StartError},
    recorder::Recorder,
    sink::PerfCounterSink,
};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::{fmt::Display, hash::Hash, time::Duration};
use tracing::debug;

/// Publishes application metrics and derived aggregates into a performance counter sink.
///
/// Configuration happens in phases: register raw metrics and define aggregates, create the
/// sink counters once, then start and hand the logger to [`run`](PerformanceCounterLogger::run)
/// on a dedicated thread. Cloneable [`Recorder`] and [`Controller`] handles are the only
/// surface the rest of the application needs.
pub struct PerformanceCounterLogger<T, S: PerfCounterSink> {
    catalog: MetricCatalog<T>,
    aggregates: Vec<AggregateDefinition<T>>,
    projector: SinkProjector<S>,
    accumulator: Accumulator<T>,
    clock: Clock,
    flush_interval: Duration,
    event_tx: Sender<MetricEvent<T>>,
    event_rx: Receiver<MetricEvent<T>>,
    control_tx: Sender<ControlMessage<T>>,
    control_rx: Receiver<ControlMessage<T>>,
}

impl<T, S> PerformanceCounterLogger<T, S>
where
    T: Clone + Eq + Hash + Display,
    S: PerfCounterSink,
{
    /// Convenience to get a [`Configuration`] builder.
    pub fn builder(category_name: &str, category_description: &str) -> Configuration<T> {
        Configuration::new(category_name, category_description)
    }

    pub(crate) fn from_config(config: Configuration<T>, sink: S) -> PerformanceCounterLogger<T, S> {
        let (event_tx, event_rx) = bounded(config.capacity);
        let (control_tx, control_rx) = bounded(16);
        PerformanceCounterLogger {
            catalog: MetricCatalog::new(),
            aggregates: Vec::new(),
            projector: SinkProjector::new(sink, config.category_name, config.category_description),
            accumulator: Accumulator::new(),
            clock: config.clock,
            flush_interval: config.flush_interval,
            event_tx,
            event_rx,
            control_tx,
            control_rx,
        }
    }

    /// Gets a handle for recording metric events.
    pub fn get_recorder(&self) -> Recorder<T> {
        Recorder::new(self.event_tx.clone(), self.clock.clone())
    }

    /// Gets a handle for controlling the publish loop.
    pub fn get_controller(&self) -> Controller<T> {
        Controller::new(self.control_tx.clone())
    }

    /// Registers a raw metric for direct publication under its own counter name.
    ///
    /// Registration is only needed for direct publication; aggregates may reference metrics
    /// that were never registered, their running totals accumulate either way.
    pub fn register_metric(&mut self, metric: Metric<T>) -> Result<(), DefinitionError> {
        self.catalog.register(metric)
    }

    /// Defines an aggregate rating a count metric over a unit of elapsed time.
    pub fn define_count_over_time_unit(
        &mut self,
        count: &Metric<T>,
        time_unit: TimeUnit,
        name: &str,
        description: &str,
    ) -> Result<(), DefinitionError> {
        validate_blank(name, "name")?;
        validate_blank(description, "description")?;
        expect_kind(count, MetricKind::Count)?;
        self.define(AggregateDefinition::CountOverTimeUnit {
            count: count.key().clone(),
            time_unit,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    /// Defines an aggregate averaging an amount metric over a count metric's occurrences.
    pub fn define_amount_over_count(
        &mut self,
        amount: &Metric<T>,
        count: &Metric<T>,
        name: &str,
        description: &str,
    ) -> Result<(), DefinitionError> {
        validate_blank(name, "name")?;
        validate_blank(description, "description")?;
        expect_kind(amount, MetricKind::Amount)?;
        expect_kind(count, MetricKind::Count)?;
        self.define(AggregateDefinition::AmountOverCount {
            amount: amount.key().clone(),
            count: count.key().clone(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    /// Defines an aggregate rating an amount metric over a unit of elapsed time.
    pub fn define_amount_over_time_unit(
        &mut self,
        amount: &Metric<T>,
        time_unit: TimeUnit,
        name: &str,
        description: &str,
    ) -> Result<(), DefinitionError> {
        validate_blank(name, "name")?;
        validate_blank(description, "description")?;
        expect_kind(amount, MetricKind::Amount)?;
        self.define(AggregateDefinition::AmountOverTimeUnit {
            amount: amount.key().clone(),
            time_unit,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    /// Defines an aggregate publishing the ratio of two amount metrics' totals.
    pub fn define_amount_over_amount(
        &mut self,
        numerator: &Metric<T>,
        denominator: &Metric<T>,
        name: &str,
        description: &str,
    ) -> Result<(), DefinitionError> {
        validate_blank(name, "name")?;
        validate_blank(description, "description")?;
        expect_kind(numerator, MetricKind::Amount)?;
        expect_kind(denominator, MetricKind::Amount)?;
        self.define(AggregateDefinition::AmountOverAmount {
            numerator: numerator.key().clone(),
            denominator: denominator.key().clone(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    /// Defines an aggregate averaging an interval metric over a count metric's occurrences.
    pub fn define_interval_over_count(
        &mut self,
        interval: &Metric<T>,
        count: &Metric<T>,
        name: &str,
        description: &str,
    ) -> Result<(), DefinitionError> {
        validate_blank(name, "name")?;
        validate_blank(description, "description")?;
        expect_kind(interval, MetricKind::Interval)?;
        expect_kind(count, MetricKind::Count)?;
        self.define(AggregateDefinition::IntervalOverCount {
            interval: interval.key().clone(),
            count: count.key().clone(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    /// Defines an aggregate publishing an interval metric's total as a fraction of run time.
    pub fn define_interval_over_total_run_time(
        &mut self,
        interval: &Metric<T>,
        name: &str,
        description: &str,
    ) -> Result<(), DefinitionError> {
        validate_blank(name, "name")?;
        validate_blank(description, "description")?;
        expect_kind(interval, MetricKind::Interval)?;
        self.define(AggregateDefinition::IntervalOverTotalRunTime {
            interval: interval.key().clone(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    fn define(&mut self, definition: AggregateDefinition<T>) -> Result<(), DefinitionError> {
        projector::validate_aggregate_name(definition.name(), projector::suffix_budget(&definition))?;

        let mut names = vec![definition.name().to_string()];
        if definition.has_instantaneous() {
            names.push(projector::instantaneous_name(definition.name()));
            if definition.time_unit() != Some(TimeUnit::Second) {
                names.push(projector::instantaneous_base_name(definition.name()));
            }
        } else {
            names.push(projector::base_name(definition.name()));
        }
        self.catalog.reserve_all(&names)?;

        self.aggregates.push(definition);
        Ok(())
    }

    /// Creates the sink category and its full counter table.
    ///
    /// One-shot: call after all metrics are registered and all aggregates are defined. Raw
    /// metrics come first in registration order, then each aggregate's counter set.
    pub fn create_performance_counters(&mut self) -> Result<(), CreateCountersError> {
        self.projector
            .create_performance_counters(self.catalog.metrics(), &self.aggregates)
    }

    /// Binds counter handles and begins measuring total run time.
    pub fn start(&mut self) -> Result<(), StartError> {
        self.projector.start()?;
        self.accumulator.start(self.clock.now_millis());
        Ok(())
    }

    /// Runs the publish loop, blocking until a controller sends stop.
    ///
    /// Incoming events are folded into the running totals as they arrive; every flush
    /// interval the totals are projected onto the sink counters.
    pub fn run(&mut self) {
        let event_rx = self.event_rx.clone();
        let control_rx = self.control_rx.clone();
        let ticker = tick(self.flush_interval);
        loop {
            select! {
                recv(event_rx) -> result => match result {
                    Ok(event) => self.accumulator.apply(event),
                    Err(_) => break,
                },
                recv(control_rx) -> result => match result {
                    Ok(ControlMessage::Stop) | Err(_) => break,
                    Ok(ControlMessage::Snapshot(reply_tx)) => {
                        self.drain_events();
                        let snapshot = self.accumulator.snapshot(self.clock.now_millis());
                        let _ = reply_tx.send(snapshot);
                    },
                },
                recv(ticker) -> _ => {
                    self.drain_events();
                    self.publish();
                },
            }
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.accumulator.apply(event);
        }
    }

    /// Projects the current totals onto the sink counters.
    ///
    /// Registered metrics publish their totals directly; each aggregate publishes its
    /// evaluated counter set, or nothing when its skip condition holds.
    fn publish(&mut self) {
        let snapshot = self.accumulator.snapshot(self.clock.now_millis());
        for metric in self.catalog.metrics() {
            let value = match metric.kind() {
                MetricKind::Count => snapshot.count_total(metric.key()),
                MetricKind::Amount => snapshot.amount_total(metric.key()),
                MetricKind::Status => snapshot.status_value(metric.key()),
                MetricKind::Interval => snapshot.interval_total(metric.key()),
            };
            self.projector.write(metric.name(), value);
        }
        for definition in &self.aggregates {
            if let Some(value) = evaluator::evaluate(definition, &snapshot) {
                self.projector.publish_aggregate(definition, value);
            }
        }
        debug!(run_time_ms = snapshot.run_time_millis(), "flushed metrics to sink");
    }
}

fn validate_blank(value: &str, argument: &'static str) -> Result<(), DefinitionError> {
    if value.trim().is_empty() {
        Err(DefinitionError::BlankArgument(argument))
    } else {
        Ok(())
    }
}

fn expect_kind<T: Display>(metric: &Metric<T>, expected: MetricKind) -> Result<(), DefinitionError> {
    if metric.kind() == expected {
        Ok(())
    } else {
        Err(DefinitionError::KindMismatch {
            metric: metric.key().to_string(),
            expected,
            actual: metric.kind(),
        })
    }
}
