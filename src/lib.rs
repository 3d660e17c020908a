//! High-speed metric logging into performance counters.
//!
//! `countersink` lets applications record counts, amounts, statuses, and intervals through a
//! cheap cloneable handle, and publishes their running totals, plus derived aggregates such
//! as rates, averages, and fractions, into a performance counter sink on a fixed flush
//! interval.
//!
//! # Structure
//!
//! The library is centered around the [`PerformanceCounterLogger`], which is configured with
//! the raw metrics to publish and the aggregates derived from them, creates the sink's
//! counter category once, and then runs a blocking publish loop on a dedicated thread.
//! Applications talk to the running loop through two cloneable handles: a [`Recorder`] for
//! submitting metric events and a [`Controller`] for snapshots and shutdown.
//!
//! The actual counter store is abstracted behind the [`PerfCounterSink`] trait, so the
//! publishing pipeline can be exercised against the in-memory [`MockSink`] in tests.
//!
//! # Example
//!
//! ```
//! # use countersink::{Configuration, Metric, MockSink, TimeUnit};
//! # use std::{thread, time::Duration};
//! let mut logger = Configuration::new("MessagingStats", "Messaging system metrics")
//!     .flush_interval(Duration::from_millis(50))
//!     .build(MockSink::new())
//!     .unwrap();
//!
//! let received = Metric::count("msg_rx", "MessagesReceived", "The number of messages received.");
//! let bytes = Metric::amount("bytes_rx", "MessageBytesReceived", "Bytes in received messages.");
//! logger.register_metric(received.clone()).unwrap();
//! logger.register_metric(bytes.clone()).unwrap();
//! logger
//!     .define_amount_over_count(&bytes, &received, "BytesReceivedPerMessage", "Bytes per message.")
//!     .unwrap();
//!
//! logger.create_performance_counters().unwrap();
//! logger.start().unwrap();
//!
//! let recorder = logger.get_recorder();
//! let controller = logger.get_controller();
//! let publisher = thread::spawn(move || logger.run());
//!
//! recorder.increment(&received).unwrap();
//! recorder.add(&bytes, 512).unwrap();
//!
//! controller.stop().unwrap();
//! publisher.join().unwrap();
//! ```
mod accumulator;
mod aggregate;
mod catalog;
mod clock;
mod configuration;
mod control;
mod evaluator;
mod logger;
mod metric;
mod projector;
mod recorder;
pub mod sink;

pub use self::{
    accumulator::TotalsSnapshot,
    aggregate::AggregateDefinition,
    catalog::DefinitionError,
    clock::{Clock, ClockSource, Mock, Monotonic},
    configuration::{Configuration, ConfigurationError},
    control::{ControlError, Controller},
    logger::PerformanceCounterLogger,
    metric::{Metric, MetricKind, TimeUnit},
    projector::{CreateCountersError, StartError, MAX_COUNTER_NAME_LENGTH},
    recorder::{RecordError, Recorder},
    sink::{CounterCreationData, CounterHandle, CounterType, MockSink, PerfCounterSink, SinkError},
};
