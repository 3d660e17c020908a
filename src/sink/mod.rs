use std::error::Error;

mod mock;
pub use self::mock::{MockCounter, MockSink};

/// Boxed error type surfaced by sink capability implementations.
pub type SinkError = Box<dyn Error + Send + Sync>;

/// The physical counter types a sink can host.
///
/// These mirror the Windows performance counter type table: plain 64-bit item counts, a
/// per-second rate derived by the sink, an average whose denominator lives in an accompanying
/// base counter, and a raw fraction whose denominator lives in an accompanying base counter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CounterType {
    NumberOfItems64,
    RateOfCountsPerSecond64,
    AverageCount64,
    AverageBase,
    RawFraction,
    RawBase,
}

/// One entry in the ordered counter-creation list for a category.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CounterCreationData {
    pub name: String,
    pub description: String,
    pub counter_type: CounterType,
}

impl CounterCreationData {
    pub fn new(name: &str, description: &str, counter_type: CounterType) -> CounterCreationData {
        CounterCreationData {
            name: name.to_string(),
            description: description.to_string(),
            counter_type,
        }
    }
}

/// A live, settable counter inside the sink.
pub trait CounterHandle {
    /// Sets the counter's raw 64-bit value.
    fn set_raw_value(&mut self, value: i64);
}

/// Capability bundle for the counter sink.
///
/// Covers category management and counter handle creation; implementations own all OS-level
/// detail. The logger calls `category_exists`/`delete_category`/`create_category` exactly once
/// during counter creation, and `create_counter` once per counter when it starts.
pub trait PerfCounterSink {
    type Handle: CounterHandle;

    /// Whether a category with the given name already exists.
    fn category_exists(&mut self, category: &str) -> Result<bool, SinkError>;

    /// Deletes an existing category and all of its counters.
    fn delete_category(&mut self, category: &str) -> Result<(), SinkError>;

    /// Creates a category hosting the given ordered counter set.
    fn create_category(
        &mut self,
        category: &str,
        description: &str,
        counters: &[CounterCreationData],
    ) -> Result<(), SinkError>;

    /// Binds a live handle to a counter in an existing category.
    fn create_counter(&mut self, category: &str, counter: &str, read_only: bool) -> Result<Self::Handle, SinkError>;
}
