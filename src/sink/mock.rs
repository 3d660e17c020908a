use crate::sink::{CounterCreationData, CounterHandle, PerfCounterSink, SinkError};
use fnv::FnvBuildHasher;
use hashbrown::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    existing: Vec<String>,
    deleted: Vec<String>,
    created: Option<(String, String, Vec<CounterCreationData>)>,
    bound: Vec<String>,
    writes: HashMap<String, Vec<i64>, FnvBuildHasher>,
    exists_error: Option<String>,
    create_error: Option<String>,
}

/// In-memory sink capability implementation, for tests.
///
/// Records category operations and every raw value written, keyed by counter name; failures
/// can be injected for the category management calls.
#[derive(Clone, Default)]
pub struct MockSink {
    state: Arc<Mutex<MockState>>,
}

impl MockSink {
    pub fn new() -> MockSink { Default::default() }

    /// Reports the given category as already existing.
    pub fn set_existing(&self, category: &str) {
        self.state.lock().unwrap().existing.push(category.to_string());
    }

    /// Makes the next `category_exists` call fail with the given message.
    pub fn fail_exists(&self, message: &str) {
        self.state.lock().unwrap().exists_error = Some(message.to_string());
    }

    /// Makes the next `create_category` call fail with the given message.
    pub fn fail_create(&self, message: &str) {
        self.state.lock().unwrap().create_error = Some(message.to_string());
    }

    /// The category created, if any, as (name, description, counter list).
    pub fn created(&self) -> Option<(String, String, Vec<CounterCreationData>)> {
        self.state.lock().unwrap().created.clone()
    }

    /// Names of categories that were deleted, in order.
    pub fn deleted(&self) -> Vec<String> { self.state.lock().unwrap().deleted.clone() }

    /// Names of counters bound via `create_counter`, in order.
    pub fn bound(&self) -> Vec<String> { self.state.lock().unwrap().bound.clone() }

    /// Every raw value written to the named counter, in order.
    pub fn writes(&self, counter: &str) -> Vec<i64> {
        self.state
            .lock()
            .unwrap()
            .writes
            .get(counter)
            .cloned()
            .unwrap_or_default()
    }
}

/// A handle into a `MockSink` counter.
pub struct MockCounter {
    name: String,
    state: Arc<Mutex<MockState>>,
}

impl CounterHandle for MockCounter {
    fn set_raw_value(&mut self, value: i64) {
        self.state
            .lock()
            .unwrap()
            .writes
            .entry(self.name.clone())
            .or_insert_with(Vec::new)
            .push(value);
    }
}

impl PerfCounterSink for MockSink {
    type Handle = MockCounter;

    fn category_exists(&mut self, category: &str) -> Result<bool, SinkError> {
        let state = self.state.lock().unwrap();
        if let Some(message) = &state.exists_error {
            return Err(message.clone().into());
        }
        Ok(state.existing.iter().any(|c| c == category))
    }

    fn delete_category(&mut self, category: &str) -> Result<(), SinkError> {
        self.state.lock().unwrap().deleted.push(category.to_string());
        Ok(())
    }

    fn create_category(
        &mut self,
        category: &str,
        description: &str,
        counters: &[CounterCreationData],
    ) -> Result<(), SinkError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.create_error {
            return Err(message.clone().into());
        }
        state.created = Some((category.to_string(), description.to_string(), counters.to_vec()));
        Ok(())
    }

    fn create_counter(&mut self, _category: &str, counter: &str, _read_only: bool) -> Result<MockCounter, SinkError> {
        self.state.lock().unwrap().bound.push(counter.to_string());
        Ok(MockCounter {
            name: counter.to_string(),
            state: self.state.clone(),
        })
    }
}
