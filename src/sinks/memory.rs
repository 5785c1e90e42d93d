//! In-memory sink that keeps every line it receives

use crate::core::{Result, Sink};
use parking_lot::Mutex;

/// One line as received by a [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub call_depth: usize,
    pub line: String,
}

#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.line.clone()).collect()
    }

    /// Every line concatenated in arrival order.
    pub fn contents(&self) -> String {
        self.records.lock().iter().map(|r| r.line.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Sink for MemorySink {
    fn output(&self, call_depth: usize, line: &str) -> Result<()> {
        self.records.lock().push(Record {
            call_depth,
            line: line.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
