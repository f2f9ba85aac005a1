//! In-memory status reporter that also keeps the ordered update history.
//! Useful for testing and for embedding the matcher without a status file.

use footmatch_core::error::StatusError;
use footmatch_core::status::StatusReporter;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct InMemoryStatus {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    snapshot: BTreeMap<String, String>,
    history: Vec<(String, String)>,
}

impl InMemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner().snapshot.get(key).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner().snapshot.clone()
    }

    /// Every `(key, value)` update in the order it was made.
    pub fn history(&self) -> Vec<(String, String)> {
        self.inner().history.clone()
    }

    /// Values written to `key`, oldest first.
    pub fn values_of(&self, key: &str) -> Vec<String> {
        self.inner()
            .history
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl StatusReporter for InMemoryStatus {
    fn update(&self, key: &str, value: &str) -> Result<(), StatusError> {
        let mut inner = self.inner();
        inner.snapshot.insert(key.to_string(), value.to_string());
        inner.history.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
