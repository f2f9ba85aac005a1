//! JSON status file: the whole snapshot is rewritten on every update.
//!
//! Storage is a flat JSON object of strings, pretty-printed:
//!
//! ```json
//! {
//!   "current_entry": "L00012",
//!   "error": "no consistent JSON response for 'L00012_chunk000' after 2 attempts"
//! }
//! ```

use footmatch_core::error::StatusError;
use footmatch_core::status::StatusReporter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub struct JsonStatusFile {
    path: PathBuf,
    snapshot: Mutex<BTreeMap<String, String>>,
}

impl JsonStatusFile {
    /// Start a fresh, empty snapshot at `path`, overwriting any previous file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StatusError> {
        let status = Self {
            path: path.into(),
            snapshot: Mutex::new(BTreeMap::new()),
        };
        status.flush(&BTreeMap::new())?;
        debug!(path = %status.path.display(), "Status file created");
        Ok(status)
    }

    /// Read an existing snapshot from disk.
    pub fn load(path: &Path) -> Result<BTreeMap<String, String>, StatusError> {
        let content = std::fs::read_to_string(path).map_err(|e| StatusError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StatusError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn flush(&self, snapshot: &BTreeMap<String, String>) -> Result<(), StatusError> {
        let write_err = |reason: String| StatusError::Write {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }
}

impl StatusReporter for JsonStatusFile {
    fn update(&self, key: &str, value: &str) -> Result<(), StatusError> {
        // Held across the write so concurrent updates land in order.
        let mut snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        snapshot.insert(key.to_string(), value.to_string());
        self.flush(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_writes_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        std::fs::write(&path, r#"{"stale": "value"}"#).unwrap();

        JsonStatusFile::create(&path).unwrap();
        assert!(JsonStatusFile::load(&path).unwrap().is_empty());
    }

    #[test]
    fn every_update_persists_full_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("status.json");
        let status = JsonStatusFile::create(&path).unwrap();

        status.update("current_entry", "L00001").unwrap();
        status.update("error", "boom").unwrap();
        status.update("current_entry", "L00002").unwrap();

        let on_disk = JsonStatusFile::load(&path).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk["current_entry"], "L00002");
        assert_eq!(on_disk["error"], "boom");
        assert_eq!(on_disk, status.snapshot());
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            JsonStatusFile::load(&dir.path().join("none.json")),
            Err(StatusError::Read { .. })
        ));
    }
}
