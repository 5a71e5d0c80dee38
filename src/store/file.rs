use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{insert_newest_first, CallStore, StoreError};
use crate::models::CallRecord;

pub const DEFAULT_HISTORY_FILE: &str = "callcheck_history.json";

/// History kept as a single JSON array on disk
///
/// Every operation reads the whole file; a missing file is an empty history.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<CallRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a temp file beside the history, then rename it into place
    fn save(&self, records: &[CallRecord]) -> Result<(), StoreError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, records)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

impl CallStore for JsonFileStore {
    fn get(&self, id: &str) -> Result<Option<CallRecord>, StoreError> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn put(&mut self, record: CallRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        insert_newest_first(&mut records, record);
        self.save(&records)
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<CallRecord>, StoreError> {
        self.load()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
