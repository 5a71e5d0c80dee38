pub mod file;
pub mod memory;

pub use file::*;
pub use memory::*;

use thiserror::Error;

use crate::models::CallRecord;

/// Most records kept; older ones are dropped on insert
pub const MAX_RECORDS: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistent history of reviewed calls, newest first
pub trait CallStore {
    fn get(&self, id: &str) -> Result<Option<CallRecord>, StoreError>;

    /// Insert at the front, replacing any record with the same id
    fn put(&mut self, record: CallRecord) -> Result<(), StoreError>;

    /// Returns whether a record was removed
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;

    fn list(&self) -> Result<Vec<CallRecord>, StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Shared insert rule for list-backed stores
pub(crate) fn insert_newest_first(records: &mut Vec<CallRecord>, record: CallRecord) {
    records.retain(|r| r.id != record.id);
    records.insert(0, record);
    records.truncate(MAX_RECORDS);
}
