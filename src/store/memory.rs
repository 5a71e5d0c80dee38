use super::{insert_newest_first, CallStore, StoreError};
use crate::models::CallRecord;

/// Volatile store, used in tests and for one-off runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<CallRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CallStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<CallRecord>, StoreError> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn put(&mut self, record: CallRecord) -> Result<(), StoreError> {
        insert_newest_first(&mut self.records, record);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        Ok(self.records.len() != before)
    }

    fn list(&self) -> Result<Vec<CallRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}
