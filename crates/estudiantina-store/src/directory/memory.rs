//! In-memory directory backend.
//!
//! Keeps records in a `BTreeMap`. Useful for tests and for exercising
//! the directory facade without a database file.

use std::collections::BTreeMap;

use estudiantina_core::Identity;

use super::{DirectoryBackend, DirectoryError, StoredProfile};

/// Directory backend holding all records in process memory.
#[derive(Debug, Default)]
pub struct MemoryDirectoryBackend {
    records: BTreeMap<String, StoredProfile>,
}

impl MemoryDirectoryBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectoryBackend for MemoryDirectoryBackend {
    fn get(&self, id: &str) -> Result<Option<StoredProfile>, DirectoryError> {
        Ok(self.records.get(id).cloned())
    }

    fn insert(&mut self, id: &str, profile: &StoredProfile) -> Result<bool, DirectoryError> {
        if self.records.contains_key(id) {
            return Ok(false);
        }
        self.records.insert(id.to_string(), profile.clone());
        Ok(true)
    }

    fn remove(&mut self, id: &str) -> Result<bool, DirectoryError> {
        Ok(self.records.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<Identity>, DirectoryError> {
        Ok(self
            .records
            .iter()
            .map(|(id, profile)| profile.clone().into_identity(id))
            .collect())
    }

    fn count(&self) -> Result<u64, DirectoryError> {
        Ok(self.records.len() as u64)
    }
}
