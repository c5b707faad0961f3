//! Account Store
//!
//! Registry mapping a user id to that user's credential record. The sole
//! mutable source of truth for tokens; all mutation goes through its atomic
//! operations. No network or time-based logic lives here.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::CredentialRecord;

/// In-memory credential registry, shared across all concurrent API calls.
#[derive(Default)]
pub struct AccountStore {
    records: Mutex<HashMap<String, CredentialRecord>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its user.
    pub fn put(&self, record: CredentialRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.user_id.clone(), record);
    }

    /// Snapshot of the record for a user, if registered.
    pub fn get(&self, user_id: &str) -> Option<CredentialRecord> {
        self.records.lock().unwrap().get(user_id).cloned()
    }

    /// Atomic read-modify-write. The mutator runs under the store lock, so
    /// concurrent token updates for the same user serialize instead of
    /// overwriting each other. Returns the updated record, or `None` for an
    /// unknown user.
    pub fn update_tokens<F>(&self, user_id: &str, mutate: F) -> Option<CredentialRecord>
    where
        F: FnOnce(&mut CredentialRecord),
    {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(user_id)?;
        mutate(record);
        Some(record.clone())
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.records.lock().unwrap().contains_key(user_id)
    }

    pub fn user_ids(&self) -> Vec<String> {
        self.records.lock().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}
