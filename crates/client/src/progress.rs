//! Per-filter resume positions in durable storage.

use crosswordcoach_core::pagination::Pointer;
use crosswordcoach_core::progress::{filter_options_key, ProgressRecord};
use crosswordcoach_core::types::EntryFilterOptions;

use crate::storage::KeyValueStorage;

/// Reads and writes the last pointer for each filter configuration.
///
/// Storage failures never reach the caller: an unreadable record is reported
/// as absent and a failed write is logged.
pub struct ProgressTracker<S> {
    storage: S,
}

impl<S: KeyValueStorage> ProgressTracker<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored progress for `filter`, or `None` if it was never played.
    pub fn get(&self, filter: &EntryFilterOptions) -> Option<ProgressRecord> {
        let key = filter_options_key(filter);
        let raw = match self.storage.get(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read progress");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring malformed progress record");
                None
            }
        }
    }

    /// Overwrite the stored progress for `filter`.
    pub fn set(&self, filter: &EntryFilterOptions, pointer: Pointer) {
        let key = filter_options_key(filter);
        let record = ProgressRecord::from(pointer);
        let result = serde_json::to_string(&record)
            .map_err(Into::into)
            .and_then(|value| self.storage.set(&key, &value));
        if let Err(e) = result {
            tracing::warn!(key = %key, error = %e, "Failed to save progress");
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
