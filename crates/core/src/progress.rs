//! Storage keys and records for per-filter progress.
//!
//! Filter options are built in several places with different field orders,
//! so keys are derived from a canonical JSON rendering with object keys
//! sorted and absent fields dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::Pointer;
use crate::types::EntryFilterOptions;

/// Namespace prefix for every progress key.
pub const PROGRESS_KEY_PREFIX: &str = "entryProgress:";

/// The persisted pointer for one filter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub entry_index: u32,
    pub page: u32,
}

impl From<Pointer> for ProgressRecord {
    fn from(pointer: Pointer) -> Self {
        Self {
            entry_index: pointer.index,
            page: pointer.page,
        }
    }
}

impl From<ProgressRecord> for Pointer {
    fn from(record: ProgressRecord) -> Self {
        Pointer::new(record.page, record.entry_index)
    }
}

/// Serialize `value` with object keys in sorted order and arrays in place.
pub fn stable_stringify(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(stable_stringify).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let inner: Vec<String> = keys
                .into_iter()
                .map(|key| format!("{}:{}", Value::String(key.clone()), stable_stringify(&map[key])))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        scalar => scalar.to_string(),
    }
}

/// Remove `null` members from every object in `value`.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Storage key for the progress of `filter`.
///
/// Equal filter configurations always produce the same key.
pub fn filter_options_key(filter: &EntryFilterOptions) -> String {
    // Serializing a plain data struct into a Value cannot fail.
    let value = serde_json::to_value(filter).unwrap_or(Value::Null);
    format!("{PROGRESS_KEY_PREFIX}{}", stable_stringify(&strip_nulls(value)))
}
