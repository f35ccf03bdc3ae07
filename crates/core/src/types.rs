//! Shared data model for entries, puzzles, and entry queries.
//!
//! Field names serialize in camelCase so the JSON shape matches what the
//! game client and the puzzle files already use.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// A clue/answer pair, optionally carrying a cached explanation.
///
/// `(clue, answer)` is the natural key; two entries with the same pair are the
/// same entry regardless of how many puzzles it appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub clue: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Entry {
    pub fn new(clue: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            clue: clue.into(),
            answer: answer.into(),
            explanation: None,
        }
    }
}

/// A scraped puzzle as written by the ingestion scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrosswordPuzzle {
    pub id: String,
    pub date: Timestamp,
    /// Publication, e.g. `"NYT"` or `"WSJ"`.
    pub source: String,
    pub entries: Vec<Entry>,
}

impl CrosswordPuzzle {
    /// Day of week of the puzzle date in UTC, 0 = Sunday through 6 = Saturday.
    pub fn day_of_week(&self) -> u8 {
        // num_days_from_sunday is always in 0..=6
        self.date.weekday().num_days_from_sunday() as u8
    }
}

/// Inclusive answer length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerLengthRange {
    pub min: u32,
    pub max: u32,
}

impl AnswerLengthRange {
    pub fn contains(&self, len: usize) -> bool {
        (self.min as usize..=self.max as usize).contains(&len)
    }
}

/// The filter configuration narrowing which entries are eligible.
///
/// `day_of_week` is only meaningful together with `source`; the pairing is
/// checked when query parameters are parsed, not by this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_length: Option<AnswerLengthRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// A fully validated entries query: filters plus ordering and pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEntriesOptions {
    #[serde(flatten)]
    pub filter: EntryFilterOptions,
    pub order_by: String,
    pub order_direction: OrderDirection,
    /// Number of entries per page, at least 1.
    pub page_size: u32,
    /// 0-based page number.
    pub page: u32,
}

impl GetEntriesOptions {
    /// Number of entries preceding the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }
}

/// `{ "entries": [...] }` envelope returned by the entries endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
}

/// Body of an explanation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExplanationRequest {
    #[validate(length(min = 1, message = "clue must not be empty"))]
    pub clue: String,
    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}
