//! The entry store seam shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use crosswordcoach_core::types::{CrosswordPuzzle, Entry, GetEntriesOptions};
use serde::Serialize;
use sqlx::FromRow;

use crate::error::StoreError;

/// A stored entry with its insertion-order id.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct EntryRecord {
    pub id: i64,
    pub clue: String,
    pub answer: String,
    pub explanation: Option<String>,
}

impl EntryRecord {
    pub fn into_entry(self) -> Entry {
        Entry {
            clue: self.clue,
            answer: self.answer,
            explanation: self.explanation,
        }
    }
}

/// Fields entries can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    /// Insertion order.
    Id,
    Clue,
    Answer,
}

impl OrderField {
    pub fn parse(name: &str) -> Result<Self, StoreError> {
        match name {
            "_id" | "id" => Ok(OrderField::Id),
            "clue" => Ok(OrderField::Clue),
            "answer" => Ok(OrderField::Answer),
            other => Err(StoreError::UnsupportedOrderField(other.to_string())),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            OrderField::Id => "e.id",
            OrderField::Clue => "e.clue",
            OrderField::Answer => "e.answer",
        }
    }
}

/// Read/write access to clue/answer entries.
///
/// Entries are tagged with every (source, day-of-week) combination of the
/// puzzles they appeared in; filters match against those tags.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Fetch one page of entries matching the filters, in the requested order.
    async fn get_entries(&self, options: &GetEntriesOptions)
        -> Result<Vec<EntryRecord>, StoreError>;

    /// Upsert a puzzle and record an appearance for each of its entries.
    ///
    /// Saving the same puzzle twice leaves the store unchanged.
    async fn save_puzzle(&self, puzzle: &CrosswordPuzzle) -> Result<(), StoreError>;

    /// Cached explanation for an entry, if the entry exists and has one.
    async fn find_explanation(&self, clue: &str, answer: &str)
        -> Result<Option<String>, StoreError>;

    /// Store an explanation. Returns `false` when no such entry exists.
    async fn set_explanation(
        &self,
        clue: &str,
        answer: &str,
        explanation: &str,
    ) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
