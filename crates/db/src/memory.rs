//! In-process [`EntryStore`] with the same query semantics as PostgreSQL.
//!
//! Used by tests and by development runs that have no database.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use crosswordcoach_core::types::{
    CrosswordPuzzle, EntryFilterOptions, GetEntriesOptions, OrderDirection,
};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{EntryRecord, EntryStore, OrderField};

#[derive(Debug, Clone)]
struct PuzzleMeta {
    source: String,
    day_of_week: u8,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    record: EntryRecord,
    puzzle_ids: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    entries: Vec<StoredEntry>,
    puzzles: HashMap<String, PuzzleMeta>,
}

impl State {
    fn find_mut(&mut self, clue: &str, answer: &str) -> Option<&mut StoredEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.record.clue == clue && e.record.answer == answer)
    }

    fn matches(&self, entry: &StoredEntry, filter: &EntryFilterOptions) -> bool {
        if filter.source.is_some() || filter.day_of_week.is_some() {
            let appeared = entry.puzzle_ids.iter().any(|id| {
                self.puzzles.get(id).is_some_and(|meta| {
                    filter.source.as_deref().map_or(true, |s| s == meta.source)
                        && filter.day_of_week.map_or(true, |d| d == meta.day_of_week)
                })
            });
            if !appeared {
                return false;
            }
        }

        filter
            .answer_length
            .map_or(true, |range| range.contains(entry.record.answer.chars().count()))
    }
}

#[derive(Default)]
pub struct MemoryEntryStore {
    state: RwLock<State>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct entries held.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn compare(a: &EntryRecord, b: &EntryRecord, field: OrderField) -> Ordering {
    let primary = match field {
        OrderField::Id => Ordering::Equal,
        OrderField::Clue => a.clue.cmp(&b.clue),
        OrderField::Answer => a.answer.cmp(&b.answer),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn get_entries(
        &self,
        options: &GetEntriesOptions,
    ) -> Result<Vec<EntryRecord>, StoreError> {
        let field = OrderField::parse(&options.order_by)?;
        let offset = usize::try_from(options.offset()).map_err(|_| StoreError::PageOutOfRange)?;

        let state = self.state.read().await;
        let mut matching: Vec<&EntryRecord> = state
            .entries
            .iter()
            .filter(|e| state.matches(e, &options.filter))
            .map(|e| &e.record)
            .collect();

        matching.sort_by(|a, b| match options.order_direction {
            OrderDirection::Asc => compare(a, b, field),
            OrderDirection::Desc => compare(b, a, field),
        });

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(options.page_size as usize)
            .cloned()
            .collect())
    }

    async fn save_puzzle(&self, puzzle: &CrosswordPuzzle) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        state.puzzles.insert(
            puzzle.id.clone(),
            PuzzleMeta {
                source: puzzle.source.clone(),
                day_of_week: puzzle.day_of_week(),
            },
        );

        for entry in &puzzle.entries {
            if let Some(stored) = state.find_mut(&entry.clue, &entry.answer) {
                stored.puzzle_ids.insert(puzzle.id.clone());
                if stored.record.explanation.is_none() {
                    stored.record.explanation = entry.explanation.clone();
                }
                continue;
            }

            state.next_id += 1;
            let id = state.next_id;
            state.entries.push(StoredEntry {
                record: EntryRecord {
                    id,
                    clue: entry.clue.clone(),
                    answer: entry.answer.clone(),
                    explanation: entry.explanation.clone(),
                },
                puzzle_ids: BTreeSet::from([puzzle.id.clone()]),
            });
        }

        tracing::debug!(puzzle_id = %puzzle.id, entries = puzzle.entries.len(), "Saved puzzle in memory");
        Ok(())
    }

    async fn find_explanation(
        &self,
        clue: &str,
        answer: &str,
    ) -> Result<Option<String>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .iter()
            .find(|e| e.record.clue == clue && e.record.answer == answer)
            .and_then(|e| e.record.explanation.clone()))
    }

    async fn set_explanation(
        &self,
        clue: &str,
        answer: &str,
        explanation: &str,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(match state.find_mut(clue, answer) {
            Some(stored) => {
                stored.record.explanation = Some(explanation.to_string());
                true
            }
            None => false,
        })
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
