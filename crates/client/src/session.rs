//! Entry presentation state: page cache, pointer, and loading status.
//!
//! [`EntrySession`] performs no I/O. Every transition that needs a page
//! returns a [`PageRequest`]; the caller fetches it and hands the result back
//! through [`EntrySession::apply_page`]. Each request carries a
//! [`FetchToken`] naming the filter configuration it was issued under, and
//! results for any other configuration are dropped.

use std::collections::{BTreeMap, BTreeSet};

use crosswordcoach_core::pagination::{advance, should_prefetch, Pointer};
use crosswordcoach_core::types::{Entry, EntryFilterOptions, GetEntriesOptions, OrderDirection};

use crate::progress::ProgressTracker;
use crate::storage::KeyValueStorage;

/// Field entries are ordered by when paging through them.
pub const ORDER_BY: &str = "_id";

/// Identifies one page fetch and the configuration it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    pub generation: u64,
    pub page: u32,
}

/// A page the caller should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub token: FetchToken,
    pub options: GetEntriesOptions,
}

/// What the player should currently see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryView<'a> {
    Loading,
    Entry(&'a Entry),
    /// The page for the pointer has loaded and holds no entry at its index.
    NoEntriesLeft,
}

pub struct EntrySession<S> {
    progress: ProgressTracker<S>,
    page_size: u32,
    buffer: usize,
    filter: EntryFilterOptions,
    /// Bumped on every configuration change.
    generation: u64,
    cache: BTreeMap<u32, Vec<Entry>>,
    /// Pages requested under the current generation and not yet applied.
    pending: BTreeSet<u32>,
    pointer: Option<Pointer>,
}

impl<S: KeyValueStorage> EntrySession<S> {
    /// A session with no configuration selected yet.
    ///
    /// `page_size` is clamped to at least 1. `buffer` is how close to the end
    /// of the current page the pointer gets before the next page is fetched.
    pub fn new(progress: ProgressTracker<S>, page_size: u32, buffer: usize) -> Self {
        Self {
            progress,
            page_size: page_size.max(1),
            buffer,
            filter: EntryFilterOptions::default(),
            generation: 0,
            cache: BTreeMap::new(),
            pending: BTreeSet::new(),
            pointer: None,
        }
    }

    pub fn filter(&self) -> &EntryFilterOptions {
        &self.filter
    }

    pub fn pointer(&self) -> Option<Pointer> {
        self.pointer
    }

    pub fn cached_pages(&self) -> Vec<u32> {
        self.cache.keys().copied().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    // -- Transitions --

    /// Switch to `filter`, resuming from its stored progress.
    ///
    /// Clears the cache, moves the pointer to the resume target once, and
    /// returns the fetch for the target page. Results of fetches issued before
    /// this call are discarded when they arrive.
    pub fn set_filter(&mut self, filter: EntryFilterOptions) -> PageRequest {
        self.generation += 1;
        self.cache.clear();
        self.pending.clear();

        let target = self
            .progress
            .get(&filter)
            .map(Pointer::from)
            .unwrap_or(Pointer::START);
        self.filter = filter;
        self.pointer = Some(target);

        tracing::debug!(
            generation = self.generation,
            page = target.page,
            index = target.index,
            "Filter changed"
        );

        self.request(target.page)
    }

    /// Store a fetched page if `token` still belongs to the active
    /// configuration. May return a prefetch for the following page.
    pub fn apply_page(&mut self, token: FetchToken, entries: Vec<Entry>) -> Option<PageRequest> {
        if token.generation != self.generation {
            tracing::debug!(
                token_generation = token.generation,
                generation = self.generation,
                page = token.page,
                "Discarding page fetched for a previous filter"
            );
            return None;
        }

        self.pending.remove(&token.page);
        self.cache.insert(token.page, entries);

        match self.pointer {
            Some(pointer) if pointer.page == token.page => self.prefetch_if_needed(),
            _ => None,
        }
    }

    /// Persist the current pointer, then advance it by one entry.
    ///
    /// Returns a fetch for the new page when it is neither cached nor already
    /// requested, or a prefetch for the page after it.
    pub fn go_to_next_entry(&mut self) -> Option<PageRequest> {
        if let Some(current) = self.pointer {
            self.progress.set(&self.filter, current);
        }

        let next = advance(self.pointer, self.page_size);
        self.pointer = Some(next);
        self.ensure_current_page()
    }

    /// Jump back to the first entry and record that as the progress.
    pub fn go_to_beginning(&mut self) -> Option<PageRequest> {
        self.pointer = Some(Pointer::START);
        self.progress.set(&self.filter, Pointer::START);
        self.ensure_current_page()
    }

    /// Attach an explanation to every cached copy of `(clue, answer)`.
    pub fn set_explanation(&mut self, clue: &str, answer: &str, explanation: &str) {
        for entry in self.cache.values_mut().flatten() {
            if entry.clue == clue && entry.answer == answer {
                entry.explanation = Some(explanation.to_string());
            }
        }
    }

    // -- Derived state --

    /// `cache[page][index]`, if loaded.
    pub fn current_entry(&self) -> Option<&Entry> {
        let pointer = self.pointer?;
        self.cache
            .get(&pointer.page)?
            .get(pointer.index as usize)
    }

    /// Whether the page under the pointer is still being fetched.
    pub fn is_loading(&self) -> bool {
        match self.pointer {
            Some(pointer) => !self.cache.contains_key(&pointer.page),
            None => true,
        }
    }

    pub fn view(&self) -> EntryView<'_> {
        if self.is_loading() {
            return EntryView::Loading;
        }
        match self.current_entry() {
            Some(entry) => EntryView::Entry(entry),
            None => EntryView::NoEntriesLeft,
        }
    }

    // -- Internals --

    fn ensure_current_page(&mut self) -> Option<PageRequest> {
        let page = self.pointer?.page;
        if self.cache.contains_key(&page) {
            return self.prefetch_if_needed();
        }
        if self.pending.contains(&page) {
            return None;
        }
        Some(self.request(page))
    }

    fn prefetch_if_needed(&mut self) -> Option<PageRequest> {
        let pointer = self.pointer?;
        let next_page = pointer.page.checked_add(1)?;
        let current_len = self.cache.get(&pointer.page).map(Vec::len);
        let next_known = self.cache.contains_key(&next_page) || self.pending.contains(&next_page);

        if !should_prefetch(pointer, current_len, self.buffer, next_known) {
            return None;
        }
        tracing::debug!(page = next_page, "Prefetching next page");
        Some(self.request(next_page))
    }

    /// Mark `page` pending and build its request.
    fn request(&mut self, page: u32) -> PageRequest {
        self.pending.insert(page);
        PageRequest {
            token: FetchToken {
                generation: self.generation,
                page,
            },
            options: GetEntriesOptions {
                filter: self.filter.clone(),
                order_by: ORDER_BY.to_string(),
                order_direction: OrderDirection::Asc,
                page_size: self.page_size,
                page,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use assert_matches::assert_matches;
    use crosswordcoach_core::progress::ProgressRecord;

    fn session(page_size: u32, buffer: usize) -> EntrySession<MemoryStorage> {
        EntrySession::new(ProgressTracker::new(MemoryStorage::new()), page_size, buffer)
    }

    fn entries(prefix: &str, n: usize) -> Vec<Entry> {
        (0..n)
            .map(|i| Entry::new(format!("{prefix} clue {i}"), format!("{prefix}{i}")))
            .collect()
    }

    fn source(name: &str) -> EntryFilterOptions {
        EntryFilterOptions {
            source: Some(name.into()),
            ..Default::default()
        }
    }

    // -- Filter changes --

    #[test]
    fn first_filter_targets_page_zero_and_loads() {
        let mut s = session(10, 3);
        assert_eq!(s.view(), EntryView::Loading);

        let req = s.set_filter(EntryFilterOptions::default());

        assert_eq!(req.token.page, 0);
        assert_eq!(req.options.page_size, 10);
        assert_eq!(req.options.order_by, "_id");
        assert_eq!(s.pointer(), Some(Pointer::START));
        assert!(s.is_loading());
        assert_eq!(s.view(), EntryView::Loading);
    }

    #[test]
    fn stored_progress_is_the_resume_target() {
        let mut s = session(10, 3);
        s.progress.set(&source("NYT"), Pointer::new(4, 7));

        let req = s.set_filter(source("NYT"));

        assert_eq!(req.token.page, 4);
        assert_eq!(s.pointer(), Some(Pointer::new(4, 7)));
    }

    #[test]
    fn applying_target_page_ends_loading() {
        let mut s = session(10, 3);
        let req = s.set_filter(source("NYT"));

        s.apply_page(req.token, entries("a", 10));

        assert!(!s.is_loading());
        assert_matches!(s.view(), EntryView::Entry(e) if e.answer == "a0");
    }

    #[test]
    fn changing_filter_clears_the_cache() {
        let mut s = session(10, 3);
        let a = s.set_filter(source("NYT"));
        s.apply_page(a.token, entries("a", 10));

        s.set_filter(source("WSJ"));

        assert!(s.cached_pages().is_empty());
        assert_eq!(s.current_entry(), None);
        assert_eq!(s.view(), EntryView::Loading);
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut s = session(10, 3);
        let a = s.set_filter(source("NYT"));
        let b = s.set_filter(source("WSJ"));

        assert_eq!(s.apply_page(a.token, entries("a", 10)), None);
        assert!(s.cached_pages().is_empty());
        assert!(s.is_loading());

        s.apply_page(b.token, entries("b", 10));
        assert_matches!(s.view(), EntryView::Entry(e) if e.answer == "b0");
    }

    // -- Terminal state --

    #[test]
    fn empty_page_reaches_no_entries_left_and_stays_there() {
        let mut s = session(10, 3);
        let req = s.set_filter(source("NYT"));
        let follow_up = s.apply_page(req.token, Vec::new());

        assert_eq!(s.view(), EntryView::NoEntriesLeft);
        assert!(!s.is_loading());
        // Index 0 is within `buffer` of an empty page, so the next page is
        // prefetched; that must not flip the view back to loading.
        assert!(follow_up.is_some());
        assert_eq!(s.view(), EntryView::NoEntriesLeft);
    }

    #[test]
    fn index_past_a_short_page_has_no_entry() {
        let mut s = session(10, 0);
        s.progress.set(&source("NYT"), Pointer::new(0, 5));
        let req = s.set_filter(source("NYT"));

        s.apply_page(req.token, entries("a", 3));

        assert_eq!(s.view(), EntryView::NoEntriesLeft);
    }

    // -- Advancing --

    #[test]
    fn next_entry_persists_the_old_pointer_first() {
        let mut s = session(10, 3);
        let req = s.set_filter(source("NYT"));
        s.apply_page(req.token, entries("a", 10));

        s.go_to_next_entry();
        s.go_to_next_entry();

        assert_eq!(s.pointer(), Some(Pointer::new(0, 2)));
        assert_eq!(
            s.progress.get(&source("NYT")),
            Some(ProgressRecord {
                entry_index: 1,
                page: 0
            })
        );
    }

    #[test]
    fn prefetch_triggers_inside_the_buffer_once() {
        let mut s = session(10, 3);
        let req = s.set_filter(source("NYT"));
        assert_eq!(s.apply_page(req.token, entries("a", 10)), None);

        for _ in 0..6 {
            assert_eq!(s.go_to_next_entry(), None);
        }
        // Index 7 is within 3 of the end of a 10-entry page.
        let prefetch = s.go_to_next_entry().unwrap();
        assert_eq!(prefetch.token.page, 1);
        assert_eq!(prefetch.options.page, 1);
        // Already pending: no duplicate request.
        assert_eq!(s.go_to_next_entry(), None);
        assert!(!s.is_loading());
    }

    #[test]
    fn rolling_over_onto_a_pending_page_waits_for_it() {
        let mut s = session(2, 1);
        let req = s.set_filter(source("NYT"));
        s.apply_page(req.token, entries("a", 2));

        let prefetch = s.go_to_next_entry().unwrap();
        assert_eq!(prefetch.token.page, 1);

        assert_eq!(s.go_to_next_entry(), None);
        assert_eq!(s.pointer(), Some(Pointer::new(1, 0)));
        assert_eq!(s.view(), EntryView::Loading);

        s.apply_page(prefetch.token, entries("b", 2));
        assert_matches!(s.view(), EntryView::Entry(e) if e.answer == "b0");
    }

    #[test]
    fn rolling_over_onto_an_unrequested_page_fetches_it() {
        let mut s = session(2, 0);
        let req = s.set_filter(source("NYT"));
        s.apply_page(req.token, entries("a", 2));

        assert_eq!(s.go_to_next_entry(), None);
        let fetch = s.go_to_next_entry().unwrap();

        assert_eq!(fetch.token.page, 1);
        assert_eq!(s.view(), EntryView::Loading);
    }

    #[test]
    fn go_to_beginning_resets_and_persists() {
        let mut s = session(2, 0);
        let req = s.set_filter(source("NYT"));
        s.apply_page(req.token, entries("a", 2));
        s.go_to_next_entry();
        s.go_to_next_entry();

        assert_eq!(s.go_to_beginning(), None);

        assert_eq!(s.pointer(), Some(Pointer::START));
        assert_eq!(
            s.progress.get(&source("NYT")),
            Some(ProgressRecord {
                entry_index: 0,
                page: 0
            })
        );
        assert_matches!(s.view(), EntryView::Entry(e) if e.answer == "a0");
    }

    #[test]
    fn explanation_is_written_into_the_cache() {
        let mut s = session(10, 0);
        let req = s.set_filter(source("NYT"));
        s.apply_page(req.token, entries("a", 3));

        s.set_explanation("a clue 0", "a0", "because");

        assert_eq!(
            s.current_entry().and_then(|e| e.explanation.as_deref()),
            Some("because")
        );
    }
}
