//! Async driver tying the session to the API.
//!
//! [`Coach`] owns an [`EntrySession`] and runs every fetch it asks for on a
//! spawned task. Finished fetches come back over an mpsc channel and are
//! applied on the next call that drains it, so the session itself is only
//! ever touched from the owning task. Fetch failures are logged and applied
//! as empty results.

use std::sync::Arc;

use crosswordcoach_core::types::{Entry, EntryFilterOptions};
use tokio::sync::mpsc;

use crate::api::CoachApi;
use crate::explanation::{ExplanationState, ExplanationStatus};
use crate::score::{is_correct_guess, Score};
use crate::session::{EntrySession, EntryView, FetchToken, PageRequest};
use crate::storage::KeyValueStorage;

/// Completed background work.
#[derive(Debug)]
enum CoachEvent {
    Page {
        token: FetchToken,
        entries: Vec<Entry>,
    },
    Explanation {
        clue: String,
        answer: String,
        explanation: Option<String>,
    },
}

/// Result of checking a guess against the current entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
    /// No entry is displayed.
    NoEntry,
}

pub struct Coach<S> {
    api: Arc<dyn CoachApi>,
    session: EntrySession<S>,
    explanation: ExplanationState,
    score: Score,
    events_tx: mpsc::UnboundedSender<CoachEvent>,
    events_rx: mpsc::UnboundedReceiver<CoachEvent>,
}

impl<S: KeyValueStorage> Coach<S> {
    /// Wrap `session`. No fetch happens until [`select_filter`](Self::select_filter).
    pub fn new(api: Arc<dyn CoachApi>, session: EntrySession<S>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            session,
            explanation: ExplanationState::default(),
            score: Score::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn session(&self) -> &EntrySession<S> {
        &self.session
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn explanation(&self) -> &ExplanationStatus {
        self.explanation.status()
    }

    pub fn view(&self) -> EntryView<'_> {
        self.session.view()
    }

    pub fn current_entry(&self) -> Option<&Entry> {
        self.session.current_entry()
    }

    // -- Navigation --

    pub fn select_filter(&mut self, filter: EntryFilterOptions) {
        let request = self.session.set_filter(filter);
        self.spawn_page_fetch(request);
        self.sync_explanation();
    }

    pub fn next_entry(&mut self) {
        if let Some(request) = self.session.go_to_next_entry() {
            self.spawn_page_fetch(request);
        }
        self.sync_explanation();
    }

    pub fn restart(&mut self) {
        if let Some(request) = self.session.go_to_beginning() {
            self.spawn_page_fetch(request);
        }
        self.sync_explanation();
    }

    // -- Scoring --

    /// Score `guess` against the current entry.
    pub fn submit_guess(&mut self, guess: &str) -> GuessOutcome {
        let Some(entry) = self.session.current_entry() else {
            return GuessOutcome::NoEntry;
        };
        if is_correct_guess(guess, &entry.answer) {
            self.score.record_correct();
            GuessOutcome::Correct
        } else {
            self.score.record_miss();
            GuessOutcome::Incorrect
        }
    }

    /// Count the current entry as missed and return it for display.
    pub fn give_up(&mut self) -> Option<&Entry> {
        if self.session.current_entry().is_some() {
            self.score.record_miss();
        }
        self.session.current_entry()
    }

    // -- Explanations --

    /// Show the current entry's explanation, fetching it if needed.
    pub fn explain(&mut self) {
        let Some(entry) = self.session.current_entry() else {
            return;
        };
        if !self.explanation.begin(entry) {
            return;
        }

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let clue = entry.clue.clone();
        let answer = entry.answer.clone();
        tokio::spawn(async move {
            let explanation = match api.fetch_explanation(&clue, &answer).await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(clue = %clue, error = %e, "Failed to fetch explanation");
                    None
                }
            };
            let _ = tx.send(CoachEvent::Explanation {
                clue,
                answer,
                explanation,
            });
        });
    }

    // -- Event processing --

    /// Apply everything that has finished so far without waiting.
    pub fn poll(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle(event);
        }
    }

    /// Wait until the current page has loaded.
    pub async fn wait_until_ready(&mut self) {
        self.poll();
        while self.session.is_loading() {
            if !self.recv_one().await {
                break;
            }
        }
    }

    /// Wait until the current page and any requested explanation have loaded.
    pub async fn wait_for_explanation(&mut self) {
        self.wait_until_ready().await;
        while self.explanation.is_loading() {
            if !self.recv_one().await {
                break;
            }
        }
    }

    /// Wait until no page fetch for the active configuration is outstanding.
    pub async fn settle(&mut self) {
        self.poll();
        while self.session.has_pending() {
            if !self.recv_one().await {
                break;
            }
        }
    }

    async fn recv_one(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    fn handle(&mut self, event: CoachEvent) {
        match event {
            CoachEvent::Page { token, entries } => {
                if let Some(request) = self.session.apply_page(token, entries) {
                    self.spawn_page_fetch(request);
                }
                self.sync_explanation();
            }
            CoachEvent::Explanation {
                clue,
                answer,
                explanation,
            } => {
                if let Some(text) = &explanation {
                    self.session.set_explanation(&clue, &answer, text);
                }
                self.explanation.finish(&clue, &answer, explanation);
            }
        }
    }

    fn sync_explanation(&mut self) {
        self.explanation.sync(self.session.current_entry());
    }

    fn spawn_page_fetch(&self, request: PageRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let PageRequest { token, options } = request;
            let entries = match api.fetch_entries(&options).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(page = token.page, error = %e, "Failed to fetch entries");
                    Vec::new()
                }
            };
            let _ = tx.send(CoachEvent::Page { token, entries });
        });
    }
}
