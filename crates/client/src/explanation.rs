//! Explanation display state for the current entry.

use crosswordcoach_core::types::Entry;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExplanationStatus {
    #[default]
    Hidden,
    Loading,
    Shown(String),
    /// The request failed; not retried for this entry.
    Unavailable,
}

/// Tracks the explanation for whichever entry is displayed.
///
/// At most one request is issued per `(clue, answer)`, even across failures.
#[derive(Debug, Default)]
pub struct ExplanationState {
    status: ExplanationStatus,
    /// Entry the status belongs to.
    shown_for: Option<(String, String)>,
    last_requested: Option<(String, String)>,
    /// Whether the request for `last_requested` has failed.
    last_failed: bool,
}

fn key(entry: &Entry) -> (String, String) {
    (entry.clue.clone(), entry.answer.clone())
}

fn is_key(key: &Option<(String, String)>, clue: &str, answer: &str) -> bool {
    key.as_ref()
        .is_some_and(|(c, a)| c == clue && a == answer)
}

impl ExplanationState {
    pub fn status(&self) -> &ExplanationStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ExplanationStatus::Loading
    }

    /// Reset to hidden if `current` is a different entry than before.
    pub fn sync(&mut self, current: Option<&Entry>) {
        let same = match (current, &self.shown_for) {
            (Some(entry), Some(_)) => is_key(&self.shown_for, &entry.clue, &entry.answer),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.status = ExplanationStatus::Hidden;
            self.shown_for = current.map(key);
        }
    }

    /// Show the explanation for `entry`.
    ///
    /// Returns `true` when the caller should fetch it; `false` when it is
    /// already known, in flight, or was requested before.
    pub fn begin(&mut self, entry: &Entry) -> bool {
        self.sync(Some(entry));

        if let Some(explanation) = &entry.explanation {
            self.status = ExplanationStatus::Shown(explanation.clone());
            return false;
        }
        if is_key(&self.last_requested, &entry.clue, &entry.answer) {
            self.status = if self.last_failed {
                ExplanationStatus::Unavailable
            } else {
                ExplanationStatus::Loading
            };
            return false;
        }

        self.last_requested = Some(key(entry));
        self.last_failed = false;
        self.status = ExplanationStatus::Loading;
        true
    }

    /// Record the outcome of a fetch started by [`begin`](Self::begin).
    ///
    /// The status only changes when the entry is still displayed.
    pub fn finish(&mut self, clue: &str, answer: &str, explanation: Option<String>) {
        if is_key(&self.last_requested, clue, answer) {
            self.last_failed = explanation.is_none();
        }
        if !is_key(&self.shown_for, clue, answer) {
            return;
        }
        self.status = match explanation {
            Some(text) => ExplanationStatus::Shown(text),
            None => ExplanationStatus::Unavailable,
        };
    }
}
