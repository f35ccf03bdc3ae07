//! Running score for a play session.

/// Streak and accuracy counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub streak: u32,
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn record_correct(&mut self) {
        self.streak += 1;
        self.correct += 1;
        self.total += 1;
    }

    /// A wrong answer or giving up.
    pub fn record_miss(&mut self) {
        self.streak = 0;
        self.total += 1;
    }

    /// Percentage of correct answers, or `None` before the first attempt.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.correct) / f64::from(self.total) * 100.0)
    }
}

/// Whether `guess` matches `answer`, ignoring case and surrounding spaces.
pub fn is_correct_guess(guess: &str, answer: &str) -> bool {
    guess.trim().to_lowercase() == answer.trim().to_lowercase()
}
