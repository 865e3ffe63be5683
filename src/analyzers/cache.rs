//! Memoization of per-quiz statistics across repeated queries.

use crate::analyzers::aggregate::quiz_statistics;
use crate::analyzers::analyzer::Dataset;
use crate::analyzers::types::{Observation, QuizStatistics};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use tracing::debug;

/// Content hash of an observation sequence. Order-sensitive.
pub fn fingerprint(observations: &[Observation]) -> u64 {
    let mut hasher = DefaultHasher::new();
    observations.len().hash(&mut hasher);
    for obs in observations {
        obs.student_key.hash(&mut hasher);
        obs.name.hash(&mut hasher);
        obs.email.hash(&mut hasher);
        obs.quiz.hash(&mut hasher);
        obs.score.map(f64::to_bits).hash(&mut hasher);
        obs.attempts.map(f64::to_bits).hash(&mut hasher);
    }
    hasher.finish()
}

/// Caches [`QuizStatistics`] keyed by dataset fingerprint and quiz index.
///
/// Entries belong to a single dataset: a lookup against a dataset with a
/// different fingerprint drops everything cached so far.
pub struct StatsCache {
    persistent_attempts_threshold: f64,
    current: Option<u64>,
    entries: HashMap<u32, QuizStatistics>,
}

impl StatsCache {
    pub fn new(persistent_attempts_threshold: f64) -> Self {
        Self {
            persistent_attempts_threshold,
            current: None,
            entries: HashMap::new(),
        }
    }

    /// Returns the statistics for `quiz`, computing them on first use.
    pub fn quiz_statistics(&mut self, dataset: &Dataset, quiz: u32) -> &QuizStatistics {
        let fingerprint = dataset.fingerprint();
        if self.current != Some(fingerprint) {
            if self.current.is_some() {
                debug!(entries = self.entries.len(), "Dataset changed, dropping cached statistics");
            }
            self.invalidate();
            self.current = Some(fingerprint);
        }

        let threshold = self.persistent_attempts_threshold;
        self.entries
            .entry(quiz)
            .or_insert_with(|| quiz_statistics(dataset.observations(), quiz, threshold))
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
