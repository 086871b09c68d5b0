//! Evaluation sub-metrics and their running sums.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A graded sub-score reported by an evaluation (each 0..=100).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Grammar,
    Naturalness,
    WordUsage,
    Lexical,
    Syntax,
    Compliance,
}

impl Metric {
    /// Lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::Grammar => "grammar",
            Metric::Naturalness => "naturalness",
            Metric::WordUsage => "word_usage",
            Metric::Lexical => "lexical",
            Metric::Syntax => "syntax",
            Metric::Compliance => "compliance",
        }
    }
}

/// Per-metric running sums over the answered questions of a round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricSums {
    sums: FxHashMap<Metric, i64>,
}

impl MetricSums {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation.
    pub fn add(&mut self, metric: Metric, value: i64) {
        *self.sums.entry(metric).or_insert(0) += value;
    }

    /// Sum so far (0 if never observed).
    #[must_use]
    pub fn get(&self, metric: Metric) -> i64 {
        self.sums.get(&metric).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }
}
