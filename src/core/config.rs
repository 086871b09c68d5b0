//! Round configuration.
//!
//! Each game supplies a `RoundConfig` at construction time. Scoring constants
//! live next to each game's scoring policy instead; this type only covers the
//! round shape and the messages the engine itself publishes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default answer-time window for quick bonuses.
pub const DEFAULT_QUICK_BONUS_LIMIT_MS: u64 = 60_000;

/// Round shape and engine-owned messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Graded (regular) questions per round. Bonus questions do not count.
    pub total_questions: u32,

    /// Answers graded within this window earn the quick bonus.
    pub quick_bonus_limit_ms: u64,

    /// Shown while a question is being generated.
    pub loading_message: String,

    /// Shown when a generated question fails its structural check.
    pub malformed_question_message: String,

    /// Shown when an evaluation fails its structural check.
    pub malformed_evaluation_message: String,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            total_questions: 5,
            quick_bonus_limit_ms: DEFAULT_QUICK_BONUS_LIMIT_MS,
            loading_message: "Loading the next question...".to_string(),
            malformed_question_message: "The generated question was malformed.".to_string(),
            malformed_evaluation_message: "The evaluation was malformed.".to_string(),
        }
    }
}

impl RoundConfig {
    /// Config with the given question count and default messages.
    #[must_use]
    pub fn for_questions(total_questions: u32) -> Self {
        Self::default().with_total_questions(total_questions)
    }

    /// Set the question count (at least 1).
    #[must_use]
    pub fn with_total_questions(mut self, total: u32) -> Self {
        self.total_questions = total.max(1);
        self
    }

    /// Set the quick-bonus window.
    #[must_use]
    pub fn with_quick_bonus_limit(mut self, limit: Duration) -> Self {
        self.quick_bonus_limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the loading message.
    #[must_use]
    pub fn with_loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }

    /// Quick-bonus window as a `Duration`.
    #[must_use]
    pub fn quick_bonus_limit(&self) -> Duration {
        Duration::from_millis(self.quick_bonus_limit_ms)
    }

    /// Question count, never below 1.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_questions.max(1)
    }
}
