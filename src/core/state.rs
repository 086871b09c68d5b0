//! Round state: everything the engine mutates during a round.
//!
//! ## RoundState
//!
//! Owned exclusively by one `RoundEngine`:
//! - Stage, selected difficulty, retry target
//! - Answered count, total score, per-metric sums, streak counters
//! - Anti-repeat signature set (grows for the life of the round)
//! - The question on screen, as a [`QuestionState`]
//!
//! ## QuestionState
//!
//! Per-question transient facts (hint usage, selections, submitted answer,
//! score breakdown). Replaced wholesale when the next question arrives.

use std::time::Duration;

use im::HashSet as ImHashSet;

use super::metrics::MetricSums;
use super::stage::{AnswerPhase, RetryTarget, Stage};
use crate::rules::Game;
use crate::scoring::ScoreBreakdown;
use crate::stats::RoundResult;

/// Signatures of questions already shown this round.
///
/// Persistent set: handing a copy to every generation request is O(1).
pub type Signatures = ImHashSet<String>;

/// The question on screen and what has happened to it so far.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionState<G: Game> {
    pub question: G::Question,

    /// Related bonus question rather than a regular one.
    pub is_bonus: bool,

    /// Monotonic time the question was shown.
    pub shown_at: Duration,

    // === Hints ===
    pub hint_used: bool,
    pub hint_text: Option<String>,

    // === Choice selections ===
    pub selected_option: Option<usize>,
    pub selected_reason: Option<usize>,
    /// Set once the option pick is confirmed.
    pub option_correct: Option<bool>,
    /// Set once the reason pick is confirmed.
    pub reason_correct: Option<bool>,

    // === Grading ===
    /// Sentence that produced `evaluation`.
    pub submitted: Option<String>,
    pub evaluation: Option<G::Evaluation>,
    pub breakdown: ScoreBreakdown,
    /// Time from `shown_at` to the first scored event.
    pub elapsed: Duration,
}

impl<G: Game> QuestionState<G> {
    /// Fresh state for a question shown at `shown_at`.
    #[must_use]
    pub fn new(question: G::Question, is_bonus: bool, shown_at: Duration) -> Self {
        Self {
            question,
            is_bonus,
            shown_at,
            hint_used: false,
            hint_text: None,
            selected_option: None,
            selected_reason: None,
            option_correct: None,
            reason_correct: None,
            submitted: None,
            evaluation: None,
            breakdown: ScoreBreakdown::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Points this question has contributed so far.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.breakdown.total()
    }
}

/// Mutable round state.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState<G: Game> {
    // === Lifecycle ===
    pub stage: Stage,
    pub initialized: bool,
    /// Difficulty chosen at `initialize`.
    pub difficulty: G::Difficulty,
    /// What `retry()` re-dispatches.
    pub retry_target: RetryTarget,
    /// Collaborator message behind the current `Error` stage.
    pub error: Option<String>,

    // === Progress ===
    /// Graded regular questions (capped at the round's question count).
    pub answered: u32,
    pub total_score: i64,
    pub metric_sums: MetricSums,
    pub streak: u32,
    pub highest_streak: u32,
    pub correct_count: u32,
    /// Game-specific counters.
    pub tally: G::Tally,

    // === Questions ===
    pub used_signatures: Signatures,
    pub current: Option<QuestionState<G>>,
    /// Trimmed answer kept so an evaluation retry resubmits the same text.
    pub pending_answer: Option<String>,

    // === Bonus path ===
    pub bonus_used: bool,
    /// Question the related bonus question is generated from.
    pub bonus_base: Option<G::Question>,

    /// Set exactly once, on completion.
    pub result: Option<RoundResult<G::Details>>,
}

impl<G: Game> RoundState<G> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: Stage::LoadingQuestion,
            initialized: false,
            difficulty: G::Difficulty::default(),
            retry_target: RetryTarget::default(),
            error: None,
            answered: 0,
            total_score: 0,
            metric_sums: MetricSums::new(),
            streak: 0,
            highest_streak: 0,
            correct_count: 0,
            tally: G::Tally::default(),
            used_signatures: Signatures::new(),
            current: None,
            pending_answer: None,
            bonus_used: false,
            bonus_base: None,
            result: None,
        }
    }

    /// Whether the question on screen is a bonus question.
    #[must_use]
    pub fn on_bonus_question(&self) -> bool {
        self.current.as_ref().is_some_and(|q| q.is_bonus)
    }

    /// Record a graded regular question, never past `total`.
    pub fn count_answered(&mut self, total: u32) {
        self.answered = total.min(self.answered + 1);
    }

    /// Apply an option-pick outcome to the streak counters.
    pub fn record_pick(&mut self, correct: bool) {
        if correct {
            self.streak += 1;
            self.highest_streak = self.highest_streak.max(self.streak);
            self.correct_count += 1;
        } else {
            self.streak = 0;
        }
    }

    /// Number shown as "question N of total".
    ///
    /// Before grading the on-screen question counts as the next one; once it
    /// is graded (and for a bonus question, which follows a graded one) the
    /// count of graded questions is shown.
    #[must_use]
    pub fn display_number(&self, total: u32) -> u32 {
        let graded = self.answered.min(total).max(1);
        let upcoming = (self.answered + 1).min(total).max(1);
        if self.on_bonus_question() || self.stage == Stage::LoadingBonus {
            return graded;
        }
        match self.stage {
            Stage::Feedback | Stage::Answering(AnswerPhase::SelectingReason) => graded,
            Stage::RoundCompleted => total,
            _ => upcoming,
        }
    }
}

impl<G: Game> Default for RoundState<G> {
    fn default() -> Self {
        Self::new()
    }
}
