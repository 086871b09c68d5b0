//! The scoring policy seam and the facts it reads.

use std::time::Duration;

use super::breakdown::{ScoreBreakdown, ScoreClamp};

/// Round-local facts a policy may read besides the evaluation itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreFacts {
    /// Time from the question being shown to the scored event.
    pub elapsed: Duration,
    /// Answers within this window are quick.
    pub quick_limit: Duration,
    pub hint_used: bool,
    /// Streak after the scored pick was applied.
    pub streak: u32,
    /// The question is a related bonus question.
    pub bonus_question: bool,
}

impl ScoreFacts {
    /// Facts for a regular question with no hint and no streak.
    #[must_use]
    pub fn new(elapsed: Duration, quick_limit: Duration) -> Self {
        Self {
            elapsed,
            quick_limit,
            hint_used: false,
            streak: 0,
            bonus_question: false,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint_used: bool) -> Self {
        self.hint_used = hint_used;
        self
    }

    #[must_use]
    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }

    #[must_use]
    pub fn with_bonus_question(mut self, bonus_question: bool) -> Self {
        self.bonus_question = bonus_question;
        self
    }

    /// Whether the answer came within the quick window (inclusive).
    #[must_use]
    pub fn is_quick(&self) -> bool {
        self.elapsed <= self.quick_limit
    }
}

/// Per-game scoring formula.
///
/// Implementations push named terms (base, bonuses, penalties) into a
/// [`ScoreBreakdown`]; the engine seals it with [`clamp`](Self::clamp).
///
/// ## Implementation Notes
///
/// - `terms`: pure, no side effects; may be called once per scored event
/// - `clamp`: bounds on a question's raw sum; multi-event questions re-clamp
///   the running sum after each event
pub trait ScoringPolicy: Send + Sync {
    type Question;
    type Evaluation;

    /// Itemize the score for one evaluation.
    fn terms(
        &self,
        question: &Self::Question,
        evaluation: &Self::Evaluation,
        facts: &ScoreFacts,
    ) -> ScoreBreakdown;

    /// Bounds for one scored event.
    fn clamp(&self) -> ScoreClamp {
        ScoreClamp::floor_at_zero()
    }

    /// Itemized and clamped score for one event.
    fn score(
        &self,
        question: &Self::Question,
        evaluation: &Self::Evaluation,
        facts: &ScoreFacts,
    ) -> ScoreBreakdown {
        self.terms(question, evaluation, facts).finish(self.clamp())
    }
}

/// Streak multiplier: ×2.0 from 5, ×1.5 from 3, else ×1.0.
#[must_use]
pub fn combo_multiplier(streak: u32) -> f64 {
    if streak >= 5 {
        2.0
    } else if streak >= 3 {
        1.5
    } else {
        1.0
    }
}
