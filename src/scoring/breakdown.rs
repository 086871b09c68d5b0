//! Score terms, clamps and per-question breakdowns.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Name of one contribution to a question score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    // Sub-scores taken from the evaluation
    Grammar,
    Naturalness,
    WordUsage,

    /// Fixed base for the CEFR level the answer was graded at.
    LevelBase,
    /// Base for a correct option pick, after the combo multiplier.
    CorrectPick,
    /// Flat award for a correct pick on a bonus question.
    BonusQuestion,

    // Bonuses
    AllWordsUsed,
    Quick,
    AdvancedTransform,
    NoHint,
    CreativeWordUse,
    CorrectReason,

    // Penalties
    HintUsed,
    MineMissed,
}

impl TermKind {
    /// Whether the term is a deduction.
    #[must_use]
    pub fn is_penalty(self) -> bool {
        matches!(self, TermKind::HintUsed | TermKind::MineMissed)
    }
}

/// One named contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTerm {
    pub kind: TermKind,
    pub points: i64,
}

/// Bounds applied to a raw score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreClamp {
    pub floor: i64,
    /// `None` for no ceiling.
    pub ceiling: Option<i64>,
}

impl ScoreClamp {
    /// `[0, ∞)`.
    #[must_use]
    pub const fn floor_at_zero() -> Self {
        Self {
            floor: 0,
            ceiling: None,
        }
    }

    /// `[0, ceiling]`.
    #[must_use]
    pub const fn between_zero_and(ceiling: i64) -> Self {
        Self {
            floor: 0,
            ceiling: Some(ceiling),
        }
    }

    /// Clamp a raw value.
    #[must_use]
    pub fn apply(self, raw: i64) -> i64 {
        let floored = raw.max(self.floor);
        match self.ceiling {
            Some(ceiling) => floored.min(ceiling),
            None => floored,
        }
    }
}

impl Default for ScoreClamp {
    fn default() -> Self {
        Self::floor_at_zero()
    }
}

/// Itemized score for one question.
///
/// Built by pushing terms, then sealed with [`finish`](Self::finish), which
/// records the clamped total. Choice games score a question in several
/// events and [`absorb`](Self::absorb) each event's terms; the question
/// total is then the clamped sum of every term booked so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    terms: SmallVec<[ScoreTerm; 8]>,
    total: i64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term.
    pub fn push(&mut self, kind: TermKind, points: i64) {
        self.terms.push(ScoreTerm { kind, points });
    }

    /// Append a term only when it is non-zero.
    pub fn push_nonzero(&mut self, kind: TermKind, points: i64) {
        if points != 0 {
            self.push(kind, points);
        }
    }

    /// Seal: record the clamped sum of all terms as the total.
    #[must_use]
    pub fn finish(mut self, clamp: ScoreClamp) -> Self {
        self.total = clamp.apply(self.raw());
        self
    }

    /// Merge an event's terms into this breakdown and re-clamp the running
    /// sum. Returns how far the clamped total moved.
    pub fn absorb(&mut self, event: ScoreBreakdown, clamp: ScoreClamp) -> i64 {
        let before = self.total;
        self.terms.extend(event.terms);
        self.total = clamp.apply(self.raw());
        self.total - before
    }

    /// All terms in push order.
    #[must_use]
    pub fn terms(&self) -> &[ScoreTerm] {
        &self.terms
    }

    /// Sum of the points for one term kind (0 if absent).
    #[must_use]
    pub fn points(&self, kind: TermKind) -> i64 {
        self.terms
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.points)
            .sum()
    }

    /// Unclamped sum of all terms.
    #[must_use]
    pub fn raw(&self) -> i64 {
        self.terms.iter().map(|t| t.points).sum()
    }

    /// Clamped total recorded by `finish`/`absorb`.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
