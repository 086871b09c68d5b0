//! Game traits for round implementations.
//!
//! Games implement [`Game`] to define:
//! - Question and evaluation payloads, and their structural checks
//! - Which scoring policy grades an answer
//! - Difficulty progression and round summaries
//!
//! Free-text games add [`ComposeGame`]; pick-the-option games add
//! [`ChoiceGame`]. The engine is generic over these traits and never
//! interprets game-specific fields directly.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{AnswerPhase, Metric, RoundConfig, RoundState};
use crate::error::ValidationError;
use crate::scoring::ScoringPolicy;

/// Which mini-game a round belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Minefield,
    Refiner,
    NativeOrNot,
}

impl GameKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            GameKind::Minefield => "minefield",
            GameKind::Refiner => "refiner",
            GameKind::NativeOrNot => "native_or_not",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A generated question.
pub trait Exercise: Clone + Debug + PartialEq + Send + 'static {
    /// Stable content key for the anti-repeat set.
    fn signature(&self) -> String;

    /// Structural check run before the question is shown.
    fn validate(&self) -> Result<(), ValidationError>;

    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Pre-baked hint text, if the question carries one.
    fn hint(&self) -> Option<&str> {
        None
    }
}

/// A graded answer.
pub trait Assessment: Clone + Debug + PartialEq + Send + 'static {
    /// Clamp and trim raw collaborator values. Runs before `validate`.
    #[must_use]
    fn normalized(self) -> Self {
        self
    }

    /// Structural check run before the evaluation is scored.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Sub-metric observations added to the round sums.
    fn metrics(&self) -> SmallVec<[(Metric, i64); 4]> {
        SmallVec::new()
    }
}

/// One mini-game variant.
///
/// Implementors are small configuration values (round config plus scoring
/// constants), so they are cheap to clone and compare.
pub trait Game: Clone + Debug + PartialEq + Send + Sync + 'static {
    const KIND: GameKind;

    /// Metrics averaged into the round result, in display order.
    const METRICS: &'static [Metric];

    /// Phase a freshly shown question opens in.
    const ANSWER_PHASE: AnswerPhase;

    /// Phase in which a hint may be requested (`None`: no hints).
    const HINT_PHASE: Option<AnswerPhase>;

    /// Whether a related bonus question may be requested once per round.
    const OFFERS_BONUS: bool = false;

    type Difficulty: Copy + Debug + Default + PartialEq + Eq + Send + 'static;
    type Question: Exercise;
    type Evaluation: Assessment;
    type Policy: ScoringPolicy<Question = Self::Question, Evaluation = Self::Evaluation>;

    /// Per-round counters the generic state does not track.
    type Tally: Clone + Debug + Default + PartialEq + Send;

    /// Game-specific part of the round result.
    type Details: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + 'static;

    fn config(&self) -> &RoundConfig;

    fn policy(&self) -> &Self::Policy;

    /// Difficulty to request the next regular question at.
    fn next_difficulty(&self, round: &RoundState<Self>) -> Self::Difficulty {
        round.difficulty
    }

    /// Reshape a raw question before validation.
    fn normalize(&self, question: Self::Question, _difficulty: Self::Difficulty) -> Self::Question {
        question
    }

    /// Game-specific summary for the round result.
    fn summarize(&self, round: &RoundState<Self>) -> Self::Details;
}

/// A game answered with a free-text sentence.
pub trait ComposeGame: Game {
    /// Local precondition on a trimmed, non-empty answer.
    fn accepts(&self, question: &Self::Question, answer: &str) -> bool;
}

/// Outcome of one confirmed pick in a choice game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgement {
    /// Phase 1: the option pick.
    Pick { correct: bool },
    /// Phase 2: the reason pick.
    Reason { correct: bool },
}

impl Judgement {
    #[must_use]
    pub fn is_correct(self) -> bool {
        match self {
            Judgement::Pick { correct } | Judgement::Reason { correct } => correct,
        }
    }
}

impl Assessment for Judgement {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A game answered by picking an option, then a reason.
///
/// Choice games are graded locally, so their evaluation type is the
/// [`Judgement`] of each confirmed pick.
pub trait ChoiceGame: Game<Evaluation = Judgement> {
    fn option_count(&self, question: &Self::Question) -> usize;

    fn reason_count(&self, question: &Self::Question) -> usize;

    fn is_correct_option(&self, question: &Self::Question, index: usize) -> bool;

    fn is_correct_reason(&self, question: &Self::Question, index: usize) -> bool;

    /// Book a wrong regular pick into the game's counters.
    fn record_miss(&self, _tally: &mut Self::Tally, _question: &Self::Question) {}
}
