//! Minefield game implementation.

use super::matcher::WordUsageMatcher;
use super::model::{MinefieldDifficulty, MinefieldEvaluation, MinefieldQuestion};
use super::scoring::MinefieldScoring;
use crate::core::{AnswerPhase, Metric, RoundConfig, RoundState};
use crate::rules::{ComposeGame, Game, GameKind};

/// Questions per Minefield round.
pub const MINEFIELD_QUESTIONS: u32 = 4;

/// Write one sentence that uses the given words, required ones included.
#[derive(Clone, Debug, PartialEq)]
pub struct Minefield {
    config: RoundConfig,
    scoring: MinefieldScoring,
}

impl Minefield {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RoundConfig::for_questions(MINEFIELD_QUESTIONS),
            scoring: MinefieldScoring::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RoundConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: MinefieldScoring) -> Self {
        self.scoring = scoring;
        self
    }
}

impl Default for Minefield {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Minefield {
    const KIND: GameKind = GameKind::Minefield;
    const METRICS: &'static [Metric] = &[Metric::Grammar, Metric::Naturalness, Metric::WordUsage];
    const ANSWER_PHASE: AnswerPhase = AnswerPhase::Composing;
    const HINT_PHASE: Option<AnswerPhase> = None;

    type Difficulty = MinefieldDifficulty;
    type Question = MinefieldQuestion;
    type Evaluation = MinefieldEvaluation;
    type Policy = MinefieldScoring;
    type Tally = ();
    type Details = ();

    fn config(&self) -> &RoundConfig {
        &self.config
    }

    fn policy(&self) -> &MinefieldScoring {
        &self.scoring
    }

    fn normalize(&self, question: MinefieldQuestion, difficulty: MinefieldDifficulty) -> MinefieldQuestion {
        question.normalized_for(difficulty)
    }

    fn summarize(&self, _round: &RoundState<Self>) {}
}

impl ComposeGame for Minefield {
    /// At least one of the question's words must appear.
    fn accepts(&self, question: &MinefieldQuestion, answer: &str) -> bool {
        WordUsageMatcher::uses_any(&question.words, answer)
    }
}
