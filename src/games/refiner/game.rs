//! Refiner game implementation.

use super::model::{RefinerDifficulty, RefinerEvaluation, RefinerQuestion};
use super::scoring::RefinerScoring;
use super::validator::ConstraintValidator;
use crate::core::{AnswerPhase, Metric, RoundConfig, RoundState};
use crate::rules::{ComposeGame, Game, GameKind};

/// Questions per Refiner round.
pub const REFINER_QUESTIONS: u32 = 5;

/// Rewrite a plain sentence in a target style, under constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct Refiner {
    config: RoundConfig,
    scoring: RefinerScoring,
}

impl Refiner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RoundConfig::for_questions(REFINER_QUESTIONS),
            scoring: RefinerScoring::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RoundConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: RefinerScoring) -> Self {
        self.scoring = scoring;
        self
    }
}

impl Default for Refiner {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Refiner {
    const KIND: GameKind = GameKind::Refiner;
    const METRICS: &'static [Metric] = &[
        Metric::Lexical,
        Metric::Syntax,
        Metric::Naturalness,
        Metric::Compliance,
    ];
    const ANSWER_PHASE: AnswerPhase = AnswerPhase::Composing;
    const HINT_PHASE: Option<AnswerPhase> = Some(AnswerPhase::Composing);

    type Difficulty = RefinerDifficulty;
    type Question = RefinerQuestion;
    type Evaluation = RefinerEvaluation;
    type Policy = RefinerScoring;
    type Tally = ();
    type Details = ();

    fn config(&self) -> &RoundConfig {
        &self.config
    }

    fn policy(&self) -> &RefinerScoring {
        &self.scoring
    }

    fn normalize(&self, question: RefinerQuestion, _difficulty: RefinerDifficulty) -> RefinerQuestion {
        question.normalized()
    }

    fn summarize(&self, _round: &RoundState<Self>) {}
}

impl ComposeGame for Refiner {
    /// Every constraint must hold.
    fn accepts(&self, question: &RefinerQuestion, answer: &str) -> bool {
        ConstraintValidator::validate(&question.constraints, answer).all_satisfied
    }
}
