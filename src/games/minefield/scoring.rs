//! Minefield scoring.

use serde::{Deserialize, Serialize};

use super::model::{MinefieldEvaluation, MinefieldQuestion};
use crate::scoring::{ScoreBreakdown, ScoreClamp, ScoreFacts, ScoringPolicy, TermKind};

/// Sub-scores plus bonuses, minus the mine penalty, clamped to
/// `[0, ceiling]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinefieldScoring {
    /// Every word of the question was used.
    pub all_words_bonus: i64,
    pub quick_bonus: i64,
    pub advanced_transform_bonus: i64,
    /// At least one required word was left out.
    pub mine_penalty: i64,
    pub ceiling: i64,
}

impl Default for MinefieldScoring {
    fn default() -> Self {
        Self {
            all_words_bonus: 50,
            quick_bonus: 30,
            advanced_transform_bonus: 20,
            mine_penalty: 50,
            ceiling: 400,
        }
    }
}

impl ScoringPolicy for MinefieldScoring {
    type Question = MinefieldQuestion;
    type Evaluation = MinefieldEvaluation;

    fn terms(
        &self,
        _question: &MinefieldQuestion,
        evaluation: &MinefieldEvaluation,
        facts: &ScoreFacts,
    ) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::new();
        breakdown.push(TermKind::Grammar, evaluation.grammar_score);
        breakdown.push(TermKind::Naturalness, evaluation.naturalness_score);
        breakdown.push(TermKind::WordUsage, evaluation.word_usage_score);

        if evaluation.used_all_words() {
            breakdown.push(TermKind::AllWordsUsed, self.all_words_bonus);
        }
        if facts.is_quick() {
            breakdown.push(TermKind::Quick, self.quick_bonus);
        }
        if evaluation.advanced_transform_used {
            breakdown.push(TermKind::AdvancedTransform, self.advanced_transform_bonus);
        }
        if evaluation.missed_a_mine() {
            breakdown.push(TermKind::MineMissed, -self.mine_penalty);
        }
        breakdown
    }

    fn clamp(&self) -> ScoreClamp {
        ScoreClamp::between_zero_and(self.ceiling)
    }
}
