//! Refiner scoring.

use serde::{Deserialize, Serialize};

use super::model::{RefinerEvaluation, RefinerQuestion};
use crate::scoring::{ScoreBreakdown, ScoreFacts, ScoringPolicy, TermKind};

/// Level base, then a hint penalty or a no-hint bonus, a quick bonus and a
/// creativity bonus. Floored at zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerScoring {
    pub hint_penalty: i64,
    pub no_hint_bonus: i64,
    pub quick_bonus: i64,
    /// Only when the question has a required word.
    pub creative_bonus: i64,
}

impl Default for RefinerScoring {
    fn default() -> Self {
        Self {
            hint_penalty: 30,
            no_hint_bonus: 50,
            quick_bonus: 20,
            creative_bonus: 30,
        }
    }
}

impl ScoringPolicy for RefinerScoring {
    type Question = RefinerQuestion;
    type Evaluation = RefinerEvaluation;

    fn terms(
        &self,
        question: &RefinerQuestion,
        evaluation: &RefinerEvaluation,
        facts: &ScoreFacts,
    ) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::new();
        breakdown.push(TermKind::LevelBase, evaluation.level.base_score());
        if facts.hint_used {
            breakdown.push(TermKind::HintUsed, -self.hint_penalty);
        } else {
            breakdown.push(TermKind::NoHint, self.no_hint_bonus);
        }
        if facts.is_quick() {
            breakdown.push(TermKind::Quick, self.quick_bonus);
        }
        if question.constraints.has_required_word() && evaluation.creative_required_word_use {
            breakdown.push(TermKind::CreativeWordUse, self.creative_bonus);
        }
        breakdown
    }
}
