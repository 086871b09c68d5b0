//! NativeOrNot scoring.
//!
//! A question is scored in events: the option pick, then the reason pick.
//! The engine clamps the question's running sum at zero after each event, so
//! a hint penalty booked with a wrong pick is still paid out of a later
//! reason bonus, and the round total never drops.

use serde::{Deserialize, Serialize};

use super::model::NativeOrNotQuestion;
use crate::rules::Judgement;
use crate::scoring::{combo_multiplier, ScoreBreakdown, ScoreFacts, ScoringPolicy, TermKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeOrNotScoring {
    /// Correct pick, before the combo multiplier.
    pub correct_base: i64,
    pub reason_bonus: i64,
    pub no_hint_bonus: i64,
    pub hint_penalty: i64,
    /// Correct pick on a related bonus question.
    pub bonus_question: i64,
}

impl Default for NativeOrNotScoring {
    fn default() -> Self {
        Self {
            correct_base: 100,
            reason_bonus: 50,
            no_hint_bonus: 30,
            hint_penalty: 20,
            bonus_question: 100,
        }
    }
}

impl NativeOrNotScoring {
    /// `correct_base` scaled by the combo multiplier for `streak`.
    #[must_use]
    pub fn combo_points(&self, streak: u32) -> i64 {
        (self.correct_base as f64 * combo_multiplier(streak)).round() as i64
    }
}

impl ScoringPolicy for NativeOrNotScoring {
    type Question = NativeOrNotQuestion;
    type Evaluation = Judgement;

    fn terms(
        &self,
        _question: &NativeOrNotQuestion,
        judgement: &Judgement,
        facts: &ScoreFacts,
    ) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::new();
        match *judgement {
            Judgement::Pick { correct } if facts.bonus_question => {
                if correct {
                    breakdown.push(TermKind::BonusQuestion, self.bonus_question);
                }
            }
            Judgement::Pick { correct } => {
                if facts.hint_used {
                    breakdown.push(TermKind::HintUsed, -self.hint_penalty);
                } else {
                    breakdown.push(TermKind::NoHint, self.no_hint_bonus);
                }
                if correct {
                    // `facts.streak` already includes this pick.
                    breakdown.push(TermKind::CorrectPick, self.combo_points(facts.streak));
                }
            }
            Judgement::Reason { correct } => {
                if correct {
                    breakdown.push(TermKind::CorrectReason, self.reason_bonus);
                }
            }
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::native_or_not::model::sample_question;
    use std::time::Duration;

    fn facts(streak: u32, hint: bool) -> ScoreFacts {
        ScoreFacts::new(Duration::from_secs(5), Duration::from_secs(60))
            .with_streak(streak)
            .with_hint(hint)
    }

    fn score(judgement: Judgement, facts: &ScoreFacts) -> i64 {
        let question = sample_question();
        NativeOrNotScoring::default().score(&question, &judgement, facts).total()
    }

    #[test]
    fn test_combo_points() {
        let policy = NativeOrNotScoring::default();
        assert_eq!(policy.combo_points(1), 100);
        assert_eq!(policy.combo_points(3), 150);
        assert_eq!(policy.combo_points(5), 200);
    }

    #[test]
    fn test_correct_pick_without_hint() {
        assert_eq!(score(Judgement::Pick { correct: true }, &facts(1, false)), 130);
        assert_eq!(score(Judgement::Pick { correct: true }, &facts(3, false)), 180);
        assert_eq!(score(Judgement::Pick { correct: true }, &facts(5, false)), 230);
    }

    #[test]
    fn test_hint_and_wrong_pick() {
        assert_eq!(score(Judgement::Pick { correct: true }, &facts(1, true)), 80);
        assert_eq!(score(Judgement::Pick { correct: false }, &facts(0, false)), 30);
        // -20 alone floors at zero.
        assert_eq!(score(Judgement::Pick { correct: false }, &facts(0, true)), 0);
    }

    #[test]
    fn test_reason() {
        assert_eq!(score(Judgement::Reason { correct: true }, &facts(2, true)), 50);
        assert_eq!(score(Judgement::Reason { correct: false }, &facts(2, false)), 0);
    }

    #[test]
    fn test_bonus_question_pick() {
        let bonus = facts(4, false).with_bonus_question(true);
        assert_eq!(score(Judgement::Pick { correct: true }, &bonus), 100);
        assert_eq!(score(Judgement::Pick { correct: false }, &bonus), 0);
    }
}
