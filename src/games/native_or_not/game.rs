//! NativeOrNot game implementation.

use super::model::{
    NativeOrNotDetails, NativeOrNotDifficulty, NativeOrNotQuestion, WrongTagCounts,
};
use super::scoring::NativeOrNotScoring;
use crate::core::{AnswerPhase, Metric, RoundConfig, RoundState};
use crate::rules::{ChoiceGame, Game, GameKind, Judgement};

/// Regular questions per NativeOrNot round.
pub const NATIVE_OR_NOT_QUESTIONS: u32 = 5;

/// Spot the natural sentence, then explain the awkward one.
///
/// Graded locally. Correct picks build a streak that multiplies the pick
/// score and raises the requested difficulty. One related bonus question
/// may be requested per round from the explanation screen.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeOrNot {
    config: RoundConfig,
    scoring: NativeOrNotScoring,
}

impl NativeOrNot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RoundConfig::for_questions(NATIVE_OR_NOT_QUESTIONS),
            scoring: NativeOrNotScoring::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RoundConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: NativeOrNotScoring) -> Self {
        self.scoring = scoring;
        self
    }
}

impl Default for NativeOrNot {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for NativeOrNot {
    const KIND: GameKind = GameKind::NativeOrNot;
    const METRICS: &'static [Metric] = &[];
    const ANSWER_PHASE: AnswerPhase = AnswerPhase::SelectingOption;
    const HINT_PHASE: Option<AnswerPhase> = Some(AnswerPhase::SelectingOption);
    const OFFERS_BONUS: bool = true;

    type Difficulty = NativeOrNotDifficulty;
    type Question = NativeOrNotQuestion;
    type Evaluation = Judgement;
    type Policy = NativeOrNotScoring;
    type Tally = WrongTagCounts;
    type Details = NativeOrNotDetails;

    fn config(&self) -> &RoundConfig {
        &self.config
    }

    fn policy(&self) -> &NativeOrNotScoring {
        &self.scoring
    }

    fn next_difficulty(&self, round: &RoundState<Self>) -> NativeOrNotDifficulty {
        round
            .difficulty
            .max(NativeOrNotDifficulty::for_streak(round.streak))
    }

    fn normalize(
        &self,
        question: NativeOrNotQuestion,
        _difficulty: NativeOrNotDifficulty,
    ) -> NativeOrNotQuestion {
        question.normalized()
    }

    fn summarize(&self, round: &RoundState<Self>) -> NativeOrNotDetails {
        NativeOrNotDetails {
            correct_answers: round.correct_count,
            highest_streak: round.highest_streak,
            weak_tag: round.tally.weak_tag(),
        }
    }
}

impl ChoiceGame for NativeOrNot {
    fn option_count(&self, question: &NativeOrNotQuestion) -> usize {
        question.options.len()
    }

    fn reason_count(&self, question: &NativeOrNotQuestion) -> usize {
        question.reason_choices.len()
    }

    fn is_correct_option(&self, question: &NativeOrNotQuestion, index: usize) -> bool {
        index == question.correct_index
    }

    fn is_correct_reason(&self, question: &NativeOrNotQuestion, index: usize) -> bool {
        index == question.reason_answer_index
    }

    fn record_miss(&self, tally: &mut WrongTagCounts, question: &NativeOrNotQuestion) {
        tally.record(question.tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::native_or_not::model::sample_question;
    use crate::games::native_or_not::NativeOrNotTag;

    #[test]
    fn test_next_difficulty_follows_streak() {
        let game = NativeOrNot::new();
        let mut round: RoundState<NativeOrNot> = RoundState::new();
        round.difficulty = NativeOrNotDifficulty::Easy;

        round.streak = 2;
        assert_eq!(game.next_difficulty(&round), NativeOrNotDifficulty::Easy);
        round.streak = 3;
        assert_eq!(game.next_difficulty(&round), NativeOrNotDifficulty::Normal);

        round.difficulty = NativeOrNotDifficulty::Expert;
        assert_eq!(game.next_difficulty(&round), NativeOrNotDifficulty::Expert);
    }

    #[test]
    fn test_choice_checks() {
        let game = NativeOrNot::new();
        let q = sample_question();
        assert_eq!(game.option_count(&q), 3);
        assert_eq!(game.reason_count(&q), 4);
        assert!(game.is_correct_option(&q, 0));
        assert!(!game.is_correct_option(&q, 1));
        assert!(game.is_correct_reason(&q, 2));
    }

    #[test]
    fn test_summarize() {
        let game = NativeOrNot::new();
        let mut round: RoundState<NativeOrNot> = RoundState::new();
        round.record_pick(true);
        round.record_pick(true);
        round.record_pick(false);
        game.record_miss(&mut round.tally, &sample_question());

        let details = game.summarize(&round);
        assert_eq!(details.correct_answers, 2);
        assert_eq!(details.highest_streak, 2);
        assert_eq!(details.weak_tag, Some(NativeOrNotTag::Collocation));
    }
}
