//! Immutable UI snapshots, one per transition.

use crate::core::{AnswerPhase, RetryTarget, Stage};
use crate::rules::Game;
use crate::scoring::ScoreBreakdown;
use crate::stats::RoundResult;

/// Round-level counters shown on every screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// "Question N of total".
    pub question_number: u32,
    pub total_questions: u32,
    pub total_score: i64,
    pub streak: u32,
    pub highest_streak: u32,
    pub correct_count: u32,
    pub bonus_used: bool,
}

/// A question on screen, with whatever the user has done to it so far.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionView<G: Game> {
    pub phase: AnswerPhase,
    pub question: G::Question,
    pub difficulty: G::Difficulty,
    pub is_bonus: bool,
    pub hint_used: bool,
    pub hint_text: Option<String>,
    pub selected_option: Option<usize>,
    pub selected_reason: Option<usize>,
    /// Known once the option pick is confirmed.
    pub option_correct: Option<bool>,
    /// Answer being graded (evaluating only).
    pub answer: Option<String>,
    pub progress: Progress,
}

impl<G: Game> QuestionView<G> {
    /// Whether confirming now would be accepted.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        match self.phase {
            AnswerPhase::Composing => true,
            AnswerPhase::SelectingOption => self.selected_option.is_some(),
            AnswerPhase::SelectingReason => self.selected_reason.is_some(),
        }
    }
}

/// Score breakdown (or explanation) for the question just finished.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackView<G: Game> {
    pub question: G::Question,
    pub difficulty: G::Difficulty,
    /// Collaborator grading; `None` for locally judged games.
    pub evaluation: Option<G::Evaluation>,
    pub breakdown: ScoreBreakdown,
    pub question_score: i64,
    pub elapsed_ms: u64,
    pub submitted: Option<String>,
    pub is_bonus: bool,
    pub hint_used: bool,
    pub hint_text: Option<String>,
    pub selected_option: Option<usize>,
    pub selected_reason: Option<usize>,
    pub option_correct: Option<bool>,
    pub reason_correct: Option<bool>,
    pub can_request_related: bool,
    pub progress: Progress,
}

/// What the UI should show. A new snapshot fully replaces the old one.
#[derive(Clone, Debug, PartialEq)]
pub enum Snapshot<G: Game> {
    Loading {
        message: String,
        /// Loading a related bonus question.
        bonus: bool,
        progress: Progress,
    },
    Error {
        message: String,
        retry: RetryTarget,
        progress: Progress,
    },
    Answering(QuestionView<G>),
    Evaluating(QuestionView<G>),
    Feedback(FeedbackView<G>),
    Completed {
        result: RoundResult<G::Details>,
        progress: Progress,
    },
}

impl<G: Game> Snapshot<G> {
    /// Stage this snapshot was published for.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Snapshot::Loading { bonus: false, .. } => Stage::LoadingQuestion,
            Snapshot::Loading { bonus: true, .. } => Stage::LoadingBonus,
            Snapshot::Error { .. } => Stage::Error,
            Snapshot::Answering(view) => Stage::Answering(view.phase),
            Snapshot::Evaluating(_) => Stage::Evaluating,
            Snapshot::Feedback(_) => Stage::Feedback,
            Snapshot::Completed { .. } => Stage::RoundCompleted,
        }
    }

    /// Question number and running totals, present in every stage.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        match self {
            Snapshot::Loading { progress, .. }
            | Snapshot::Error { progress, .. }
            | Snapshot::Completed { progress, .. } => progress,
            Snapshot::Answering(view) | Snapshot::Evaluating(view) => &view.progress,
            Snapshot::Feedback(view) => &view.progress,
        }
    }

    /// Question on screen, if any.
    #[must_use]
    pub fn question(&self) -> Option<&G::Question> {
        match self {
            Snapshot::Answering(view) | Snapshot::Evaluating(view) => Some(&view.question),
            Snapshot::Feedback(view) => Some(&view.question),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Snapshot::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&RoundResult<G::Details>> {
        match self {
            Snapshot::Completed { result, .. } => Some(result),
            _ => None,
        }
    }
}
