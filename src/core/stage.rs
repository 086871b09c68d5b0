//! Round stages, retry targets and action results.

use serde::{Deserialize, Serialize};

/// Sub-state of [`Stage::Answering`].
///
/// Free-text games stay in `Composing`. Choice games walk
/// `SelectingOption` then `SelectingReason`; their explanation step is
/// [`Stage::Feedback`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerPhase {
    /// Writing a sentence.
    Composing,
    /// Picking the natural option (phase 1).
    SelectingOption,
    /// Picking why the awkward option is awkward (phase 2).
    SelectingReason,
}

/// Node of the round state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Waiting for the cache warm-up or a regular question.
    LoadingQuestion,
    /// Waiting for a related bonus question.
    LoadingBonus,
    /// A question is on screen and accepts input.
    Answering(AnswerPhase),
    /// Waiting for the service to grade a submitted answer.
    Evaluating,
    /// Score breakdown (or explanation) for the current question.
    Feedback,
    /// The round summary has been produced. Terminal.
    RoundCompleted,
    /// An async step failed; see the retry target.
    Error,
}

impl Stage {
    /// Whether a service call is outstanding in this stage.
    #[must_use]
    pub fn is_waiting(self) -> bool {
        matches!(self, Stage::LoadingQuestion | Stage::LoadingBonus | Stage::Evaluating)
    }

    /// Whether the round is over.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Stage::RoundCompleted
    }

    /// Stable uppercase label, handy for logs and UI mapping.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::LoadingQuestion => "LOADING_QUESTION",
            Stage::LoadingBonus => "LOADING_BONUS",
            Stage::Answering(AnswerPhase::Composing) => "ANSWERING",
            Stage::Answering(AnswerPhase::SelectingOption) => "PHASE1_SELECTING",
            Stage::Answering(AnswerPhase::SelectingReason) => "PHASE2_REASON",
            Stage::Evaluating => "EVALUATING",
            Stage::Feedback => "FEEDBACK",
            Stage::RoundCompleted => "ROUND_COMPLETED",
            Stage::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What `retry()` re-dispatches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryTarget {
    /// Generate a regular question again.
    #[default]
    QuestionLoad,
    /// Generate the related bonus question again.
    BonusLoad,
    /// Resubmit the cached answer for grading.
    Evaluation,
}

/// Outcome tag returned by every user action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionResult {
    /// Not applicable in the current stage; nothing changed.
    None,
    /// Local state changed; a new snapshot was published.
    Updated,
    /// An async step was dispatched.
    Advanced,
    /// The round finished.
    Completed,
    /// The input was rejected (empty, unmet constraint, missing selection).
    Invalid,
}
