//! Deterministic in-process collaborator.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::reply::{ExerciseService, Reply};
use crate::core::Signatures;
use crate::rules::{Exercise, Game};

/// When a [`ScriptedService`] completes replies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// Inside the service call.
    #[default]
    Immediate,
    /// Only when released with `release_next`/`release_all`.
    Held,
}

/// A call the service received, for assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceCall<G: Game> {
    InitializeCache,
    GenerateQuestion {
        difficulty: G::Difficulty,
        excluded: Signatures,
    },
    GenerateRelated {
        base_signature: String,
        excluded: Signatures,
    },
    EvaluateAnswer {
        question_signature: String,
        answer: String,
    },
}

type HeldReply = Box<dyn FnOnce() + Send>;

struct Script<G: Game> {
    dispatch: Dispatch,
    warmups: VecDeque<Result<(), String>>,
    questions: VecDeque<Result<G::Question, String>>,
    related: VecDeque<Result<G::Question, String>>,
    evaluations: VecDeque<Result<G::Evaluation, String>>,
    held: VecDeque<HeldReply>,
    calls: Vec<ServiceCall<G>>,
}

/// Collaborator that answers from queued results.
///
/// An empty warm-up queue answers `Ok(())`; every other empty queue answers
/// with a failure. Calls are recorded in order.
///
/// ```
/// use std::sync::Arc;
/// use round_engine::games::native_or_not::NativeOrNot;
/// use round_engine::service::{Dispatch, ScriptedService};
///
/// let service: Arc<ScriptedService<NativeOrNot>> = Arc::new(ScriptedService::with_dispatch(Dispatch::Held));
/// assert_eq!(service.pending(), 0);
/// ```
pub struct ScriptedService<G: Game> {
    script: Mutex<Script<G>>,
}

impl<G: Game> ScriptedService<G> {
    /// Service that answers inside each call.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dispatch(Dispatch::Immediate)
    }

    /// Service with the given reply timing.
    #[must_use]
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            script: Mutex::new(Script {
                dispatch,
                warmups: VecDeque::new(),
                questions: VecDeque::new(),
                related: VecDeque::new(),
                evaluations: VecDeque::new(),
                held: VecDeque::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Change reply timing for later calls. Already held replies stay held.
    pub fn set_dispatch(&self, dispatch: Dispatch) {
        self.script.lock().dispatch = dispatch;
    }

    // === Scripting ===

    /// Queue the outcome of the next cache warm-up.
    pub fn push_warmup(&self, outcome: Result<(), String>) {
        self.script.lock().warmups.push_back(outcome);
    }

    /// Queue a generated question.
    pub fn push_question(&self, question: G::Question) {
        self.script.lock().questions.push_back(Ok(question));
    }

    /// Queue a failed question generation.
    pub fn push_question_failure(&self, message: impl Into<String>) {
        self.script.lock().questions.push_back(Err(message.into()));
    }

    /// Queue a related bonus question.
    pub fn push_related(&self, question: G::Question) {
        self.script.lock().related.push_back(Ok(question));
    }

    /// Queue a failed related-question generation.
    pub fn push_related_failure(&self, message: impl Into<String>) {
        self.script.lock().related.push_back(Err(message.into()));
    }

    /// Queue an evaluation.
    pub fn push_evaluation(&self, evaluation: G::Evaluation) {
        self.script.lock().evaluations.push_back(Ok(evaluation));
    }

    /// Queue a failed evaluation.
    pub fn push_evaluation_failure(&self, message: impl Into<String>) {
        self.script.lock().evaluations.push_back(Err(message.into()));
    }

    // === Held replies ===

    /// Replies waiting for release.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.script.lock().held.len()
    }

    /// Complete the oldest held reply. Returns false if none was held.
    pub fn release_next(&self) -> bool {
        let next = self.script.lock().held.pop_front();
        match next {
            Some(fire) => {
                fire();
                true
            }
            None => false,
        }
    }

    /// Complete the newest held reply. Returns false if none was held.
    pub fn release_latest(&self) -> bool {
        let latest = self.script.lock().held.pop_back();
        match latest {
            Some(fire) => {
                fire();
                true
            }
            None => false,
        }
    }

    /// Complete every held reply, oldest first.
    pub fn release_all(&self) -> usize {
        let held: Vec<HeldReply> = self.script.lock().held.drain(..).collect();
        let count = held.len();
        for fire in held {
            fire();
        }
        count
    }

    // === Recorded calls ===

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall<G>> {
        self.script.lock().calls.clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.script.lock().calls.len()
    }

    /// Answers submitted for grading, in order.
    #[must_use]
    pub fn submitted_answers(&self) -> Vec<String> {
        self.script
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ServiceCall::EvaluateAnswer { answer, .. } => Some(answer.clone()),
                _ => None,
            })
            .collect()
    }

    fn respond<T: Send + 'static>(&self, reply: Reply<T>, outcome: Result<T, String>) {
        let mut script = self.script.lock();
        match script.dispatch {
            Dispatch::Held => script.held.push_back(Box::new(move || reply.complete(outcome))),
            Dispatch::Immediate => {
                drop(script);
                reply.complete(outcome);
            }
        }
    }
}

impl<G: Game> Default for ScriptedService<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> ExerciseService<G> for ScriptedService<G> {
    fn initialize_cache(&self, reply: Reply<()>) {
        let outcome = {
            let mut script = self.script.lock();
            script.calls.push(ServiceCall::InitializeCache);
            script.warmups.pop_front().unwrap_or(Ok(()))
        };
        self.respond(reply, outcome);
    }

    fn generate_question(
        &self,
        difficulty: G::Difficulty,
        excluded: Signatures,
        reply: Reply<G::Question>,
    ) {
        let outcome = {
            let mut script = self.script.lock();
            script.calls.push(ServiceCall::GenerateQuestion {
                difficulty,
                excluded,
            });
            script
                .questions
                .pop_front()
                .unwrap_or_else(|| Err("no scripted question left".to_string()))
        };
        self.respond(reply, outcome);
    }

    fn generate_related_question(
        &self,
        base: &G::Question,
        excluded: Signatures,
        reply: Reply<G::Question>,
    ) {
        let outcome = {
            let mut script = self.script.lock();
            script.calls.push(ServiceCall::GenerateRelated {
                base_signature: base.signature(),
                excluded,
            });
            script
                .related
                .pop_front()
                .unwrap_or_else(|| Err("no scripted related question left".to_string()))
        };
        self.respond(reply, outcome);
    }

    fn evaluate_answer(&self, question: &G::Question, answer: &str, reply: Reply<G::Evaluation>) {
        let outcome = {
            let mut script = self.script.lock();
            script.calls.push(ServiceCall::EvaluateAnswer {
                question_signature: question.signature(),
                answer: answer.to_string(),
            });
            script
                .evaluations
                .pop_front()
                .unwrap_or_else(|| Err("no scripted evaluation left".to_string()))
        };
        self.respond(reply, outcome);
    }
}
