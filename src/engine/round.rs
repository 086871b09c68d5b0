//! The round state machine.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::mailbox::{Delivery, Mailbox};
use super::observable::{Observable, SubscriptionId};
use super::snapshot::{FeedbackView, Progress, QuestionView, Snapshot};
use crate::core::{
    ActionResult, AnswerPhase, Clock, QuestionState, RequestArbiter, RetryTarget, RoundState, Stage,
    SystemClock,
};
use crate::rules::{Assessment, ChoiceGame, ComposeGame, Exercise, Game, Judgement};
use crate::scoring::{ScoreFacts, ScoringPolicy};
use crate::service::ExerciseService;
use crate::stats::{averages_for, RoundResult, StatsSink};

/// Drives one round of one game.
///
/// Single writer: every method takes `&mut self`, and collaborator replies
/// only reach the state through [`pump`](Self::pump) on the owning thread.
/// A reply is applied only if its request token is still the latest one
/// issued; anything older is dropped unseen.
///
/// Actions never block. They publish an intermediate snapshot, dispatch the
/// collaborator call, and return an [`ActionResult`].
pub struct RoundEngine<G: Game> {
    game: G,
    service: Arc<dyn ExerciseService<G>>,
    sink: Arc<dyn StatsSink<RoundResult<G::Details>>>,
    clock: Arc<dyn Clock>,
    arbiter: RequestArbiter,
    state: RoundState<G>,
    snapshots: Observable<Snapshot<G>>,
    mailbox: Mailbox<G>,
}

impl<G: Game> RoundEngine<G> {
    /// Create an engine for one round of `game`.
    ///
    /// Nothing is requested until [`initialize`](Self::initialize). The
    /// engine starts on a loading snapshot and uses the system clock.
    pub fn new(
        game: G,
        service: Arc<dyn ExerciseService<G>>,
        sink: Arc<dyn StatsSink<RoundResult<G::Details>>>,
    ) -> Self {
        let state = RoundState::new();
        let initial = Snapshot::Loading {
            message: game.config().loading_message.clone(),
            bonus: false,
            progress: Progress {
                question_number: 1,
                total_questions: game.config().total(),
                ..Progress::default()
            },
        };
        Self {
            game,
            service,
            sink,
            clock: Arc::new(SystemClock::new()),
            arbiter: RequestArbiter::new(),
            state,
            snapshots: Observable::new(initial),
            mailbox: Mailbox::new(),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // === Observation ===

    /// The game configuration this round plays.
    #[must_use]
    pub fn game(&self) -> &G {
        &self.game
    }

    /// Read-only view of the round state.
    #[must_use]
    pub fn state(&self) -> &RoundState<G> {
        &self.state
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot<G>> {
        self.snapshots.get()
    }

    /// Snapshots published so far.
    #[must_use]
    pub fn snapshot_version(&self) -> u64 {
        self.snapshots.version()
    }

    /// Called now with the latest snapshot, then on every publish.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&Arc<Snapshot<G>>) + Send + 'static,
    ) -> SubscriptionId {
        self.snapshots.subscribe(subscriber)
    }

    /// Drop a subscriber. Returns false if `id` was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.snapshots.unsubscribe(id)
    }

    // === Actions ===

    /// Start the round: warm the collaborator cache, then load a question.
    ///
    /// A second call is a no-op.
    pub fn initialize(&mut self, difficulty: G::Difficulty) -> ActionResult {
        if self.state.initialized {
            debug!(game = %G::KIND, "Ignoring repeated initialize");
            return ActionResult::None;
        }
        self.state.initialized = true;
        self.state.difficulty = difficulty;
        self.state.stage = Stage::LoadingQuestion;
        self.state.retry_target = RetryTarget::QuestionLoad;

        let token = self.arbiter.issue();
        debug!(game = %G::KIND, token = %token, difficulty = ?difficulty, "Warming up question cache");
        self.publish();

        let reply = self
            .mailbox
            .reply(move |outcome| Delivery::CacheReady { token, outcome });
        self.service.initialize_cache(reply);
        ActionResult::Advanced
    }

    /// Re-dispatch the retry target.
    ///
    /// After an evaluation failure the cached answer is resubmitted; after a
    /// bonus failure the related question is requested again; otherwise a
    /// fresh question is loaded. Any call still in flight is superseded.
    pub fn retry(&mut self) -> ActionResult {
        if !self.state.initialized {
            return ActionResult::None;
        }
        match self.state.stage {
            Stage::Answering(_) | Stage::Feedback | Stage::RoundCompleted => {
                return ActionResult::None;
            }
            Stage::LoadingQuestion | Stage::LoadingBonus | Stage::Evaluating | Stage::Error => {}
        }

        debug!(game = %G::KIND, target = ?self.state.retry_target, stage = %self.state.stage, "Retrying");
        match self.state.retry_target {
            RetryTarget::Evaluation => {
                let cached = self
                    .state
                    .pending_answer
                    .clone()
                    .filter(|answer| !answer.trim().is_empty());
                if let (Some(answer), true) = (cached, self.state.current.is_some()) {
                    self.dispatch_evaluation(answer);
                    return ActionResult::Advanced;
                }
            }
            RetryTarget::BonusLoad => {
                if self.state.bonus_base.is_some() {
                    self.load_question(true);
                    return ActionResult::Advanced;
                }
            }
            RetryTarget::QuestionLoad => {}
        }
        self.load_question(false);
        ActionResult::Advanced
    }

    /// Reveal the question's hint. Once per question, never on a bonus question.
    pub fn on_hint_requested(&mut self) -> ActionResult {
        let Some(phase) = G::HINT_PHASE else {
            return ActionResult::None;
        };
        if self.state.stage != Stage::Answering(phase) {
            return ActionResult::None;
        }
        let Some(current) = self.state.current.as_mut() else {
            return ActionResult::None;
        };
        if current.is_bonus || current.hint_used {
            return ActionResult::None;
        }

        current.hint_used = true;
        current.hint_text = current.question.hint().map(str::to_string);
        debug!(game = %G::KIND, "Hint revealed");
        self.publish();
        ActionResult::Updated
    }

    /// Leave feedback: finish the round or load the next question.
    pub fn on_next_from_feedback(&mut self) -> ActionResult {
        if self.state.stage != Stage::Feedback {
            return ActionResult::None;
        }
        if self.state.answered >= self.game.config().total() {
            self.complete();
            return ActionResult::Completed;
        }
        self.load_question(false);
        ActionResult::Advanced
    }

    /// Whether a related bonus question can be requested right now.
    #[must_use]
    pub fn can_request_related(&self) -> bool {
        G::OFFERS_BONUS
            && self.state.stage == Stage::Feedback
            && !self.state.bonus_used
            && self.state.current.as_ref().is_some_and(|q| !q.is_bonus)
    }

    // === Delivery ===

    /// Apply every reply that has arrived. Returns how many were taken,
    /// stale ones included.
    pub fn pump(&mut self) -> usize {
        let mut taken = 0;
        while let Some(delivery) = self.mailbox.try_next() {
            self.deliver(delivery);
            taken += 1;
        }
        taken
    }

    /// Wait up to `timeout` for a reply, then apply everything queued.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.mailbox.next_timeout(timeout) {
            Some(delivery) => {
                self.deliver(delivery);
                1 + self.pump()
            }
            None => 0,
        }
    }

    fn deliver(&mut self, delivery: Delivery<G>) {
        let token = delivery.token();
        if !self.arbiter.is_current(token) || !self.state.stage.is_waiting() {
            warn!(
                game = %G::KIND,
                token = %token,
                latest = ?self.arbiter.latest(),
                stage = %self.state.stage,
                "Dropping stale delivery"
            );
            return;
        }

        match delivery {
            Delivery::CacheReady { outcome: Ok(()), .. } => self.load_question(false),
            Delivery::CacheReady {
                outcome: Err(message),
                ..
            } => {
                warn!(game = %G::KIND, error = %message, "Cache warm-up failed");
                self.fail(message, RetryTarget::QuestionLoad);
            }
            Delivery::Question {
                bonus,
                difficulty,
                outcome,
                ..
            } => self.on_question(bonus, difficulty, outcome),
            Delivery::Evaluation {
                answer, outcome, ..
            } => self.on_evaluation(answer, outcome),
        }
    }

    // === Transitions ===

    fn load_question(&mut self, bonus: bool) {
        let base = if bonus {
            match self.state.bonus_base.clone() {
                Some(base) => Some(base),
                None => {
                    warn!(game = %G::KIND, "Bonus load without a base question");
                    return self.load_question(false);
                }
            }
        } else {
            self.state.bonus_base = None;
            None
        };

        self.state.current = None;
        self.state.pending_answer = None;
        self.state.error = None;
        let excluded = self.state.used_signatures.clone();
        let token = self.arbiter.issue();

        match base {
            Some(base) => {
                self.state.stage = Stage::LoadingBonus;
                self.state.retry_target = RetryTarget::BonusLoad;
                let difficulty = self.state.difficulty;
                debug!(game = %G::KIND, token = %token, excluded = excluded.len(), "Requesting related question");
                self.publish();

                let reply = self.mailbox.reply(move |outcome| Delivery::Question {
                    token,
                    bonus: true,
                    difficulty,
                    outcome,
                });
                self.service.generate_related_question(&base, excluded, reply);
            }
            None => {
                self.state.stage = Stage::LoadingQuestion;
                self.state.retry_target = RetryTarget::QuestionLoad;
                let difficulty = self.game.next_difficulty(&self.state);
                debug!(
                    game = %G::KIND,
                    token = %token,
                    difficulty = ?difficulty,
                    excluded = excluded.len(),
                    "Requesting question"
                );
                self.publish();

                let reply = self.mailbox.reply(move |outcome| Delivery::Question {
                    token,
                    bonus: false,
                    difficulty,
                    outcome,
                });
                self.service.generate_question(difficulty, excluded, reply);
            }
        }
    }

    fn on_question(
        &mut self,
        bonus: bool,
        difficulty: G::Difficulty,
        outcome: Result<G::Question, String>,
    ) {
        let target = if bonus {
            RetryTarget::BonusLoad
        } else {
            RetryTarget::QuestionLoad
        };
        let question = match outcome {
            Ok(question) => self.game.normalize(question, difficulty),
            Err(message) => {
                warn!(game = %G::KIND, error = %message, "Question generation failed");
                return self.fail(message, target);
            }
        };

        if let Err(e) = question.validate() {
            warn!(game = %G::KIND, error = %e, "Rejecting malformed question");
            let message = self.game.config().malformed_question_message.clone();
            return self.fail(message, target);
        }
        let signature = question.signature();
        if self.state.used_signatures.contains(&signature) {
            warn!(game = %G::KIND, signature = %signature, "Rejecting repeated question");
            let message = self.game.config().malformed_question_message.clone();
            return self.fail(message, target);
        }

        self.state.used_signatures.insert(signature);
        self.state.current = Some(QuestionState::new(question, bonus, self.clock.monotonic()));
        self.state.stage = Stage::Answering(G::ANSWER_PHASE);
        debug!(game = %G::KIND, bonus, used = self.state.used_signatures.len(), "Question shown");
        self.publish();
    }

    fn dispatch_evaluation(&mut self, answer: String) {
        if self.state.current.is_none() {
            let message = self.game.config().malformed_question_message.clone();
            return self.fail(message, RetryTarget::QuestionLoad);
        }

        self.state.stage = Stage::Evaluating;
        self.state.retry_target = RetryTarget::Evaluation;
        self.state.error = None;
        let token = self.arbiter.issue();
        debug!(game = %G::KIND, token = %token, "Requesting evaluation");
        self.publish();

        let tagged = answer.clone();
        let reply = self.mailbox.reply(move |outcome| Delivery::Evaluation {
            token,
            answer: tagged,
            outcome,
        });
        if let Some(current) = &self.state.current {
            self.service.evaluate_answer(&current.question, &answer, reply);
        }
    }

    fn on_evaluation(&mut self, answer: String, outcome: Result<G::Evaluation, String>) {
        let evaluation = match outcome {
            Ok(evaluation) => evaluation.normalized(),
            Err(message) => {
                warn!(game = %G::KIND, error = %message, "Evaluation failed");
                return self.fail(message, RetryTarget::Evaluation);
            }
        };
        if let Err(e) = evaluation.validate() {
            warn!(game = %G::KIND, error = %e, "Rejecting malformed evaluation");
            let message = self.game.config().malformed_evaluation_message.clone();
            return self.fail(message, RetryTarget::Evaluation);
        }

        let now = self.clock.monotonic();
        let quick_limit = self.game.config().quick_bonus_limit();
        let streak = self.state.streak;
        let Some(current) = self.state.current.as_mut() else {
            let message = self.game.config().malformed_question_message.clone();
            return self.fail(message, RetryTarget::QuestionLoad);
        };

        let elapsed = now.saturating_sub(current.shown_at);
        let facts = ScoreFacts::new(elapsed, quick_limit)
            .with_hint(current.hint_used)
            .with_streak(streak)
            .with_bonus_question(current.is_bonus);
        let breakdown = self
            .game
            .policy()
            .score(&current.question, &evaluation, &facts);

        for (metric, value) in evaluation.metrics() {
            self.state.metric_sums.add(metric, value);
        }
        self.state.total_score += breakdown.total();
        let question_score = breakdown.total();
        current.elapsed = elapsed;
        current.submitted = Some(answer);
        current.evaluation = Some(evaluation);
        current.breakdown = breakdown;

        let total = self.game.config().total();
        self.state.count_answered(total);
        self.state.stage = Stage::Feedback;
        debug!(
            game = %G::KIND,
            score = question_score,
            total_score = self.state.total_score,
            answered = self.state.answered,
            "Answer graded"
        );
        self.publish();
    }

    fn fail(&mut self, message: String, target: RetryTarget) {
        self.state.stage = Stage::Error;
        self.state.retry_target = target;
        self.state.error = Some(message);
        self.publish();
    }

    fn complete(&mut self) {
        let total = self.game.config().total();
        let answered = self.state.answered;
        let result = RoundResult {
            timestamp: self.clock.now_utc(),
            game: G::KIND,
            total_questions: total,
            answered,
            total_score: self.state.total_score,
            averages: averages_for(G::METRICS, &self.state.metric_sums, answered),
            details: self.game.summarize(&self.state),
        };

        self.state.stage = Stage::RoundCompleted;
        self.state.result = Some(result.clone());
        info!(
            game = %G::KIND,
            answered,
            total_score = result.total_score,
            "Round completed"
        );
        self.publish();
        self.sink.save_round_result(&result);
    }

    // === Snapshots ===

    fn publish(&mut self) {
        let snapshot = self.render();
        debug!(game = %G::KIND, stage = %snapshot.stage(), "Publishing snapshot");
        self.snapshots.set(snapshot);
    }

    fn progress(&self) -> Progress {
        let total = self.game.config().total();
        Progress {
            question_number: self.state.display_number(total),
            total_questions: total,
            total_score: self.state.total_score,
            streak: self.state.streak,
            highest_streak: self.state.highest_streak,
            correct_count: self.state.correct_count,
            bonus_used: self.state.bonus_used,
        }
    }

    fn render(&self) -> Snapshot<G> {
        let progress = self.progress();
        let missing = || Snapshot::Error {
            message: self.game.config().malformed_question_message.clone(),
            retry: RetryTarget::QuestionLoad,
            progress,
        };

        match self.state.stage {
            Stage::LoadingQuestion | Stage::LoadingBonus => Snapshot::Loading {
                message: self.game.config().loading_message.clone(),
                bonus: self.state.stage == Stage::LoadingBonus,
                progress,
            },
            Stage::Error => Snapshot::Error {
                message: self.state.error.clone().unwrap_or_default(),
                retry: self.state.retry_target,
                progress,
            },
            Stage::RoundCompleted => match &self.state.result {
                Some(result) => Snapshot::Completed {
                    result: result.clone(),
                    progress,
                },
                None => missing(),
            },
            Stage::Answering(phase) => match &self.state.current {
                Some(current) => Snapshot::Answering(self.question_view(phase, current, None, progress)),
                None => missing(),
            },
            Stage::Evaluating => match &self.state.current {
                Some(current) => Snapshot::Evaluating(self.question_view(
                    G::ANSWER_PHASE,
                    current,
                    self.state.pending_answer.clone(),
                    progress,
                )),
                None => missing(),
            },
            Stage::Feedback => match &self.state.current {
                Some(current) => Snapshot::Feedback(FeedbackView {
                    question: current.question.clone(),
                    difficulty: self.state.difficulty,
                    evaluation: current.evaluation.clone(),
                    breakdown: current.breakdown.clone(),
                    question_score: current.score(),
                    elapsed_ms: u64::try_from(current.elapsed.as_millis()).unwrap_or(u64::MAX),
                    submitted: current.submitted.clone(),
                    is_bonus: current.is_bonus,
                    hint_used: current.hint_used,
                    hint_text: current.hint_text.clone(),
                    selected_option: current.selected_option,
                    selected_reason: current.selected_reason,
                    option_correct: current.option_correct,
                    reason_correct: current.reason_correct,
                    can_request_related: self.can_request_related(),
                    progress,
                }),
                None => missing(),
            },
        }
    }

    fn question_view(
        &self,
        phase: AnswerPhase,
        current: &QuestionState<G>,
        answer: Option<String>,
        progress: Progress,
    ) -> QuestionView<G> {
        QuestionView {
            phase,
            question: current.question.clone(),
            difficulty: self.state.difficulty,
            is_bonus: current.is_bonus,
            hint_used: current.hint_used,
            hint_text: current.hint_text.clone(),
            selected_option: current.selected_option,
            selected_reason: current.selected_reason,
            option_correct: current.option_correct,
            answer,
            progress,
        }
    }
}

impl<G: ComposeGame> RoundEngine<G> {
    /// Submit a sentence for grading.
    ///
    /// `Invalid` if the trimmed text is empty or fails the game's local check
    /// (target words for Minefield, constraints for Refiner).
    pub fn on_submit_sentence(&mut self, sentence: &str) -> ActionResult {
        if self.state.stage != Stage::Answering(AnswerPhase::Composing) {
            return ActionResult::None;
        }
        let Some(current) = &self.state.current else {
            return ActionResult::None;
        };
        let trimmed = sentence.trim();
        if trimmed.is_empty() || !self.game.accepts(&current.question, trimmed) {
            debug!(game = %G::KIND, "Rejecting submission");
            return ActionResult::Invalid;
        }

        self.state.pending_answer = Some(trimmed.to_string());
        self.dispatch_evaluation(trimmed.to_string());
        ActionResult::Advanced
    }
}

impl<G: ChoiceGame> RoundEngine<G> {
    /// Highlight an option (phase 1).
    pub fn on_option_selected(&mut self, index: usize) -> ActionResult {
        if self.state.stage != Stage::Answering(AnswerPhase::SelectingOption) {
            return ActionResult::None;
        }
        let Some(current) = self.state.current.as_mut() else {
            return ActionResult::None;
        };
        if index >= self.game.option_count(&current.question) {
            return ActionResult::Invalid;
        }
        current.selected_option = Some(index);
        self.publish();
        ActionResult::Updated
    }

    /// Lock in the highlighted option.
    ///
    /// Regular questions count as answered here, update the streak and move
    /// to the reason pick. Bonus questions go straight to feedback.
    pub fn on_confirm_option(&mut self) -> ActionResult {
        if self.state.stage != Stage::Answering(AnswerPhase::SelectingOption) {
            return ActionResult::None;
        }
        let now = self.clock.monotonic();
        let (correct, is_bonus, hint_used, elapsed) = {
            let Some(current) = self.state.current.as_mut() else {
                return ActionResult::None;
            };
            let Some(index) = current.selected_option else {
                return ActionResult::Invalid;
            };
            let correct = self.game.is_correct_option(&current.question, index);
            current.option_correct = Some(correct);
            current.elapsed = now.saturating_sub(current.shown_at);
            (correct, current.is_bonus, current.hint_used, current.elapsed)
        };

        if !is_bonus {
            self.state.count_answered(self.game.config().total());
            self.state.record_pick(correct);
            if !correct {
                if let Some(current) = &self.state.current {
                    self.game.record_miss(&mut self.state.tally, &current.question);
                }
            }
        }

        let facts = ScoreFacts::new(elapsed, self.game.config().quick_bonus_limit())
            .with_hint(hint_used)
            .with_streak(self.state.streak)
            .with_bonus_question(is_bonus);
        self.score_judgement(Judgement::Pick { correct }, &facts);

        self.state.stage = if is_bonus {
            Stage::Feedback
        } else {
            Stage::Answering(AnswerPhase::SelectingReason)
        };
        debug!(
            game = %G::KIND,
            correct,
            bonus = is_bonus,
            streak = self.state.streak,
            total_score = self.state.total_score,
            "Option confirmed"
        );
        self.publish();
        ActionResult::Updated
    }

    /// Highlight a reason (phase 2).
    pub fn on_reason_selected(&mut self, index: usize) -> ActionResult {
        if self.state.stage != Stage::Answering(AnswerPhase::SelectingReason) {
            return ActionResult::None;
        }
        let Some(current) = self.state.current.as_mut() else {
            return ActionResult::None;
        };
        if index >= self.game.reason_count(&current.question) {
            return ActionResult::Invalid;
        }
        current.selected_reason = Some(index);
        self.publish();
        ActionResult::Updated
    }

    /// Lock in the highlighted reason and show the explanation.
    pub fn on_confirm_reason(&mut self) -> ActionResult {
        if self.state.stage != Stage::Answering(AnswerPhase::SelectingReason) {
            return ActionResult::None;
        }
        let (correct, elapsed, hint_used, is_bonus) = {
            let Some(current) = self.state.current.as_mut() else {
                return ActionResult::None;
            };
            let Some(index) = current.selected_reason else {
                return ActionResult::Invalid;
            };
            let correct = self.game.is_correct_reason(&current.question, index);
            current.reason_correct = Some(correct);
            (correct, current.elapsed, current.hint_used, current.is_bonus)
        };

        let facts = ScoreFacts::new(elapsed, self.game.config().quick_bonus_limit())
            .with_hint(hint_used)
            .with_streak(self.state.streak)
            .with_bonus_question(is_bonus);
        self.score_judgement(Judgement::Reason { correct }, &facts);

        self.state.stage = Stage::Feedback;
        debug!(game = %G::KIND, correct, total_score = self.state.total_score, "Reason confirmed");
        self.publish();
        ActionResult::Updated
    }

    /// Ask for one related bonus question. At most once per round, only from
    /// the explanation of a regular question.
    pub fn on_request_related_question(&mut self) -> ActionResult {
        if !self.can_request_related() {
            return ActionResult::None;
        }
        let Some(base) = self.state.current.as_ref().map(|q| q.question.clone()) else {
            return ActionResult::None;
        };
        self.state.bonus_used = true;
        self.state.bonus_base = Some(base);
        self.load_question(true);
        ActionResult::Advanced
    }

    fn score_judgement(&mut self, judgement: Judgement, facts: &ScoreFacts) {
        let Some(current) = self.state.current.as_mut() else {
            return;
        };
        let policy = self.game.policy();
        let event = policy.terms(&current.question, &judgement, facts);
        self.state.total_score += current.breakdown.absorb(event, policy.clamp());
        // The feedback screen reports the option pick; the reason outcome
        // lives in `reason_correct`.
        if matches!(judgement, Judgement::Pick { .. }) {
            current.evaluation = Some(judgement);
        }
    }
}

impl<G: Game> std::fmt::Debug for RoundEngine<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEngine")
            .field("game", &self.game)
            .field("stage", &self.state.stage)
            .field("latest_request", &self.arbiter.latest())
            .field("answered", &self.state.answered)
            .field("total_score", &self.state.total_score)
            .finish()
    }
}
