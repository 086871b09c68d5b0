//! Minefield round tests.
//!
//! These tests drive whole rounds through a scripted collaborator:
//! - Scoring and averaging over a full round
//! - Local submit checks
//! - Error stages and retry targets

use std::sync::Arc;
use std::time::Duration;

use round_engine::core::{ActionResult, AnswerPhase, ManualClock, Metric, RetryTarget, Stage};
use round_engine::engine::{RoundEngine, Snapshot};
use round_engine::games::minefield::{
    Minefield, MinefieldDifficulty, MinefieldEvaluation, MinefieldQuestion,
};
use round_engine::rules::{Exercise, Game};
use round_engine::scoring::TermKind;
use round_engine::service::{ScriptedService, ServiceCall};
use round_engine::stats::{RecentResultsStore, RoundResult};

type Store = RecentResultsStore<RoundResult<()>>;

struct Harness {
    engine: RoundEngine<Minefield>,
    service: Arc<ScriptedService<Minefield>>,
    store: Arc<Store>,
    clock: ManualClock,
}

fn harness() -> Harness {
    let service = Arc::new(ScriptedService::new());
    let store = Arc::new(Store::new());
    let clock = ManualClock::new();
    let engine = RoundEngine::new(Minefield::new(), service.clone(), store.clone())
        .with_clock(Arc::new(clock.clone()));
    Harness {
        engine,
        service,
        store,
        clock,
    }
}

fn question(n: u32) -> MinefieldQuestion {
    MinefieldQuestion::new(
        format!("Cafe visit #{n}"),
        "What would you order?",
        ["coffee", "croissant", "please", "would", "like", "warm"],
        [0, 1],
        MinefieldDifficulty::Easy,
    )
}

fn evaluation(grammar: i64, naturalness: i64, usage: i64) -> MinefieldEvaluation {
    MinefieldEvaluation {
        grammar_score: grammar,
        naturalness_score: naturalness,
        word_usage_score: usage,
        used_word_count: 3,
        total_word_count: 6,
        used_words: vec!["coffee".into(), "would".into(), "like".into()],
        strengths_comment: "Natural request.".into(),
        improvement_comment: "Try the croissant too.".into(),
        improved_sentence: "I would like a coffee and a warm croissant, please.".into(),
        example_basic: "Coffee, please.".into(),
        example_intermediate: "I'd like a coffee, please.".into(),
        example_advanced: "Could I get a coffee and a warm croissant?".into(),
        ..MinefieldEvaluation::default()
    }
}

/// Test a full round with slow answers: 155 per question, four questions.
#[test]
fn test_full_round_scores_and_averages() {
    let mut h = harness();
    for n in 0..4 {
        h.service.push_question(question(n));
        h.service.push_evaluation(evaluation(50, 50, 55));
    }

    assert_eq!(h.engine.initialize(MinefieldDifficulty::Easy), ActionResult::Advanced);
    h.engine.pump();

    for n in 0..4 {
        assert_eq!(h.engine.stage(), Stage::Answering(AnswerPhase::Composing));
        assert_eq!(h.engine.snapshot().progress().question_number, n + 1);

        h.clock.advance(Duration::from_secs(75));
        assert_eq!(
            h.engine.on_submit_sentence("  I would like a coffee  "),
            ActionResult::Advanced
        );
        assert_eq!(h.engine.stage(), Stage::Evaluating);
        h.engine.pump();

        let snapshot = h.engine.snapshot();
        let Snapshot::Feedback(feedback) = snapshot.as_ref() else {
            panic!("expected feedback, got {:?}", snapshot.stage());
        };
        assert_eq!(feedback.question_score, 155);
        assert_eq!(feedback.breakdown.points(TermKind::Quick), 0);
        assert_eq!(feedback.elapsed_ms, 75_000);
        assert_eq!(feedback.submitted.as_deref(), Some("I would like a coffee"));

        let expected = if n == 3 {
            ActionResult::Completed
        } else {
            ActionResult::Advanced
        };
        assert_eq!(h.engine.on_next_from_feedback(), expected);
        h.engine.pump();
    }

    assert_eq!(h.engine.stage(), Stage::RoundCompleted);
    let result = h.engine.snapshot().result().cloned().unwrap();
    assert_eq!(result.total_score, 620);
    assert_eq!(result.answered, 4);
    assert_eq!(result.total_questions, 4);
    assert_eq!(result.average(Metric::Grammar), Some(50));
    assert_eq!(result.average(Metric::Naturalness), Some(50));
    assert_eq!(result.average(Metric::WordUsage), Some(55));
    assert_eq!(result.average(Metric::Lexical), None);

    assert_eq!(h.store.len(), 1);
    assert_eq!(h.store.latest(), Some(result));
}

/// Test that every bonus is applied and the question score is capped.
#[test]
fn test_quick_answer_with_every_bonus() {
    let mut h = harness();
    h.service.push_question(question(0));
    let mut perfect = evaluation(100, 100, 100);
    perfect.used_word_count = 6;
    perfect.advanced_transform_used = true;
    h.service.push_evaluation(perfect);

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();
    h.clock.advance(Duration::from_secs(60));
    h.engine.on_submit_sentence("I would like a warm croissant and coffee, please");
    h.engine.pump();

    let Snapshot::Feedback(feedback) = h.engine.snapshot().as_ref().clone() else {
        panic!("expected feedback");
    };
    assert_eq!(feedback.breakdown.points(TermKind::Quick), 30);
    assert_eq!(feedback.breakdown.points(TermKind::AllWordsUsed), 50);
    assert_eq!(feedback.breakdown.points(TermKind::AdvancedTransform), 20);
    assert_eq!(feedback.question_score, 400);
}

/// Test that the mine penalty cannot push a question below zero.
#[test]
fn test_missed_mine_floors_at_zero() {
    let mut h = harness();
    h.service.push_question(question(0));
    let mut weak = evaluation(10, 10, 10);
    weak.missing_required_words = vec!["croissant".into()];
    h.service.push_evaluation(weak);

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();
    h.clock.advance(Duration::from_secs(90));
    h.engine.on_submit_sentence("coffee");
    h.engine.pump();

    assert_eq!(h.engine.state().total_score, 0);
    assert_eq!(h.engine.state().answered, 1);
}

/// Test local rejection of empty and off-topic sentences.
#[test]
fn test_invalid_submissions() {
    let mut h = harness();
    h.service.push_question(question(0));

    assert_eq!(h.engine.on_submit_sentence("coffee"), ActionResult::None);

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();

    assert_eq!(h.engine.on_submit_sentence("   "), ActionResult::Invalid);
    assert_eq!(h.engine.on_submit_sentence("Tea for two."), ActionResult::Invalid);
    assert_eq!(h.engine.stage(), Stage::Answering(AnswerPhase::Composing));
    assert!(h.service.submitted_answers().is_empty());
}

/// Test that questions are normalized to the round difficulty.
#[test]
fn test_question_normalized_to_round_difficulty() {
    let mut h = harness();
    h.service.push_question(question(0));

    h.engine.initialize(MinefieldDifficulty::Hard);
    h.engine.pump();

    let current = h.engine.state().current.as_ref().unwrap();
    assert_eq!(current.question.difficulty, MinefieldDifficulty::Hard);
    assert_eq!(current.question.required_word_indices, vec![0, 1]);
    assert!(matches!(
        h.service.calls()[1],
        ServiceCall::GenerateQuestion {
            difficulty: MinefieldDifficulty::Hard,
            ..
        }
    ));
}

/// Test a Hard question with a single mine is malformed.
#[test]
fn test_malformed_question_is_an_error() {
    let mut h = harness();
    let mut one_mine = question(0);
    one_mine.required_word_indices = vec![2];
    h.service.push_question(one_mine);
    h.service.push_question(question(1));

    h.engine.initialize(MinefieldDifficulty::Hard);
    h.engine.pump();

    assert_eq!(h.engine.stage(), Stage::Error);
    let snapshot = h.engine.snapshot();
    assert_eq!(
        snapshot.error_message(),
        Some(h.engine.game().config().malformed_question_message.as_str())
    );
    assert_eq!(h.engine.state().retry_target, RetryTarget::QuestionLoad);

    assert_eq!(h.engine.retry(), ActionResult::Advanced);
    h.engine.pump();
    assert_eq!(h.engine.stage(), Stage::Answering(AnswerPhase::Composing));
}

/// Test that a failed evaluation retries with the same cached sentence.
#[test]
fn test_evaluation_failure_retries_same_answer() {
    let mut h = harness();
    h.service.push_question(question(0));
    h.service.push_evaluation_failure("quota exceeded");
    h.service.push_evaluation(evaluation(60, 60, 60));

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();
    h.engine.on_submit_sentence("I would like a coffee");
    h.engine.pump();

    assert_eq!(h.engine.stage(), Stage::Error);
    assert_eq!(h.engine.snapshot().error_message(), Some("quota exceeded"));
    assert_eq!(h.engine.state().retry_target, RetryTarget::Evaluation);

    assert_eq!(h.engine.retry(), ActionResult::Advanced);
    h.engine.pump();

    assert_eq!(h.engine.stage(), Stage::Feedback);
    assert_eq!(
        h.service.submitted_answers(),
        vec!["I would like a coffee", "I would like a coffee"]
    );
}

/// Test that a malformed evaluation keeps the evaluation retry target.
#[test]
fn test_malformed_evaluation() {
    let mut h = harness();
    h.service.push_question(question(0));
    let mut broken = evaluation(60, 60, 60);
    broken.total_word_count = 0;
    broken.used_word_count = 0;
    h.service.push_evaluation(broken);

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();
    h.engine.on_submit_sentence("coffee please");
    h.engine.pump();

    assert_eq!(h.engine.stage(), Stage::Error);
    assert_eq!(h.engine.state().retry_target, RetryTarget::Evaluation);
    assert_eq!(
        h.engine.snapshot().error_message(),
        Some(h.engine.game().config().malformed_evaluation_message.as_str())
    );
    assert_eq!(h.engine.state().answered, 0);
}

/// Test that a warm-up failure offers a question-load retry.
#[test]
fn test_warmup_failure() {
    let mut h = harness();
    h.service.push_warmup(Err("cache offline".to_string()));
    h.service.push_question(question(0));

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();

    assert_eq!(h.engine.stage(), Stage::Error);
    assert!(matches!(
        h.engine.snapshot().as_ref(),
        Snapshot::Error {
            retry: RetryTarget::QuestionLoad,
            ..
        }
    ));

    h.engine.retry();
    h.engine.pump();
    assert_eq!(h.engine.stage(), Stage::Answering(AnswerPhase::Composing));
}

/// Test that shown signatures are excluded from later requests and that a
/// repeated question is rejected.
#[test]
fn test_signatures_excluded_and_repeats_rejected() {
    let mut h = harness();
    h.service.push_question(question(0));
    h.service.push_evaluation(evaluation(50, 50, 50));
    h.service.push_question(question(0));

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();
    h.engine.on_submit_sentence("coffee");
    h.engine.pump();
    h.engine.on_next_from_feedback();
    h.engine.pump();

    let signature = question(0).normalized_for(MinefieldDifficulty::Easy).signature();
    let excluded: Vec<_> = h
        .service
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ServiceCall::GenerateQuestion { excluded, .. } => Some(excluded),
            _ => None,
        })
        .collect();
    assert_eq!(excluded.len(), 2);
    assert!(excluded[0].is_empty());
    assert!(excluded[1].contains(&signature));

    assert_eq!(h.engine.stage(), Stage::Error);
    assert_eq!(h.engine.state().used_signatures.len(), 1);
}

/// Test that `initialize` only acts once.
#[test]
fn test_initialize_twice() {
    let mut h = harness();
    h.service.push_question(question(0));

    assert_eq!(h.engine.initialize(MinefieldDifficulty::Easy), ActionResult::Advanced);
    assert_eq!(h.engine.initialize(MinefieldDifficulty::Hard), ActionResult::None);
    h.engine.pump();

    assert_eq!(h.engine.state().difficulty, MinefieldDifficulty::Easy);
    assert_eq!(
        h.service
            .calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::InitializeCache))
            .count(),
        1
    );
}

/// Test retry is a no-op where nothing is outstanding.
#[test]
fn test_retry_outside_error_states() {
    let mut h = harness();
    h.service.push_question(question(0));

    assert_eq!(h.engine.retry(), ActionResult::None);

    h.engine.initialize(MinefieldDifficulty::Easy);
    h.engine.pump();
    assert_eq!(h.engine.retry(), ActionResult::None);
    assert_eq!(h.engine.on_hint_requested(), ActionResult::None);
}
