//! Refiner round tests.
//!
//! These tests cover the hint flow, constraint checks on submit, level-based
//! scoring and the four-metric averages.

use std::sync::Arc;
use std::time::Duration;

use round_engine::core::{ActionResult, AnswerPhase, ManualClock, Metric, Stage};
use round_engine::engine::{RoundEngine, Snapshot};
use round_engine::games::refiner::{
    LevelExample, Refiner, RefinerConstraints, RefinerDifficulty, RefinerEvaluation,
    RefinerLevel, RefinerQuestion, WordLimit, REFINER_QUESTIONS,
};
use round_engine::scoring::TermKind;
use round_engine::service::ScriptedService;
use round_engine::stats::{RecentResultsStore, RoundResult};

type Store = RecentResultsStore<RoundResult<()>>;

fn setup() -> (
    RoundEngine<Refiner>,
    Arc<ScriptedService<Refiner>>,
    Arc<Store>,
    ManualClock,
) {
    let service = Arc::new(ScriptedService::new());
    let store = Arc::new(Store::new());
    let clock = ManualClock::new();
    let engine = RoundEngine::new(Refiner::new(), service.clone(), store.clone())
        .with_clock(Arc::new(clock.clone()));
    (engine, service, store, clock)
}

fn question(n: u32) -> RefinerQuestion {
    RefinerQuestion::new(
        format!("I want coffee now #{n}."),
        "Polite request to a barista",
        RefinerConstraints::new(["want"], Some(WordLimit::max(8)), ""),
        "Try a modal verb like 'could'.",
        RefinerDifficulty::Easy,
    )
}

fn question_with_required_word() -> RefinerQuestion {
    RefinerQuestion::new(
        "The meeting is moved.",
        "Formal email to a client",
        RefinerConstraints::new(Vec::<String>::new(), None, "reschedule"),
        "Think about who moved it.",
        RefinerDifficulty::Hard,
    )
}

fn evaluation(level: RefinerLevel) -> RefinerEvaluation {
    RefinerEvaluation {
        level,
        lexical_score: 70,
        syntax_score: 80,
        naturalness_score: 75,
        compliance_score: 90,
        creative_required_word_use: false,
        insight: "Polite and concise.".to_string(),
        level_examples: RefinerLevel::EXAMPLE_LEVELS
            .into_iter()
            .map(|l| LevelExample::new(l, format!("{} sentence", l.name()), "why"))
            .collect(),
    }
}

/// Test the hint is revealed once and costs points at grading.
#[test]
fn test_hint_once_and_penalized() {
    let (mut engine, service, _store, clock) = setup();
    service.push_question(question(0));
    service.push_evaluation(evaluation(RefinerLevel::B1));

    engine.initialize(RefinerDifficulty::Easy);
    engine.pump();

    assert_eq!(engine.on_hint_requested(), ActionResult::Updated);
    assert_eq!(engine.on_hint_requested(), ActionResult::None);
    let Snapshot::Answering(view) = engine.snapshot().as_ref().clone() else {
        panic!("expected answering");
    };
    assert!(view.hint_used);
    assert_eq!(view.hint_text.as_deref(), Some("Try a modal verb like 'could'."));

    clock.advance(Duration::from_secs(90));
    assert_eq!(
        engine.on_submit_sentence("Could I get a coffee, please?"),
        ActionResult::Advanced
    );
    engine.pump();

    let Snapshot::Feedback(feedback) = engine.snapshot().as_ref().clone() else {
        panic!("expected feedback");
    };
    assert_eq!(feedback.breakdown.points(TermKind::LevelBase), 200);
    assert_eq!(feedback.breakdown.points(TermKind::HintUsed), -30);
    assert_eq!(feedback.breakdown.points(TermKind::NoHint), 0);
    assert_eq!(feedback.question_score, 170);
    assert!(feedback.hint_used);
}

/// Test the hint is unavailable outside the composing phase.
#[test]
fn test_hint_only_while_composing() {
    let (mut engine, service, _store, _clock) = setup();
    service.set_dispatch(round_engine::service::Dispatch::Held);
    service.push_question(question(0));

    assert_eq!(engine.on_hint_requested(), ActionResult::None);
    engine.initialize(RefinerDifficulty::Easy);
    service.release_all();
    engine.pump();
    service.release_all();
    engine.pump();
    assert_eq!(engine.stage(), Stage::Answering(AnswerPhase::Composing));

    engine.on_submit_sentence("Could I get a coffee?");
    assert_eq!(engine.stage(), Stage::Evaluating);
    assert_eq!(engine.on_hint_requested(), ActionResult::None);
}

/// Test that a quick answer without a hint earns both bonuses.
#[test]
fn test_quick_without_hint() {
    let (mut engine, service, _store, clock) = setup();
    service.push_question(question(0));
    service.push_evaluation(evaluation(RefinerLevel::B1));

    engine.initialize(RefinerDifficulty::Easy);
    engine.pump();
    clock.advance(Duration::from_secs(20));
    engine.on_submit_sentence("Could I get a coffee?");
    engine.pump();

    assert_eq!(engine.state().total_score, 270);
}

/// Test submissions that break a constraint never reach the collaborator.
#[test]
fn test_constraint_violations_are_invalid() {
    let (mut engine, service, _store, _clock) = setup();
    service.push_question(question(0));

    engine.initialize(RefinerDifficulty::Easy);
    engine.pump();

    assert_eq!(engine.on_submit_sentence(""), ActionResult::Invalid);
    assert_eq!(
        engine.on_submit_sentence("I really want a coffee."),
        ActionResult::Invalid
    );
    assert_eq!(
        engine.on_submit_sentence("Would it be possible for me to get one coffee please?"),
        ActionResult::Invalid
    );
    assert_eq!(engine.stage(), Stage::Answering(AnswerPhase::Composing));
    assert!(service.submitted_answers().is_empty());
}

/// Test the required word gates submission and the creative bonus applies.
#[test]
fn test_required_word_and_creative_bonus() {
    let (mut engine, service, _store, clock) = setup();
    service.push_question(question_with_required_word());
    let mut graded = evaluation(RefinerLevel::C1);
    graded.creative_required_word_use = true;
    service.push_evaluation(graded);

    engine.initialize(RefinerDifficulty::Hard);
    engine.pump();

    assert_eq!(
        engine.on_submit_sentence("We moved the meeting."),
        ActionResult::Invalid
    );
    clock.advance(Duration::from_secs(45));
    assert_eq!(
        engine.on_submit_sentence("We had to reschedule the meeting."),
        ActionResult::Advanced
    );
    engine.pump();

    let Snapshot::Feedback(feedback) = engine.snapshot().as_ref().clone() else {
        panic!("expected feedback");
    };
    assert_eq!(feedback.breakdown.points(TermKind::CreativeWordUse), 30);
    assert_eq!(feedback.question_score, 350 + 50 + 20 + 30);
}

/// Test an evaluation missing a level example is rejected.
#[test]
fn test_missing_level_example() {
    let (mut engine, service, _store, _clock) = setup();
    service.push_question(question(0));
    let mut graded = evaluation(RefinerLevel::B2);
    graded.level_examples.retain(|e| e.level != RefinerLevel::C2);
    service.push_evaluation(graded);

    engine.initialize(RefinerDifficulty::Easy);
    engine.pump();
    engine.on_submit_sentence("Could I get a coffee?");
    engine.pump();

    assert_eq!(engine.stage(), Stage::Error);
    assert_eq!(engine.state().answered, 0);
    assert_eq!(engine.state().total_score, 0);
}

/// Test a full round stores rounded averages of all four metrics.
#[test]
fn test_full_round_averages() {
    let (mut engine, service, store, clock) = setup();
    for n in 0..REFINER_QUESTIONS {
        service.push_question(question(n));
        let mut graded = evaluation(RefinerLevel::A2);
        graded.lexical_score = if n % 2 == 0 { 70 } else { 71 };
        service.push_evaluation(graded);
    }

    engine.initialize(RefinerDifficulty::Easy);
    engine.pump();
    for _ in 0..REFINER_QUESTIONS {
        clock.advance(Duration::from_secs(120));
        assert_eq!(
            engine.on_submit_sentence("Could I get a coffee?"),
            ActionResult::Advanced
        );
        engine.pump();
        engine.on_next_from_feedback();
        engine.pump();
    }

    assert_eq!(engine.stage(), Stage::RoundCompleted);
    let result = store.latest().unwrap();
    assert_eq!(result.answered, REFINER_QUESTIONS);
    assert_eq!(result.total_score, 5 * (150 + 50));
    // (70 * 3 + 71 * 2) / 5 = 70.4
    assert_eq!(result.average(Metric::Lexical), Some(70));
    assert_eq!(result.average(Metric::Syntax), Some(80));
    assert_eq!(result.average(Metric::Naturalness), Some(75));
    assert_eq!(result.average(Metric::Compliance), Some(90));
    assert_eq!(result.average(Metric::Grammar), None);
}
