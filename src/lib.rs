//! # round-engine
//!
//! A round engine for short language-drill exercise games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic Core**: Stages, request arbitration, scoring mechanics
//!    and aggregation know nothing about a particular game. Games plug in
//!    their payloads and formulas through the `Game` traits.
//!
//! 2. **Latest Request Wins**: Every collaborator call is tagged with a
//!    monotonically increasing token. A reply whose token is no longer the
//!    latest is dropped without touching state.
//!
//! 3. **Single Writer**: Replies complete on any thread but are applied on
//!    the engine's thread. UI observers only ever see immutable snapshots.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The anti-repeat signature set is an
//!   `im` set, so every generation request gets its own copy in O(1).
//!
//! - **Itemized Scores**: Every question score is a list of named terms plus
//!   a clamp, so feedback screens can show each bonus and penalty.
//!
//! ## Modules
//!
//! - `core`: Request tokens, stages, clocks, configuration, round state
//! - `rules`: Game traits for the three variants
//! - `scoring`: Scoring policy trait, score terms and breakdowns
//! - `service`: Collaborator contract and a scripted in-process collaborator
//! - `engine`: The generic round state machine and its snapshot stream
//! - `stats`: Round results, aggregation and result stores
//! - `games`: Minefield, Refiner and NativeOrNot
//! - `error`: Validation and persistence errors
//! - `logging`: Tracing subscriber setup

pub mod core;
pub mod rules;
pub mod scoring;
pub mod service;
pub mod engine;
pub mod stats;
pub mod games;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{
    RequestArbiter, RequestToken,
    ActionResult, AnswerPhase, RetryTarget, Stage,
    Clock, ManualClock, SystemClock,
    RoundConfig, Metric, MetricSums,
    QuestionState, RoundState, Signatures,
};

pub use crate::rules::{Assessment, ChoiceGame, ComposeGame, Exercise, Game, GameKind, Judgement};

pub use crate::scoring::{
    combo_multiplier, ScoreBreakdown, ScoreClamp, ScoreFacts, ScoreTerm, ScoringPolicy, TermKind,
};

pub use crate::service::{Dispatch, ExerciseService, Reply, ScriptedService, ServiceCall};

pub use crate::engine::{FeedbackView, Observable, Progress, QuestionView, RoundEngine, Snapshot, SubscriptionId};

pub use crate::stats::{
    MetricAverage, RoundResult,
    StatsSink, RecentResultsStore, JsonFileStore,
};

pub use crate::games::{Minefield, NativeOrNot, Refiner};

pub use crate::error::{StoreError, ValidationError};
