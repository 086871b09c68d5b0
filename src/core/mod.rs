//! Core round types: request tokens, stages, clocks, configuration, state.
//!
//! This module is game-agnostic. Each game plugs its question, evaluation and
//! scoring types in through the `Game` trait rather than modifying the core.

pub mod request;
pub mod stage;
pub mod clock;
pub mod config;
pub mod metrics;
pub mod state;

pub use request::{RequestArbiter, RequestToken};
pub use stage::{ActionResult, AnswerPhase, RetryTarget, Stage};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RoundConfig, DEFAULT_QUICK_BONUS_LIMIT_MS};
pub use metrics::{Metric, MetricSums};
pub use state::{QuestionState, RoundState, Signatures};
