//! The generic round engine.
//!
//! One [`RoundEngine`] drives one round of any [`Game`](crate::rules::Game):
//!
//! ```text
//! LoadingQuestion → Answering → Evaluating → Feedback → { LoadingQuestion | RoundCompleted }
//! ```
//!
//! with `Error` reachable from every asynchronous step. Choice games split
//! `Answering` into option and reason phases and may take one detour through
//! `LoadingBonus` from `Feedback`.
//!
//! ## Threading
//!
//! Collaborator replies may complete on any thread. They are queued in the
//! engine's mailbox and applied by [`RoundEngine::pump`] on the thread that
//! owns the engine, so the round state has exactly one writer.
//!
//! ## Snapshots
//!
//! Every transition publishes a fresh [`Snapshot`]. The latest snapshot is
//! authoritative; subscribers never need to diff.

mod mailbox;
mod observable;
mod round;
mod snapshot;

pub use observable::{Observable, SubscriptionId};
pub use round::RoundEngine;
pub use snapshot::{FeedbackView, Progress, QuestionView, Snapshot};
