//! Game traits for round implementations.
//!
//! Games implement `Game` (plus `ComposeGame` or `ChoiceGame`) to define:
//! - Question and evaluation payloads
//! - Structural checks and local answer preconditions
//! - Scoring, difficulty progression and the round summary
//!
//! The round engine calls into these traits but never interprets
//! game-specific concepts directly.

pub mod game;

pub use game::{Assessment, ChoiceGame, ComposeGame, Exercise, Game, GameKind, Judgement};
