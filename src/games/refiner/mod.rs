//! Refiner: rewrite a plain sentence for a given style, obeying up to two
//! constraints (banned words, a word limit, a required word).
//!
//! The collaborator grades the rewrite at a CEFR level; the level sets the
//! base score. One hint per question is available and costs points.

mod game;
mod model;
mod scoring;
mod validator;

pub use game::{Refiner, REFINER_QUESTIONS};
pub use model::{
    LevelExample, RefinerConstraints, RefinerDifficulty, RefinerEvaluation, RefinerLevel,
    RefinerQuestion, WordLimit, WordLimitMode,
};
pub use scoring::RefinerScoring;
pub use validator::{ConstraintReport, ConstraintValidator};
