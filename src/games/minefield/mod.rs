//! Minefield: answer a situational question in one sentence, using as
//! many of the given words as possible.
//!
//! - 4 questions per round, graded by the collaborator
//! - Required "mine" words (1 on Easy/Normal, 2 on Hard/Expert); leaving
//!   one out costs 50 points
//! - Question score is the three sub-scores plus bonuses, clamped to 0..=400
//! - A submission must use at least one listed word (checked locally)

mod game;
mod matcher;
mod model;
mod scoring;

pub use game::{Minefield, MINEFIELD_QUESTIONS};
pub use matcher::WordUsageMatcher;
pub use model::{MinefieldDifficulty, MinefieldEvaluation, MinefieldQuestion, MAX_WORDS, MIN_WORDS};
pub use scoring::MinefieldScoring;
