//! NativeOrNot: pick the sentence a native speaker would say, then pick why
//! the awkward one is off.
//!
//! - 5 regular questions; an optional related bonus question once per round
//! - Combo multiplier on correct picks (x1.5 from a streak of 3, x2 from 5)
//! - Questions get harder (at least `Normal`) while the streak is 3 or more
//! - The round summary names the most-missed tag

mod game;
mod model;
mod scoring;

pub use game::{NativeOrNot, NATIVE_OR_NOT_QUESTIONS};
pub use model::{
    NativeOrNotDetails, NativeOrNotDifficulty, NativeOrNotQuestion, NativeOrNotTag,
    WrongTagCounts, OPTION_COUNT, REASON_COUNT, STREAK_FOR_NORMAL,
};
pub use scoring::NativeOrNotScoring;
