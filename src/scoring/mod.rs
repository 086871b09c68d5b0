//! Scoring policies.
//!
//! Every game scores a question the same way mechanically: a base amount,
//! named bonus and penalty terms, then a clamp. What differs is the term
//! vocabulary, so each game plugs in one [`ScoringPolicy`] implementation.
//!
//! ## Example
//!
//! ```
//! use round_engine::scoring::{ScoreBreakdown, ScoreClamp, TermKind};
//!
//! let mut breakdown = ScoreBreakdown::new();
//! breakdown.push(TermKind::Grammar, 30);
//! breakdown.push(TermKind::MineMissed, -50);
//! let breakdown = breakdown.finish(ScoreClamp::floor_at_zero());
//!
//! assert_eq!(breakdown.raw(), -20);
//! assert_eq!(breakdown.total(), 0);
//! ```

mod breakdown;
mod policy;

pub use breakdown::{ScoreBreakdown, ScoreClamp, ScoreTerm, TermKind};
pub use policy::{combo_multiplier, ScoreFacts, ScoringPolicy};
