//! The three exercise games.
//!
//! Each game is a small configuration value implementing
//! [`Game`](crate::rules::Game) plus [`ComposeGame`](crate::rules::ComposeGame)
//! (Minefield, Refiner) or [`ChoiceGame`](crate::rules::ChoiceGame)
//! (NativeOrNot). Plug one into a [`RoundEngine`](crate::engine::RoundEngine).

pub mod minefield;
pub mod native_or_not;
pub mod refiner;
pub mod text;

pub use minefield::Minefield;
pub use native_or_not::NativeOrNot;
pub use refiner::Refiner;
