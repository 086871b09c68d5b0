//! The content-generation and evaluation collaborator.
//!
//! The engine talks to its collaborator through [`ExerciseService`]. Every
//! call carries a one-shot [`Reply`] that the service completes later, from
//! any thread. The engine never cancels a call; it discards replies whose
//! request token has been superseded.
//!
//! [`ScriptedService`] is an in-process collaborator that answers from
//! queued results, either immediately or when released by hand.

mod reply;
mod scripted;

pub use reply::{ExerciseService, Reply};
pub use scripted::{Dispatch, ScriptedService, ServiceCall};
