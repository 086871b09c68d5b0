//! Collaborator replies, marshaled back to the engine's thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::core::RequestToken;
use crate::rules::Game;
use crate::service::Reply;

/// A completed collaborator call, tagged with the token it was issued under.
pub(crate) enum Delivery<G: Game> {
    CacheReady {
        token: RequestToken,
        outcome: Result<(), String>,
    },
    Question {
        token: RequestToken,
        bonus: bool,
        difficulty: G::Difficulty,
        outcome: Result<G::Question, String>,
    },
    Evaluation {
        token: RequestToken,
        answer: String,
        outcome: Result<G::Evaluation, String>,
    },
}

impl<G: Game> Delivery<G> {
    pub(crate) fn token(&self) -> RequestToken {
        match self {
            Delivery::CacheReady { token, .. }
            | Delivery::Question { token, .. }
            | Delivery::Evaluation { token, .. } => *token,
        }
    }
}

/// Multi-producer queue drained by the owning engine.
///
/// Replies may complete on any thread; they only enqueue. Once the engine
/// (and with it the receiver) is gone, late replies are dropped silently.
pub(crate) struct Mailbox<G: Game> {
    tx: Sender<Delivery<G>>,
    rx: Receiver<Delivery<G>>,
}

impl<G: Game> Mailbox<G> {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A reply that enqueues its outcome wrapped by `wrap`.
    pub(crate) fn reply<T: 'static>(
        &self,
        wrap: impl FnOnce(Result<T, String>) -> Delivery<G> + Send + 'static,
    ) -> Reply<T> {
        let tx = self.tx.clone();
        Reply::new(move |outcome| {
            // The engine may already be gone.
            let _ = tx.send(wrap(outcome));
        })
    }

    pub(crate) fn try_next(&self) -> Option<Delivery<G>> {
        self.rx.try_recv().ok()
    }

    pub(crate) fn next_timeout(&self, timeout: Duration) -> Option<Delivery<G>> {
        match self.rx.recv_timeout(timeout) {
            Ok(delivery) => Some(delivery),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
