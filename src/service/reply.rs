//! Collaborator contract and one-shot replies.

use crate::core::Signatures;
use crate::rules::Game;

/// One-shot completion handle for an asynchronous call.
///
/// Consumed on completion, so a reply fires at most once. Dropping it
/// without completing leaves the caller waiting.
pub struct Reply<T> {
    callback: Box<dyn FnOnce(Result<T, String>) + Send>,
}

impl<T> Reply<T> {
    pub fn new(callback: impl FnOnce(Result<T, String>) + Send + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    pub fn complete(self, outcome: Result<T, String>) {
        (self.callback)(outcome);
    }

    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(self, message: impl Into<String>) {
        self.complete(Err(message.into()));
    }
}

impl<T> std::fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Reply")
    }
}

/// Question generation and answer grading for one game.
///
/// Implementations may complete replies synchronously or from worker
/// threads. Failure messages are shown to the user verbatim.
pub trait ExerciseService<G: Game>: Send + Sync {
    /// One-shot warm-up, called once per round before the first question.
    fn initialize_cache(&self, reply: Reply<()>);

    /// Generate a question whose signature is not in `excluded`.
    fn generate_question(
        &self,
        difficulty: G::Difficulty,
        excluded: Signatures,
        reply: Reply<G::Question>,
    );

    /// Generate a question related to `base`, avoiding `excluded`.
    fn generate_related_question(
        &self,
        _base: &G::Question,
        _excluded: Signatures,
        reply: Reply<G::Question>,
    ) {
        reply.fail("related questions are not supported");
    }

    /// Grade `answer` against `question`.
    fn evaluate_answer(&self, _question: &G::Question, _answer: &str, reply: Reply<G::Evaluation>) {
        reply.fail("answer evaluation is not supported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_reply_delivers_once() {
        let (tx, rx) = mpsc::channel();
        let reply = Reply::new(move |outcome: Result<u32, String>| {
            let _ = tx.send(outcome);
        });

        reply.succeed(3);

        assert_eq!(rx.recv().unwrap(), Ok(3));
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_reply_fail_from_other_thread() {
        let (tx, rx) = mpsc::channel();
        let reply = Reply::new(move |outcome: Result<u32, String>| {
            let _ = tx.send(outcome);
        });

        std::thread::spawn(move || reply.fail("quota exceeded"))
            .join()
            .unwrap();

        assert_eq!(rx.recv().unwrap(), Err("quota exceeded".to_string()));
    }
}
