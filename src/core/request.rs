//! Request tokens and the stale-response arbiter.
//!
//! Every asynchronous call to the exercise service captures a token when it is
//! dispatched. When the reply comes back the engine asks the arbiter whether
//! that token is still the latest one issued; if not, the reply is dropped
//! without touching round state. Nothing is ever cancelled on the service side.

use serde::{Deserialize, Serialize};

/// Identifier minted for one outstanding service call.
///
/// Tokens are strictly increasing within one arbiter. `RequestToken(0)` is
/// never issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl RequestToken {
    /// Create a token from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw token value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

/// Issues request tokens and answers "is this reply still wanted?".
#[derive(Clone, Debug, Default)]
pub struct RequestArbiter {
    latest: u64,
}

impl RequestArbiter {
    /// Create an arbiter that has issued nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new token. It becomes the only current token.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Whether `token` is the most recently issued token.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest != 0 && token.0 == self.latest
    }

    /// The most recently issued token, if any.
    #[must_use]
    pub fn latest(&self) -> Option<RequestToken> {
        (self.latest != 0).then_some(RequestToken(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strictly_increase() {
        let mut arbiter = RequestArbiter::new();
        let t1 = arbiter.issue();
        let t2 = arbiter.issue();
        let t3 = arbiter.issue();

        assert!(t1 < t2 && t2 < t3);
        assert_eq!(t1.raw(), 1);
        assert_eq!(arbiter.latest(), Some(t3));
    }

    #[test]
    fn test_only_latest_is_current() {
        let mut arbiter = RequestArbiter::new();
        let t1 = arbiter.issue();
        assert!(arbiter.is_current(t1));

        let t2 = arbiter.issue();
        assert!(!arbiter.is_current(t1));
        assert!(arbiter.is_current(t2));
    }

    #[test]
    fn test_fresh_arbiter_accepts_nothing() {
        let arbiter = RequestArbiter::new();
        assert_eq!(arbiter.latest(), None);
        assert!(!arbiter.is_current(RequestToken::new(0)));
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", RequestToken::new(7)), "Request(7)");
    }
}
