//! Time sources for elapsed-time bonuses and result timestamps.
//!
//! The engine never reads the system clock directly. Hosts pass a
//! [`SystemClock`]; tests pass a [`ManualClock`] and move it by hand, which
//! keeps quick-answer bonuses deterministic.
//!
//! ```
//! use std::time::Duration;
//! use round_engine::core::{Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! let start = clock.monotonic();
//! clock.advance(Duration::from_secs(10));
//! assert_eq!(clock.monotonic() - start, Duration::from_secs(10));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

/// Monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Monotonic time since an arbitrary fixed origin.
    fn monotonic(&self) -> Duration;

    /// Current wall-clock time, used only for result timestamps.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real clock.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct ManualTime {
    monotonic: Duration,
    wall: DateTime<Utc>,
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualTime>>,
}

impl ManualClock {
    /// Start at monotonic zero and wall time 2024-01-01T00:00:00Z.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default())
    }

    /// Start at monotonic zero and the given wall time.
    #[must_use]
    pub fn starting_at(wall: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualTime {
                monotonic: Duration::ZERO,
                wall,
            })),
        }
    }

    /// Move both clocks forward.
    pub fn advance(&self, by: Duration) {
        let mut time = self.inner.lock();
        time.monotonic += by;
        time.wall += chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Duration {
        self.inner.lock().monotonic
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.inner.lock().wall
    }
}
