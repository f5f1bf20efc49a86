//! Injectable wall-clock source so phase math and tests share one "now".

use std::time::SystemTime;

/// Source of the server's current time.
///
/// Every operation that needs "now" (phase computation, presence liveness,
/// the `server_time` echoed to polling clients) reads it through this trait
/// so a single request observes a single consistent instant, and so tests
/// can substitute a deterministic clock.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// Production clock backed by [`SystemTime::now`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
