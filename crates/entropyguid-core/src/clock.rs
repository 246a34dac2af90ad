//! Timing provider injected into time-based sources.
//!
//! Production code uses [`SystemClock`]. Tests use [`MockClock`], whose
//! `sleep` advances virtual time instead of blocking, so timing sources can be
//! exercised without real waits.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Wall clock, monotonic clock and a bounded sleep.
pub trait Clock: Send + Sync {
    /// Time since the Unix epoch. `None` if the wall clock is unusable
    /// (e.g. set before 1970).
    fn wall_time(&self) -> Option<Duration>;

    /// Monotonic nanoseconds relative to a process-local epoch.
    fn monotonic_ns(&self) -> u64;

    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real clocks of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn wall_time(&self) -> Option<Duration> {
        SystemTime::now().duration_since(UNIX_EPOCH).ok()
    }

    fn monotonic_ns(&self) -> u64 {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        let epoch = EPOCH.get_or_init(Instant::now);
        epoch.elapsed().as_nanos() as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic virtual clock.
///
/// `sleep(d)` advances the wall clock by `d` and the monotonic clock by
/// `d + skew`, modelling the small disagreement between two real clocks.
#[derive(Debug)]
pub struct MockClock {
    wall_ns: AtomicU64,
    mono_ns: AtomicU64,
    skew_ns: u64,
}

impl MockClock {
    pub fn new(wall: Duration) -> Self {
        Self {
            wall_ns: AtomicU64::new(wall.as_nanos() as u64),
            mono_ns: AtomicU64::new(0),
            skew_ns: 0,
        }
    }

    /// Extra nanoseconds the monotonic clock gains on every sleep.
    pub fn with_skew(mut self, skew: Duration) -> Self {
        self.skew_ns = skew.as_nanos() as u64;
        self
    }

    /// Move both clocks forward without sleeping.
    pub fn advance(&self, by: Duration) {
        let ns = by.as_nanos() as u64;
        self.wall_ns.fetch_add(ns, Ordering::SeqCst);
        self.mono_ns.fetch_add(ns, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn wall_time(&self) -> Option<Duration> {
        Some(Duration::from_nanos(self.wall_ns.load(Ordering::SeqCst)))
    }

    fn monotonic_ns(&self) -> u64 {
        self.mono_ns.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) {
        let ns = duration.as_nanos() as u64;
        self.wall_ns.fetch_add(ns, Ordering::SeqCst);
        self.mono_ns.fetch_add(ns + self.skew_ns, Ordering::SeqCst);
    }
}
