//! SleepTimingSource: clock deltas around a fixed-duration sleep.
//!
//! **Output:** `{wall_ms:.6}:{mono_ns}`, the elapsed wall-clock time in
//! milliseconds with six decimals and the elapsed monotonic time in
//! nanoseconds, e.g. `256.081000:256081234`.
//!
//! **Blocking:** sleeps the calling thread for [`DEFAULT_SLEEP`] (256 ms)
//! unless configured otherwise. This is the only source that blocks. The sleep
//! goes through the injected [`Clock`], so tests substitute a
//! [`MockClock`](crate::clock::MockClock) and never wait.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const SLEEP_TIMING: &str = "sleep_timing";

/// Default sleep window.
pub const DEFAULT_SLEEP: Duration = Duration::from_millis(256);

/// Measures how long a requested sleep actually took on two clocks.
pub struct SleepTimingSource {
    clock: Arc<dyn Clock>,
    sleep: Duration,
}

static SLEEP_TIMING_INFO: SourceInfo = SourceInfo {
    name: SLEEP_TIMING,
    description: "Wall and monotonic clock deltas around a short sleep",
    rationale: "Scheduler wake-up latency, timer granularity and the drift \
                between two independent clocks perturb the sub-millisecond \
                digits of the measured sleep.",
    category: SourceCategory::Timing,
    platform: Platform::Any,
    blocking: true,
};

impl SleepTimingSource {
    pub fn new(clock: Arc<dyn Clock>, sleep: Duration) -> Self {
        Self { clock, sleep }
    }

    pub fn sleep_duration(&self) -> Duration {
        self.sleep
    }
}

impl EntropySource for SleepTimingSource {
    fn info(&self) -> &SourceInfo {
        &SLEEP_TIMING_INFO
    }

    fn sample(&self) -> Result<String, SourceError> {
        let unavailable = || SourceError::Unavailable("wall clock is before the epoch".into());

        let wall_before = self.clock.wall_time().ok_or_else(unavailable)?;
        let mono_before = self.clock.monotonic_ns();
        self.clock.sleep(self.sleep);
        let mono_after = self.clock.monotonic_ns();
        let wall_after = self.clock.wall_time().ok_or_else(unavailable)?;

        // The wall clock may be stepped backwards during the sleep.
        let wall_ms = wall_after.saturating_sub(wall_before).as_nanos() as f64 / 1_000_000.0;
        let mono_ns = mono_after.wrapping_sub(mono_before);
        Ok(format!("{wall_ms:.6}:{mono_ns}"))
    }
}
