//! WallClockSource: time since the Unix epoch.
//!
//! **Output:** decimal microseconds since 1970-01-01T00:00:00Z, e.g.
//! `1760900000123456`. Two deployments only collide here if they sample in the
//! same microsecond.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const WALL_CLOCK: &str = "wall_clock";

/// Samples the wall clock through an injected [`Clock`].
pub struct WallClockSource {
    clock: Arc<dyn Clock>,
}

static WALL_CLOCK_INFO: SourceInfo = SourceInfo {
    name: WALL_CLOCK,
    description: "Microseconds since the Unix epoch",
    rationale: "Collides only when two generators sample in the exact same \
                microsecond of absolute time; independent of local time zone.",
    category: SourceCategory::Time,
    platform: Platform::Any,
    blocking: false,
};

impl WallClockSource {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl EntropySource for WallClockSource {
    fn info(&self) -> &SourceInfo {
        &WALL_CLOCK_INFO
    }

    fn sample(&self) -> Result<String, SourceError> {
        let now = self
            .clock
            .wall_time()
            .ok_or_else(|| SourceError::Unavailable("wall clock is before the epoch".into()))?;
        Ok(now.as_micros().to_string())
    }
}
