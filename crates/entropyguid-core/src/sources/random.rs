//! RandomDrawSource: one pseudo-random `u32`.
//!
//! **Output:** decimal `u32`. The thread-local generator is seeded from the
//! OS; a fixed seed can be supplied for reproducible tests.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const RANDOM_DRAW: &str = "random_draw";

/// Draws from `rand`.
pub struct RandomDrawSource {
    seeded: Option<Mutex<StdRng>>,
}

static RANDOM_DRAW_INFO: SourceInfo = SourceInfo {
    name: RANDOM_DRAW,
    description: "Pseudo-random 32-bit integer",
    rationale: "Even when two hosts run the same generator, their seeds are \
                drawn independently.",
    category: SourceCategory::Random,
    platform: Platform::Any,
    blocking: false,
};

impl RandomDrawSource {
    /// Draw from the thread-local, OS-seeded generator.
    pub fn new() -> Self {
        Self { seeded: None }
    }

    /// Draw from a generator with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl Default for RandomDrawSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for RandomDrawSource {
    fn info(&self) -> &SourceInfo {
        &RANDOM_DRAW_INFO
    }

    fn sample(&self) -> Result<String, SourceError> {
        let value: u32 = match &self.seeded {
            Some(rng) => rng
                .lock()
                .map_err(|_| SourceError::Unavailable("seeded generator poisoned".into()))?
                .random(),
            None => rand::rng().random(),
        };
        Ok(value.to_string())
    }
}
