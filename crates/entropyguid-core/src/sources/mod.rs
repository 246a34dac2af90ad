//! Built-in entropy sources.
//!
//! One source per signal family: wall-clock time, a heap address, sleep
//! timing deltas, a directory entry count, process/user identity, a
//! pseudo-random draw, and a static literal.

pub mod literal;
pub mod memory;
pub mod process;
pub mod random;
pub mod storage;
pub mod time;
pub mod timing;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::GuidError;
use crate::source::EntropySource;

/// Names of the built-in sources in their default registration order.
pub const BUILTIN_SOURCES: &[&str] = &[
    time::WALL_CLOCK,
    memory::HEAP_ADDRESS,
    timing::SLEEP_TIMING,
    storage::DIRECTORY_COUNT,
    process::PROCESS_IDENTITY,
    random::RANDOM_DRAW,
    literal::LITERAL,
];

/// Construction parameters shared by the built-in sources.
#[derive(Clone)]
pub struct SourceSettings {
    /// Clock used by `wall_clock` and `sleep_timing`.
    pub clock: Arc<dyn Clock>,
    /// How long `sleep_timing` blocks.
    pub sleep: Duration,
    /// Directory counted by `directory_count`.
    pub scan_dir: PathBuf,
    /// Text emitted by `literal`.
    pub literal: String,
    /// Fixed seed for `random_draw`; `None` seeds from the OS.
    pub random_seed: Option<u64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            sleep: timing::DEFAULT_SLEEP,
            scan_dir: PathBuf::from("."),
            literal: literal::DEFAULT_LITERAL.to_string(),
            random_seed: None,
        }
    }
}

impl std::fmt::Debug for SourceSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSettings")
            .field("sleep", &self.sleep)
            .field("scan_dir", &self.scan_dir)
            .field("literal", &self.literal)
            .field("random_seed", &self.random_seed)
            .finish_non_exhaustive()
    }
}

/// Construct the built-in source called `name`.
pub fn source_by_name(
    name: &str,
    settings: &SourceSettings,
) -> Result<Box<dyn EntropySource>, GuidError> {
    let source: Box<dyn EntropySource> = match name {
        time::WALL_CLOCK => Box::new(time::WallClockSource::new(Arc::clone(&settings.clock))),
        memory::HEAP_ADDRESS => Box::new(memory::HeapAddressSource),
        timing::SLEEP_TIMING => Box::new(timing::SleepTimingSource::new(
            Arc::clone(&settings.clock),
            settings.sleep,
        )),
        storage::DIRECTORY_COUNT => {
            Box::new(storage::DirectoryCountSource::new(settings.scan_dir.clone()))
        }
        process::PROCESS_IDENTITY => Box::new(process::ProcessIdentitySource),
        random::RANDOM_DRAW => match settings.random_seed {
            Some(seed) => Box::new(random::RandomDrawSource::seeded(seed)),
            None => Box::new(random::RandomDrawSource::new()),
        },
        literal::LITERAL => Box::new(literal::LiteralSource::new(settings.literal.clone())),
        other => return Err(GuidError::UnknownSource(other.to_string())),
    };
    Ok(source)
}

/// Every built-in source, in default order.
pub fn all_sources(settings: &SourceSettings) -> Vec<Box<dyn EntropySource>> {
    BUILTIN_SOURCES
        .iter()
        .filter_map(|name| source_by_name(name, settings).ok())
        .collect()
}

/// Built-in sources that can operate on this machine.
pub fn detect_available_sources(settings: &SourceSettings) -> Vec<Box<dyn EntropySource>> {
    all_sources(settings)
        .into_iter()
        .filter(|s| s.is_available())
        .collect()
}
