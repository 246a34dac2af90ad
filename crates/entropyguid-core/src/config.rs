//! JSON configuration for building a generator from built-in sources.
//!
//! Every field is optional in the file; missing fields take the defaults of
//! [`GeneratorConfig::default`]:
//!
//! ```json
//! {
//!   "algorithm": "sha256",
//!   "sentinel": "0",
//!   "sources": ["wall_clock", "heap_address", "sleep_timing",
//!               "directory_count", "process_identity", "random_draw", "literal"],
//!   "source_timeout_ms": null,
//!   "sleep_ms": 256,
//!   "scan_dir": ".",
//!   "literal": "entropyguid::1",
//!   "random_seed": null
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::{DEFAULT_SENTINEL, SampleAggregator};
use crate::clock::{Clock, SystemClock};
use crate::digest::DigestAlgorithm;
use crate::error::{GuidError, Result};
use crate::generator::IdentifierGenerator;
use crate::registry::SourceRegistry;
use crate::sources::{self, BUILTIN_SOURCES, SourceSettings};

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Digest algorithm; unsupported names fail at load time.
    pub algorithm: DigestAlgorithm,
    /// Text substituted for failed sources.
    pub sentinel: String,
    /// Built-in source names, in sampling order.
    pub sources: Vec<String>,
    /// Per-source timeout applied to every configured source.
    pub source_timeout_ms: Option<u64>,
    /// Sleep window of `sleep_timing`.
    pub sleep_ms: u64,
    /// Directory counted by `directory_count`.
    pub scan_dir: PathBuf,
    /// Text of the `literal` source.
    pub literal: String,
    /// Fixed seed for `random_draw`.
    pub random_seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            sources: BUILTIN_SOURCES.iter().map(|s| s.to_string()).collect(),
            source_timeout_ms: None,
            sleep_ms: sources::timing::DEFAULT_SLEEP.as_millis() as u64,
            scan_dir: PathBuf::from("."),
            literal: sources::literal::DEFAULT_LITERAL.to_string(),
            random_seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Keep only the configured sources whose names contain one of the
    /// comma-separated `filter` terms (case-insensitive).
    pub fn retain_sources(&mut self, filter: &str) {
        let terms: Vec<String> = filter
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self.sources
            .retain(|name| terms.iter().any(|t| name.to_lowercase().contains(t)));
    }

    /// Reject unknown source names, duplicates, a zero timeout and a timeout
    /// that `sleep_timing` could never meet.
    pub fn validate(&self) -> Result<()> {
        for (i, name) in self.sources.iter().enumerate() {
            if !BUILTIN_SOURCES.contains(&name.as_str()) {
                return Err(GuidError::UnknownSource(name.clone()));
            }
            if self.sources[..i].contains(name) {
                return Err(GuidError::DuplicateName(name.clone()));
            }
        }
        match self.source_timeout_ms {
            Some(0) => {
                return Err(GuidError::Config("source_timeout_ms must be positive".into()));
            }
            Some(timeout_ms)
                if timeout_ms <= self.sleep_ms
                    && self.sources.iter().any(|s| s == sources::timing::SLEEP_TIMING) =>
            {
                return Err(GuidError::Config(format!(
                    "source_timeout_ms ({timeout_ms}) must exceed sleep_ms ({}) \
                     when sleep_timing is configured",
                    self.sleep_ms
                )));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn source_timeout(&self) -> Option<Duration> {
        self.source_timeout_ms.map(Duration::from_millis)
    }

    /// Source construction parameters using `clock`.
    pub fn source_settings(&self, clock: Arc<dyn Clock>) -> SourceSettings {
        SourceSettings {
            clock,
            sleep: Duration::from_millis(self.sleep_ms),
            scan_dir: self.scan_dir.clone(),
            literal: self.literal.clone(),
            random_seed: self.random_seed,
        }
    }

    /// Registry holding the configured sources in order.
    pub fn build_registry(&self, clock: Arc<dyn Clock>) -> Result<SourceRegistry> {
        self.validate()?;
        let settings = self.source_settings(clock);
        let registry = SourceRegistry::new();
        for name in &self.sources {
            let source = sources::source_by_name(name, &settings)?;
            registry.register_shared(Arc::from(source), name, self.source_timeout())?;
        }
        Ok(registry)
    }

    /// Generator over the real system clock.
    pub fn build(&self) -> Result<IdentifierGenerator> {
        self.build_with_clock(Arc::new(SystemClock))
    }

    /// Generator over an injected clock.
    pub fn build_with_clock(&self, clock: Arc<dyn Clock>) -> Result<IdentifierGenerator> {
        let registry = self.build_registry(clock)?;
        Ok(IdentifierGenerator::with_aggregator(
            registry,
            SampleAggregator::with_sentinel(self.sentinel.clone()),
        ))
    }
}
