//! # entropyguid-core
//!
//! **Identifiers from the noise of your environment.**
//!
//! `entropyguid-core` builds globally unique identifiers without coordination
//! by sampling several weakly correlated signals (wall-clock time, a heap
//! address, sleep timing, a directory count, process identity, a random draw)
//! and condensing them through a SHA-2 digest.
//!
//! ## Quick Start
//!
//! ```no_run
//! use entropyguid_core::{DigestAlgorithm, GeneratorConfig};
//!
//! // All built-in sources, SHA-256
//! let generator = GeneratorConfig::default().build()?;
//! let generation = generator.generate(DigestAlgorithm::Sha256)?;
//! println!("{}", generation.identifier);
//!
//! if generation.diagnostics.all_failed {
//!     eprintln!("low-entropy identifier, retry");
//! }
//! # Ok::<(), entropyguid_core::GuidError>(())
//! ```
//!
//! ## Architecture
//!
//! Registry → Aggregator (sequential, concatenate) → Digest → Identifier
//!
//! Every source implements the [`EntropySource`] trait. The
//! [`SourceRegistry`] fixes their order, the [`SampleAggregator`] samples
//! them one at a time and isolates failures behind a sentinel, and the
//! [`DigestEngine`] hashes the resulting [`CanonicalStream`].
//!
//! This is a best-effort uniqueness heuristic. It is not a standards-track
//! UUID and the identifiers are not secret.

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod digest;
pub mod error;
pub mod generator;
pub mod registry;
pub mod source;
pub mod sources;

pub use aggregate::{Aggregation, CanonicalStream, DEFAULT_SENTINEL, SampleAggregator};
pub use clock::{Clock, MockClock, SystemClock};
pub use config::GeneratorConfig;
pub use digest::{DigestAlgorithm, DigestEngine, Identifier};
pub use error::{GuidError, SourceError};
pub use generator::{Diagnostics, Generation, IdentifierGenerator};
pub use registry::{RegisteredSource, SourceRegistry};
pub use source::{
    EntropyFragment, EntropySource, FailureReason, FragmentStatus, Platform, SourceCategory,
    SourceDescriptor, SourceInfo,
};
pub use sources::{
    BUILTIN_SOURCES, SourceSettings, all_sources, detect_available_sources, source_by_name,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
