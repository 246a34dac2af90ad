//! Error types.
//!
//! Two layers: [`GuidError`] for caller mistakes (registry management, digest
//! selection, configuration) which propagate immediately, and [`SourceError`]
//! for a single source that could not sample. Source errors never escape
//! [`crate::IdentifierGenerator::generate`]; the aggregator turns them into
//! failed fragments.

use thiserror::Error;

/// Errors surfaced to the caller of the registry, digest engine or generator.
#[derive(Debug, Error)]
pub enum GuidError {
    /// A source with this name is already registered.
    #[error("source '{0}' is already registered")]
    DuplicateName(String),

    /// No source with this name is registered.
    #[error("source '{0}' is not registered")]
    NotFound(String),

    /// The requested digest algorithm is not offered.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A configuration names a source that is not built in.
    #[error("unknown entropy source: {0}")]
    UnknownSource(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of one entropy source to produce a sample.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying signal could not be read on this machine right now.
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = GuidError> = std::result::Result<T, E>;
