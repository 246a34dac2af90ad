//! Abstract entropy source trait and the fragments it produces.
//!
//! Every entropy source implements the [`EntropySource`] trait, which provides
//! metadata via [`SourceInfo`], availability checking, and a single textual
//! sample of some piece of ambient state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Category of entropy source based on the kind of signal it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCategory {
    /// Wall-clock time since the epoch.
    Time,
    /// Memory layout / object identity.
    Memory,
    /// Elapsed-time deltas around a blocking wait.
    Timing,
    /// Platform-dependent context (file counts, process/user identity).
    Context,
    /// Pseudo-random draws.
    Random,
    /// Constant text.
    Static,
}

impl std::fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Memory => write!(f, "memory"),
            Self::Timing => write!(f, "timing"),
            Self::Context => write!(f, "context"),
            Self::Random => write!(f, "random"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// Target platform for an entropy source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Works on any platform.
    Any,
    /// Full output only on Unix-like systems.
    Unix,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Unix => write!(f, "unix"),
        }
    }
}

/// Metadata about an entropy source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Default registration name (e.g. `"wall_clock"`).
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Why two independent runs are unlikely to observe the same value.
    pub rationale: &'static str,
    /// Source category for classification.
    pub category: SourceCategory,
    /// Target platform.
    pub platform: Platform,
    /// Whether sampling intentionally blocks the calling thread.
    pub blocking: bool,
}

/// Trait that every entropy source must implement.
///
/// `sample` must only read ambient state. It may fail, in which case the
/// aggregator substitutes its sentinel and records the failure; it must not
/// take the process down.
pub trait EntropySource: Send + Sync {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Check if this source can operate on the current machine.
    fn is_available(&self) -> bool {
        true
    }

    /// Sample the signal once and render it in its canonical textual form.
    fn sample(&self) -> Result<String, SourceError>;

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}

/// Descriptor of a registered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    /// Registration name, unique within a registry.
    pub name: String,
    /// Monotonic registration index. Never reused, even after removal.
    pub order: u64,
    /// Upper bound on a single `sample()` call, if any.
    pub timeout: Option<Duration>,
}

/// Why a source did not contribute its own value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The source reported that it could not read its signal.
    Unavailable { message: String },
    /// The source panicked while sampling.
    Panicked { message: String },
    /// The source did not return within its timeout.
    TimedOut { timeout_ms: u64 },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { message } => write!(f, "unavailable: {message}"),
            Self::Panicked { message } => write!(f, "panicked: {message}"),
            Self::TimedOut { timeout_ms } => write!(f, "timed out after {timeout_ms}ms"),
        }
    }
}

/// Outcome of one source invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FragmentStatus {
    Ok,
    Failed { reason: FailureReason },
}

/// The textual output of one source for one sampling call.
///
/// Failed fragments carry the aggregator's sentinel as their text so that the
/// canonical stream stays total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntropyFragment {
    /// Registration name of the source that produced this fragment.
    pub source: String,
    /// Canonical text contributed to the stream.
    pub text: String,
    pub status: FragmentStatus,
}

impl EntropyFragment {
    pub fn ok(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            status: FragmentStatus::Ok,
        }
    }

    pub fn failed(
        source: impl Into<String>,
        sentinel: impl Into<String>,
        reason: FailureReason,
    ) -> Self {
        Self {
            source: source.into(),
            text: sentinel.into(),
            status: FragmentStatus::Failed { reason },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FragmentStatus::Failed { .. })
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            FragmentStatus::Ok => None,
            FragmentStatus::Failed { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_is_lowercase() {
        assert_eq!(SourceCategory::Time.to_string(), "time");
        assert_eq!(SourceCategory::Timing.to_string(), "timing");
        assert_eq!(SourceCategory::Static.to_string(), "static");
    }

    #[test]
    fn ok_fragment_is_not_failed() {
        let f = EntropyFragment::ok("a", "foo");
        assert!(!f.is_failed());
        assert!(f.failure().is_none());
        assert_eq!(f.text, "foo");
    }

    #[test]
    fn failed_fragment_carries_sentinel() {
        let f = EntropyFragment::failed(
            "dir",
            "0",
            FailureReason::Unavailable {
                message: "permission denied".into(),
            },
        );
        assert!(f.is_failed());
        assert_eq!(f.text, "0");
        assert_eq!(
            f.failure().map(|r| r.to_string()).as_deref(),
            Some("unavailable: permission denied")
        );
    }

    #[test]
    fn fragment_status_serializes_tagged() {
        let f = EntropyFragment::failed("slow", "0", FailureReason::TimedOut { timeout_ms: 50 });
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["status"]["status"], "failed");
        assert_eq!(json["status"]["reason"]["kind"], "timed_out");
        assert_eq!(json["status"]["reason"]["timeout_ms"], 50);
    }
}
