//! Sequential sampling of a registry into one canonical stream.
//!
//! Architecture:
//! 1. Snapshot the registry in registration order
//! 2. Sample each source one after another (never in parallel: timing
//!    sources measure elapsed time and must not compete for the CPU)
//! 3. Replace any failure (error, panic, timeout) with the sentinel
//! 4. Concatenate fragment texts with no separator
//!
//! The stream is only ever digested, never decoded, so the lack of a separator
//! between variable-length fragments is acceptable.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::registry::{RegisteredSource, SourceRegistry};
use crate::source::{EntropyFragment, EntropySource, FailureReason};

/// Placeholder contributed by a source that failed.
pub const DEFAULT_SENTINEL: &str = "0";

/// Ordered concatenation of all fragment texts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalStream(String);

impl CanonicalStream {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UTF-8 bytes fed to the digest.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CanonicalStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'a> FromIterator<&'a EntropyFragment> for CanonicalStream {
    fn from_iter<I: IntoIterator<Item = &'a EntropyFragment>>(iter: I) -> Self {
        let mut s = String::new();
        for fragment in iter {
            s.push_str(&fragment.text);
        }
        Self(s)
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub stream: CanonicalStream,
    /// One fragment per registered source, in registry order.
    pub fragments: Vec<EntropyFragment>,
    /// Wall time spent sampling all sources.
    pub elapsed: Duration,
}

/// Samples sources and builds the canonical stream.
#[derive(Debug, Clone)]
pub struct SampleAggregator {
    sentinel: String,
}

impl Default for SampleAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleAggregator {
    pub fn new() -> Self {
        Self::with_sentinel(DEFAULT_SENTINEL)
    }

    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Sample every source in `registry` in order.
    ///
    /// Total cost is the sum of each source's sampling cost, bounded per
    /// source by its timeout when one is registered. Never fails.
    pub fn aggregate(&self, registry: &SourceRegistry) -> Aggregation {
        let t0 = Instant::now();
        let fragments: Vec<EntropyFragment> = registry
            .ordered_sources()
            .iter()
            .map(|entry| self.sample_one(entry))
            .collect();
        let stream = fragments.iter().collect();
        Aggregation {
            stream,
            fragments,
            elapsed: t0.elapsed(),
        }
    }

    fn sample_one(&self, entry: &RegisteredSource) -> EntropyFragment {
        let name = entry.descriptor.name.as_str();
        let t0 = Instant::now();
        let outcome = match entry.descriptor.timeout {
            Some(timeout) => sample_with_timeout(entry, timeout),
            None => sample_guarded(entry.source.as_ref()),
        };
        log::debug!("source '{name}' sampled in {:?}", t0.elapsed());

        match outcome {
            Ok(text) => EntropyFragment::ok(name, text),
            Err(reason) => {
                log::warn!("entropy source '{name}' failed ({reason}); using sentinel");
                EntropyFragment::failed(name, self.sentinel.as_str(), reason)
            }
        }
    }
}

/// Run `sample()` on the calling thread, catching panics.
fn sample_guarded(source: &dyn EntropySource) -> Result<String, FailureReason> {
    match catch_unwind(AssertUnwindSafe(|| source.sample())) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(FailureReason::Unavailable {
            message: e.to_string(),
        }),
        Err(payload) => Err(FailureReason::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    }
}

/// Run `sample()` on a helper thread and wait at most `timeout`.
///
/// A source that overruns is abandoned, not cancelled: its thread finishes on
/// its own and the late result is dropped. While that thread is still running
/// the source is reported as timed out straight away, so a stalled source
/// never has more than one sampler thread alive. Concurrent passes over the
/// same registration wait on each other.
fn sample_with_timeout(
    entry: &RegisteredSource,
    timeout: Duration,
) -> Result<String, FailureReason> {
    let timed_out = FailureReason::TimedOut {
        timeout_ms: millis_rounded_up(timeout),
    };
    let mut pending = entry.pending.lock().unwrap_or_else(|e| e.into_inner());
    if matches!(
        pending.as_ref().map(mpsc::Receiver::try_recv),
        Some(Err(mpsc::TryRecvError::Empty))
    ) {
        log::debug!(
            "source '{}' is still running an earlier sample",
            entry.descriptor.name
        );
        return Err(timed_out);
    }
    *pending = None;

    let (tx, rx) = mpsc::sync_channel(1);
    let source = Arc::clone(&entry.source);
    let spawned = std::thread::Builder::new()
        .name(format!("entropyguid-{}", entry.descriptor.name))
        .spawn(move || {
            let _ = tx.send(sample_guarded(source.as_ref()));
        });
    if let Err(e) = spawned {
        return Err(FailureReason::Unavailable {
            message: format!("could not spawn sampler thread: {e}"),
        });
    }

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            *pending = Some(rx);
            Err(timed_out)
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(FailureReason::Panicked {
            message: "sampler thread exited without a result".to_string(),
        }),
    }
}

/// Whole milliseconds, never rounding a non-zero timeout down to zero.
fn millis_rounded_up(d: Duration) -> u64 {
    u64::try_from(d.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
