//! Ordered, name-keyed collection of entropy sources.
//!
//! Registration order is the canonical contract: the aggregator walks sources
//! in exactly this order, so reordering changes every identifier produced
//! afterwards. Append-only growth at startup is the intended usage.

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, mpsc};
use std::time::Duration;

use crate::error::{GuidError, Result};
use crate::source::{EntropySource, FailureReason, SourceDescriptor};

/// Result channel of a timed sample still running past its timeout.
pub(crate) type PendingSample = mpsc::Receiver<std::result::Result<String, FailureReason>>;

/// A source together with its descriptor, as handed to the aggregator.
#[derive(Clone)]
pub struct RegisteredSource {
    pub descriptor: SourceDescriptor,
    pub source: Arc<dyn EntropySource>,
    /// At most one overrunning sampler per registration; shared by snapshots.
    pub(crate) pending: Arc<Mutex<Option<PendingSample>>>,
}

impl std::fmt::Debug for RegisteredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSource")
            .field("descriptor", &self.descriptor)
            .field("source", &self.source.name())
            .finish()
    }
}

#[derive(Default)]
struct Inner {
    entries: Vec<RegisteredSource>,
    next_order: u64,
}

/// Thread-safe registry of entropy sources.
///
/// Mutation takes `&self`; readers get a snapshot from
/// [`ordered_sources`](Self::ordered_sources) and sample without holding the
/// lock.
#[derive(Default)]
pub struct SourceRegistry {
    inner: RwLock<Inner>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source under `name`.
    pub fn register(&self, source: Box<dyn EntropySource>, name: &str) -> Result<()> {
        self.insert(Arc::from(source), name, None)
    }

    /// Append a source under `name` whose samples are bounded by `timeout`.
    pub fn register_with_timeout(
        &self,
        source: Box<dyn EntropySource>,
        name: &str,
        timeout: Duration,
    ) -> Result<()> {
        self.insert(Arc::from(source), name, Some(timeout))
    }

    /// Append an already shared source.
    pub fn register_shared(
        &self,
        source: Arc<dyn EntropySource>,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        self.insert(source, name, timeout)
    }

    fn insert(
        &self,
        source: Arc<dyn EntropySource>,
        name: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let mut inner = self.write();
        if inner.entries.iter().any(|e| e.descriptor.name == name) {
            return Err(GuidError::DuplicateName(name.to_string()));
        }
        let order = inner.next_order;
        inner.next_order += 1;
        log::debug!("registered entropy source '{name}' at position {order}");
        inner.entries.push(RegisteredSource {
            descriptor: SourceDescriptor {
                name: name.to_string(),
                order,
                timeout,
            },
            source,
            pending: Arc::default(),
        });
        Ok(())
    }

    /// Remove the source registered under `name`.
    ///
    /// Fails with [`GuidError::NotFound`] if no such source exists. The
    /// remaining sources keep their relative order.
    pub fn unregister(&self, name: &str) -> Result<()> {
        let mut inner = self.write();
        let idx = inner
            .entries
            .iter()
            .position(|e| e.descriptor.name == name)
            .ok_or_else(|| GuidError::NotFound(name.to_string()))?;
        inner.entries.remove(idx);
        log::debug!("unregistered entropy source '{name}'");
        Ok(())
    }

    /// Snapshot of all sources in registration order.
    pub fn ordered_sources(&self) -> Vec<RegisteredSource> {
        self.read().entries.clone()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        self.read()
            .entries
            .iter()
            .map(|e| e.descriptor.clone())
            .collect()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.read()
            .entries
            .iter()
            .map(|e| e.descriptor.name.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().entries.iter().any(|e| e.descriptor.name == name)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock can only come from this module, and no
    // method leaves `Inner` half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.names())
            .finish()
    }
}
