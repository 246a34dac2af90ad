//! The identifier generator façade.
//!
//! Sequences registry → aggregator → digest engine. Each call to
//! [`IdentifierGenerator::generate`] is a stateless pipeline run over the
//! current registry contents; nothing carries over between calls.

use std::time::Duration;

use serde::Serialize;

use crate::aggregate::{Aggregation, SampleAggregator};
use crate::digest::{DigestAlgorithm, DigestEngine, Identifier};
use crate::error::Result;
use crate::registry::SourceRegistry;
use crate::source::{EntropyFragment, EntropySource};

/// What happened during one generation, for audit and debugging.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// One fragment per source, in registry order.
    pub fragments: Vec<EntropyFragment>,
    /// Names of the sources that fell back to the sentinel.
    pub failed_sources: Vec<String>,
    /// Every registered source failed, so the identifier is built from
    /// sentinels only. False for an empty registry.
    pub all_failed: bool,
    /// The raw canonical stream that was digested.
    pub canonical: String,
    /// Time spent sampling.
    #[serde(serialize_with = "serialize_elapsed_ms", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

fn serialize_elapsed_ms<S: serde::Serializer>(
    d: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64() * 1000.0)
}

impl Diagnostics {
    /// Summarize one aggregation pass.
    pub fn from_aggregation(aggregation: Aggregation) -> Self {
        let failed_sources: Vec<String> = aggregation
            .fragments
            .iter()
            .filter(|f| f.is_failed())
            .map(|f| f.source.clone())
            .collect();
        let total = aggregation.fragments.len();
        let all_failed = total > 0 && failed_sources.len() == total;
        Self {
            fragments: aggregation.fragments,
            failed_sources,
            all_failed,
            canonical: aggregation.stream.into_string(),
            elapsed: aggregation.elapsed,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_sources.is_empty()
    }
}

/// Output of [`IdentifierGenerator::generate`].
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub identifier: Identifier,
    pub algorithm: DigestAlgorithm,
    pub diagnostics: Diagnostics,
}

/// Owns a registry and turns it into identifiers.
///
/// Built once at startup, sources registered, then shared (`&self`) across
/// any number of concurrent `generate` calls.
#[derive(Debug, Default)]
pub struct IdentifierGenerator {
    registry: SourceRegistry,
    aggregator: SampleAggregator,
}

impl IdentifierGenerator {
    pub fn new(registry: SourceRegistry) -> Self {
        Self::with_aggregator(registry, SampleAggregator::new())
    }

    pub fn with_aggregator(registry: SourceRegistry, aggregator: SampleAggregator) -> Self {
        Self {
            registry,
            aggregator,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn aggregator(&self) -> &SampleAggregator {
        &self.aggregator
    }

    /// Register a source at the end of the sampling order.
    pub fn register_source(&self, source: Box<dyn EntropySource>, name: &str) -> Result<()> {
        self.registry.register(source, name)
    }

    /// Register a source whose samples are bounded by `timeout`.
    pub fn register_source_with_timeout(
        &self,
        source: Box<dyn EntropySource>,
        name: &str,
        timeout: Duration,
    ) -> Result<()> {
        self.registry.register_with_timeout(source, name, timeout)
    }

    pub fn unregister_source(&self, name: &str) -> Result<()> {
        self.registry.unregister(name)
    }

    /// Sample all sources and digest the stream with `algorithm`.
    ///
    /// Source failures never surface as errors here; inspect
    /// [`Diagnostics::all_failed`] to reject low-quality identifiers.
    pub fn generate(&self, algorithm: DigestAlgorithm) -> Result<Generation> {
        let aggregation = self.aggregator.aggregate(&self.registry);
        log::debug!("str = {}", aggregation.stream);

        let identifier = DigestEngine::digest(aggregation.stream.as_bytes(), algorithm);
        log::debug!("digest = {identifier}");

        let diagnostics = Diagnostics::from_aggregation(aggregation);
        if diagnostics.all_failed {
            log::warn!(
                "all {} entropy sources failed; identifier is built from sentinels only",
                diagnostics.fragments.len()
            );
        }

        Ok(Generation {
            identifier,
            algorithm,
            diagnostics,
        })
    }

    /// Like [`generate`](Self::generate), with the algorithm given by name.
    ///
    /// The name is resolved before any source is sampled.
    pub fn generate_named(&self, algorithm: &str) -> Result<Generation> {
        let algorithm: DigestAlgorithm = algorithm.parse()?;
        self.generate(algorithm)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{GuidError, SourceError};
    use crate::source::{Platform, SourceCategory, SourceInfo};
    use crate::sources::literal::LiteralSource;

    static COUNTING_INFO: SourceInfo = SourceInfo {
        name: "counting",
        description: "counts invocations",
        rationale: "test fixture",
        category: SourceCategory::Static,
        platform: Platform::Any,
        blocking: false,
    };

    struct Counting(Arc<AtomicUsize>);

    impl EntropySource for Counting {
        fn info(&self) -> &SourceInfo {
            &COUNTING_INFO
        }
        fn sample(&self) -> std::result::Result<String, SourceError> {
            Ok(self.0.fetch_add(1, Ordering::SeqCst).to_string())
        }
    }

    struct Broken;

    impl EntropySource for Broken {
        fn info(&self) -> &SourceInfo {
            &COUNTING_INFO
        }
        fn sample(&self) -> std::result::Result<String, SourceError> {
            Err(SourceError::Unavailable("broken".into()))
        }
    }

    fn foobar() -> IdentifierGenerator {
        let generator = IdentifierGenerator::default();
        generator
            .register_source(Box::new(LiteralSource::new("foo")), "source_a")
            .unwrap();
        generator
            .register_source(Box::new(LiteralSource::new("bar")), "source_b")
            .unwrap();
        generator
    }

    #[test]
    fn foobar_end_to_end() {
        let generation = foobar().generate(DigestAlgorithm::Sha256).unwrap();
        assert_eq!(generation.diagnostics.canonical, "foobar");
        assert_eq!(
            generation.identifier.to_hex(),
            "c3ab8ff13720e8ad9047dd39466b3c8974e592c2fa383d4a3960714caef0c4f2"
        );
        assert!(!generation.diagnostics.has_failures());
    }

    #[test]
    fn generate_is_deterministic_for_constant_sources() {
        let generator = foobar();
        let a = generator.generate(DigestAlgorithm::Sha512).unwrap();
        let b = generator.generate(DigestAlgorithm::Sha512).unwrap();
        assert_eq!(a.identifier, b.identifier);
    }

    #[test]
    fn swapping_order_changes_identifier() {
        let swapped = IdentifierGenerator::default();
        swapped
            .register_source(Box::new(LiteralSource::new("bar")), "source_b")
            .unwrap();
        swapped
            .register_source(Box::new(LiteralSource::new("foo")), "source_a")
            .unwrap();
        let a = foobar().generate(DigestAlgorithm::Sha256).unwrap();
        let b = swapped.generate(DigestAlgorithm::Sha256).unwrap();
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn empty_registry_digests_empty_stream() {
        let generation = IdentifierGenerator::default()
            .generate(DigestAlgorithm::Sha256)
            .unwrap();
        assert_eq!(generation.identifier.as_bytes().len(), 32);
        assert_eq!(generation.identifier.to_hex().len(), 64);
        assert_eq!(generation.diagnostics.canonical, "");
        assert!(!generation.diagnostics.all_failed);
    }

    #[test]
    fn failing_source_is_isolated() {
        let generator = foobar();
        generator.register_source(Box::new(Broken), "broken").unwrap();
        let generation = generator.generate(DigestAlgorithm::Sha256).unwrap();
        assert_eq!(generation.diagnostics.failed_sources, vec!["broken"]);
        assert_eq!(generation.diagnostics.canonical, "foobar0");
        assert_eq!(generation.identifier.to_hex().len(), 64);
        assert!(!generation.diagnostics.all_failed);
    }

    #[test]
    fn all_failed_is_flagged() {
        let generator = IdentifierGenerator::default();
        generator.register_source(Box::new(Broken), "x").unwrap();
        generator.register_source(Box::new(Broken), "y").unwrap();
        let generation = generator.generate(DigestAlgorithm::Sha256).unwrap();
        assert!(generation.diagnostics.all_failed);
        assert_eq!(generation.diagnostics.canonical, "00");
    }

    #[test]
    fn unsupported_algorithm_samples_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = IdentifierGenerator::default();
        generator
            .register_source(Box::new(Counting(Arc::clone(&calls))), "counting")
            .unwrap();

        let err = generator.generate_named("md5").unwrap_err();
        assert!(matches!(err, GuidError::UnsupportedAlgorithm(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.registry().names(), vec!["counting"]);
    }

    #[test]
    fn unregister_through_facade() {
        let generator = foobar();
        generator.unregister_source("source_a").unwrap();
        let generation = generator.generate_named("sha256").unwrap();
        assert_eq!(generation.diagnostics.canonical, "bar");
        assert!(matches!(
            generator.unregister_source("source_a"),
            Err(GuidError::NotFound(_))
        ));
    }

    #[test]
    fn custom_sentinel_is_used() {
        let generator = IdentifierGenerator::with_aggregator(
            SourceRegistry::new(),
            SampleAggregator::with_sentinel("<none>"),
        );
        generator.register_source(Box::new(Broken), "x").unwrap();
        let generation = generator.generate(DigestAlgorithm::Sha256).unwrap();
        assert_eq!(generation.diagnostics.canonical, "<none>");
    }

    #[test]
    fn concurrent_generate_calls() {
        let generator = Arc::new(foobar());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || {
                    generator
                        .generate(DigestAlgorithm::Sha256)
                        .unwrap()
                        .identifier
                        .to_hex()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(
                h.join().unwrap(),
                "c3ab8ff13720e8ad9047dd39466b3c8974e592c2fa383d4a3960714caef0c4f2"
            );
        }
    }

    #[test]
    fn diagnostics_serialize_to_json() {
        let generator = foobar();
        generator.register_source(Box::new(Broken), "broken").unwrap();
        let generation = generator.generate(DigestAlgorithm::Sha256).unwrap();
        let json = serde_json::to_value(&generation).unwrap();
        assert_eq!(json["algorithm"], "sha256");
        assert_eq!(json["diagnostics"]["canonical"], "foobar0");
        assert_eq!(json["diagnostics"]["fragments"][2]["source"], "broken");
        assert_eq!(json["diagnostics"]["failed_sources"], serde_json::json!(["broken"]));
        assert_eq!(json["diagnostics"]["all_failed"], false);
        assert!(json["identifier"].as_str().unwrap().len() == 64);
    }

    #[test]
    fn all_failed_is_serialized() {
        let generator = IdentifierGenerator::default();
        generator.register_source(Box::new(Broken), "only").unwrap();
        let generation = generator.generate(DigestAlgorithm::Sha256).unwrap();
        let json = serde_json::to_value(&generation.diagnostics).unwrap();
        assert_eq!(json["all_failed"], true);
        assert_eq!(json["failed_sources"], serde_json::json!(["only"]));
        assert_eq!(json["canonical"], "0");
    }
}
