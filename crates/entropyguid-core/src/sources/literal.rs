//! LiteralSource: a constant string.
//!
//! Carries no entropy. It marks the "age" of the implementation (publisher and
//! version), so that a future revision of the source set yields a disjoint
//! identifier space. Also handy as a fixed fragment in tests.

use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const LITERAL: &str = "literal";

/// Default kick-starter text.
pub const DEFAULT_LITERAL: &str = "entropyguid::1";

pub struct LiteralSource {
    text: String,
}

static LITERAL_INFO: SourceInfo = SourceInfo {
    name: LITERAL,
    description: "Constant publisher/version marker",
    rationale: "Not a source of entropy; separates identifier spaces of \
                different implementations and revisions.",
    category: SourceCategory::Static,
    platform: Platform::Any,
    blocking: false,
};

impl LiteralSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// `"{publisher}::{version}"`.
    pub fn versioned(publisher: &str, version: u32) -> Self {
        Self::new(format!("{publisher}::{version}"))
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for LiteralSource {
    fn default() -> Self {
        Self::new(DEFAULT_LITERAL)
    }
}

impl EntropySource for LiteralSource {
    fn info(&self) -> &SourceInfo {
        &LITERAL_INFO
    }

    fn sample(&self) -> Result<String, SourceError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_text_verbatim() {
        assert_eq!(LiteralSource::new("foo").sample().unwrap(), "foo");
        assert_eq!(LiteralSource::new("").sample().unwrap(), "");
    }

    #[test]
    fn versioned_format() {
        assert_eq!(LiteralSource::versioned("example.org", 3).text(), "example.org::3");
        assert_eq!(LiteralSource::default().text(), DEFAULT_LITERAL);
    }
}
