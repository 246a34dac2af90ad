//! DirectoryCountSource: number of entries in a directory.
//!
//! **Output:** decimal entry count, `.` and `..` excluded. Reading the
//! working directory needs no special privileges and tends to differ between
//! deployments.

use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const DIRECTORY_COUNT: &str = "directory_count";

/// Counts the entries of one directory.
pub struct DirectoryCountSource {
    dir: PathBuf,
}

static DIRECTORY_COUNT_INFO: SourceInfo = SourceInfo {
    name: DIRECTORY_COUNT,
    description: "Number of entries in the working directory",
    rationale: "A context value readable without escalated privileges that \
                tends to differ between two deployments of the same program.",
    category: SourceCategory::Context,
    platform: Platform::Any,
    blocking: false,
};

impl DirectoryCountSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for DirectoryCountSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl EntropySource for DirectoryCountSource {
    fn info(&self) -> &SourceInfo {
        &DIRECTORY_COUNT_INFO
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }

    fn sample(&self) -> Result<String, SourceError> {
        let count = std::fs::read_dir(&self.dir)?.count();
        Ok(count.to_string())
    }
}
