//! ProcessIdentitySource: process id and user id of the caller.
//!
//! **Output:** `{pid}:{uid}` on Unix, `{pid}` elsewhere.

use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const PROCESS_IDENTITY: &str = "process_identity";

/// Reports who is generating the identifier.
pub struct ProcessIdentitySource;

static PROCESS_IDENTITY_INFO: SourceInfo = SourceInfo {
    name: PROCESS_IDENTITY,
    description: "Process id and user id of the generating process",
    rationale: "Concurrent generators on one host run as different processes, \
                and often as different users.",
    category: SourceCategory::Context,
    platform: Platform::Unix,
    blocking: false,
};

#[cfg(unix)]
fn user_id() -> Option<u32> {
    // SAFETY: getuid() has no preconditions and cannot fail.
    Some(unsafe { libc::getuid() })
}

#[cfg(not(unix))]
fn user_id() -> Option<u32> {
    None
}

impl EntropySource for ProcessIdentitySource {
    fn info(&self) -> &SourceInfo {
        &PROCESS_IDENTITY_INFO
    }

    fn sample(&self) -> Result<String, SourceError> {
        let pid = std::process::id();
        Ok(match user_id() {
            Some(uid) => format!("{pid}:{uid}"),
            None => pid.to_string(),
        })
    }
}
