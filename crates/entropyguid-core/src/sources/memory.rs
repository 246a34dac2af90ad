//! HeapAddressSource: the address of a fresh heap allocation.
//!
//! **Output:** `0x`-prefixed lowercase hex pointer, e.g. `0x5581d2a3c9f0`.
//! ASLR and allocator state make the value differ between runs; sandboxes
//! with ASLR disabled weaken it considerably.

use crate::error::SourceError;
use crate::source::{EntropySource, Platform, SourceCategory, SourceInfo};

pub const HEAP_ADDRESS: &str = "heap_address";

/// Allocates a single byte and reports where it landed.
pub struct HeapAddressSource;

static HEAP_ADDRESS_INFO: SourceInfo = SourceInfo {
    name: HEAP_ADDRESS,
    description: "Address of a freshly allocated heap object",
    rationale: "Address-space layout randomization and allocator history make \
                it unlikely that two runs place an allocation at the same \
                address.",
    category: SourceCategory::Memory,
    platform: Platform::Any,
    blocking: false,
};

impl EntropySource for HeapAddressSource {
    fn info(&self) -> &SourceInfo {
        &HEAP_ADDRESS_INFO
    }

    fn sample(&self) -> Result<String, SourceError> {
        let allocation = std::hint::black_box(Box::new(0u8));
        Ok(format!("{:p}", &*allocation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_hex_pointer() {
        let s = HeapAddressSource.sample().unwrap();
        let digits = s.strip_prefix("0x").expect("pointer prefix");
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn info() {
        assert_eq!(HeapAddressSource.name(), "heap_address");
        assert_eq!(HeapAddressSource.info().category, SourceCategory::Memory);
    }
}
