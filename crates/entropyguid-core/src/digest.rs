//! Digest step: canonical stream bytes → fixed-length [`Identifier`].
//!
//! Only SHA-2 family members are offered. MD5 and other 128-bit hashes are
//! rejected rather than silently substituted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512, Sha512_256};

use crate::error::GuidError;

/// Hash function used to condense the canonical stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DigestAlgorithm {
    /// SHA-256 (default). 32-byte output.
    #[default]
    Sha256,
    /// SHA-384. 48-byte output.
    Sha384,
    /// SHA-512. 64-byte output.
    Sha512,
    /// SHA-512/256. 32-byte output.
    Sha512_256,
}

impl DigestAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [DigestAlgorithm; 4] = [
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha512_256,
    ];

    /// Digest size in bytes.
    pub const fn output_size(self) -> usize {
        match self {
            Self::Sha256 | Self::Sha512_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_256 => "sha512_256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = GuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha384" | "sha-384" => Ok(Self::Sha384),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            "sha512_256" | "sha512/256" | "sha-512/256" => Ok(Self::Sha512_256),
            _ => Err(GuidError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = GuidError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DigestAlgorithm> for String {
    fn from(a: DigestAlgorithm) -> Self {
        a.as_str().to_string()
    }
}

/// Final fixed-length identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

impl Identifier {
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes; always `algorithm().output_size()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Lowercase hex, two digits per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Identifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Maps bytes to identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestEngine;

impl DigestEngine {
    /// Hash `bytes` with `algorithm`.
    pub fn digest(bytes: &[u8], algorithm: DigestAlgorithm) -> Identifier {
        let bytes = match algorithm {
            DigestAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(bytes).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(bytes).to_vec(),
            DigestAlgorithm::Sha512_256 => Sha512_256::digest(bytes).to_vec(),
        };
        Identifier { algorithm, bytes }
    }

    /// Hash `bytes` with the algorithm called `name`.
    pub fn digest_named(bytes: &[u8], name: &str) -> Result<Identifier, GuidError> {
        Ok(Self::digest(bytes, name.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const SHA256_FOOBAR: &str = "c3ab8ff13720e8ad9047dd39466b3c8974e592c2fa383d4a3960714caef0c4f2";
    const SHA512_EMPTY: &str = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
                                47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e";

    #[test]
    fn sha256_known_vectors() {
        assert_eq!(DigestEngine::digest(b"", DigestAlgorithm::Sha256).to_hex(), SHA256_EMPTY);
        assert_eq!(
            DigestEngine::digest(b"foobar", DigestAlgorithm::Sha256).to_hex(),
            SHA256_FOOBAR
        );
    }

    #[test]
    fn sha512_known_vector() {
        assert_eq!(DigestEngine::digest(b"", DigestAlgorithm::Sha512).to_hex(), SHA512_EMPTY);
    }

    #[test]
    fn output_lengths_match_algorithm() {
        let inputs: [&[u8]; 3] = [b"", b"x", b"a much longer canonical stream 1234567890"];
        for algorithm in DigestAlgorithm::ALL {
            for input in inputs {
                let id = DigestEngine::digest(input, algorithm);
                assert_eq!(id.as_bytes().len(), algorithm.output_size());
                assert_eq!(id.to_hex().len(), 2 * algorithm.output_size());
                assert_eq!(id.algorithm(), algorithm);
            }
        }
    }

    #[test]
    fn hex_is_lowercase() {
        let hex = DigestEngine::digest(b"foobar", DigestAlgorithm::Sha384).to_hex();
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("sha256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("sha-384".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha384);
        assert_eq!("sha512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
        assert_eq!(
            "sha-512/256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha512_256
        );
    }

    #[test]
    fn md5_is_unsupported() {
        let err = "md5".parse::<DigestAlgorithm>().unwrap_err();
        assert!(matches!(err, GuidError::UnsupportedAlgorithm(ref n) if n == "md5"));
        assert!(DigestEngine::digest_named(b"foobar", "md5").is_err());
        assert!(DigestEngine::digest_named(b"foobar", "").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for algorithm in DigestAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<DigestAlgorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn default_is_sha256() {
        assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Sha256);
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&DigestAlgorithm::Sha512_256).unwrap();
        assert_eq!(json, "\"sha512_256\"");
        let back: DigestAlgorithm = serde_json::from_str("\"sha-384\"").unwrap();
        assert_eq!(back, DigestAlgorithm::Sha384);
        assert!(serde_json::from_str::<DigestAlgorithm>("\"md5\"").is_err());
    }
}
