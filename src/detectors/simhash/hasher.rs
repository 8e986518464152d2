//! Token hash functions expanded to 128-bit digests.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use md5::Md5;
use sha2::{Digest, Sha256};
use xxhash_rust::xxh3::xxh3_128;

/// Hash function used to derive a token's contribution vector.
///
/// Every variant is unseeded and deterministic, so fingerprints are
/// reproducible across runs and processes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TokenHasher {
    /// XXH3 with 128-bit output
    #[default]
    Xxh3,
    /// BLAKE3, first 16 bytes of the digest
    Blake3,
    /// SHA-256, first 16 bytes of the digest
    Sha256,
    /// MD5, the full 16-byte digest
    Md5,
}

impl TokenHasher {
    /// Hash a token to 128 bits.
    pub fn digest(self, token: &str) -> u128 {
        let bytes = token.as_bytes();
        match self {
            Self::Xxh3 => xxh3_128(bytes),
            Self::Blake3 => leading_u128(blake3::hash(bytes).as_bytes()),
            Self::Sha256 => leading_u128(&Sha256::digest(bytes)),
            Self::Md5 => leading_u128(&Md5::digest(bytes)),
        }
    }

    /// Stable lowercase name, as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Self::Xxh3 => "xxh3",
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
            Self::Md5 => "md5",
        }
    }
}

/// Big-endian interpretation of the first 16 digest bytes.
fn leading_u128(digest: &[u8]) -> u128 {
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(buf)
}
