//! The 128-bit document fingerprint.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::FINGERPRINT_BITS;

/// SimHash fingerprint of one document.
///
/// Bit `b` (significance, LSB = 0) is the sign of the document's summed
/// token votes at position `b`, with zero resolving to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub u128);

impl Fingerprint {
    /// Fingerprint of a document with no tokens: every position ties at zero.
    pub const EMPTY: Fingerprint = Fingerprint(u128::MAX);

    /// Raw bits
    #[inline]
    pub fn bits(self) -> u128 {
        self.0
    }

    /// Hamming distance (XOR + popcount)
    #[inline]
    pub fn hamming_distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Sub-value of `width` bits starting at bit offset `offset`
    #[inline]
    pub fn slice(self, offset: usize, width: usize) -> u128 {
        debug_assert!(offset + width <= FINGERPRINT_BITS);
        let mask = if width >= FINGERPRINT_BITS {
            u128::MAX
        } else {
            (1u128 << width) - 1
        };
        (self.0 >> offset) & mask
    }

    /// Parse the 32-digit hex form produced by `Display`
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != FINGERPRINT_BITS / 4 {
            return None;
        }
        u128::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl From<u128> for Fingerprint {
    fn from(bits: u128) -> Self {
        Self(bits)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid fingerprint hex: {hex}")))
    }
}
