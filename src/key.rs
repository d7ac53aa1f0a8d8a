//! Fixed-width 256-bit keys.
//!
//! A [`Key256`] is an opaque 32-byte identifier: the trie compares keys by
//! byte equality and consumes them as a sequence of 4-bit nibbles, and
//! nothing in this crate interprets the bytes numerically. The hex
//! rendering exists for diagnostics only.

use std::fmt;

/// An opaque 256-bit identifier.
///
/// Typical sources are hashes or transaction ids; from this crate's point
/// of view a key is just 32 bytes with equality. The all-zero key is as
/// valid as any other.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Key256([u8; 32]);

impl Key256 {
    /// Width of a key in bytes.
    pub const LEN: usize = 32;

    /// Creates a key from its raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the key.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Key256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Renders the key as 64 lowercase hex digits, leading byte first.
impl fmt::Display for Key256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Key256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key256({})", self)
    }
}
