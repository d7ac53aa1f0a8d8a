//! # wtrie
//!
//! A weighted set of 256-bit keys with selection by cumulative weight.
//!
//! Every stored key carries a positive `u64` weight. On top of the usual
//! add / contains / remove, the structure answers one query a plain map
//! cannot: *given an offset into the combined weight of all entries, which
//! entry's span covers it?* Because the trie keeps a weight subtotal in
//! every internal node, that resolves in a single root-to-leaf descent
//! rather than a scan, which makes weighted random selection over large,
//! churning sets cheap.
//!
//! Keys are opaque 32-byte values, typically hashes or transaction ids.
//! The trie consumes them 4 bits at a time, so descent depth is bounded by
//! 64 and in practice stays near `log16(n)` for hash-like keys.
//!
//! ## Example
//!
//! ```rust
//! use wtrie::{Key256, WeightedTrie};
//!
//! let mut trie = WeightedTrie::new();
//! trie.add(Key256::from_bytes([0xaa; 32]), 12);
//! trie.add(Key256::from_bytes([0xbb; 32]), 100);
//! trie.add(Key256::from_bytes([0xcc; 32]), 8);
//!
//! assert!(trie.contains(&Key256::from_bytes([0xaa; 32])));
//! assert_eq!(trie.total_weight(), 120);
//!
//! // Each entry owns a contiguous span of the 120 weight units; offset 60
//! // can only fall inside the span of the weight-100 entry.
//! let picked = trie.get_by_cumulative_weight(60).copied();
//! assert_eq!(picked, Some(Key256::from_bytes([0xbb; 32])));
//!
//! assert!(trie.remove(&Key256::from_bytes([0xbb; 32])));
//! assert_eq!(trie.total_weight(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod debug;
pub mod key;
mod node;
pub mod trie;

pub use key::Key256;
pub use trie::{TrieStats, WeightedTrie};

use parking_lot::RwLock;

/// A [`WeightedTrie`] behind a single read-write lock.
///
/// The trie itself is strictly single-writer: a mutation rewrites weight
/// subtotals along an unpredictable root-to-leaf path, so concurrent use
/// has to serialize whole operations. This wrapper does exactly that with
/// a [`parking_lot::RwLock`]: queries share the read lock, mutations take
/// the write lock. Query results are copied out so no borrow outlives the
/// lock.
#[derive(Default)]
pub struct SharedWeightedTrie {
    inner: RwLock<WeightedTrie>,
}

impl SharedWeightedTrie {
    /// Creates an empty shared trie.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(WeightedTrie::new()),
        }
    }

    /// See [`WeightedTrie::add`].
    pub fn add(&self, key: Key256, weight: u64) -> bool {
        self.inner.write().add(key, weight)
    }

    /// See [`WeightedTrie::contains`].
    pub fn contains(&self, key: &Key256) -> bool {
        self.inner.read().contains(key)
    }

    /// See [`WeightedTrie::get_by_cumulative_weight`]. The key is returned
    /// by value; the lock is released before this returns.
    pub fn get_by_cumulative_weight(&self, offset: u64) -> Option<Key256> {
        self.inner.read().get_by_cumulative_weight(offset).copied()
    }

    /// See [`WeightedTrie::remove`].
    pub fn remove(&self, key: &Key256) -> bool {
        self.inner.write().remove(key)
    }

    /// See [`WeightedTrie::total_weight`].
    pub fn total_weight(&self) -> u64 {
        self.inner.read().total_weight()
    }

    /// See [`WeightedTrie::len`].
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// See [`WeightedTrie::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`WeightedTrie::stats`].
    pub fn stats(&self) -> TrieStats {
        self.inner.read().stats()
    }
}


#[cfg(test)]
mod proptests;
