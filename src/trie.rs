//! The weighted trie itself.
//!
//! An uncompressed 16-ary trie over the nibbles of a [`Key256`]. Each
//! internal node carries the combined weight of every leaf below it, which
//! is what lets a cumulative-weight offset resolve to a key in a single
//! root-to-leaf descent: at each node, skip children until the remaining
//! offset falls inside one child's span, then descend into it.
//!
//! Descent depth is the length of the longest nibble prefix the probed key
//! shares with stored keys, at most 64. For hash-like keys that is close
//! to `log16(n)`, so all four operations behave logarithmically in the
//! number of entries.

use std::mem;

use crate::key::Key256;
use crate::node::{slot_index, Children, Node};

/// Size and shape diagnostics for a [`WeightedTrie`], computed by a full
/// walk in [`WeightedTrie::stats`].
#[derive(Debug, Clone, Default)]
pub struct TrieStats {
    /// Number of leaf nodes; equals the number of stored entries.
    pub leaf_nodes: usize,
    /// Number of internal fan-out nodes.
    pub internal_nodes: usize,
    /// Deepest node, counted in edges from the root. A lone root leaf has
    /// depth 0; the hard ceiling is 64.
    pub max_depth: usize,
    /// Estimated heap footprint of all nodes, excluding allocator overhead.
    pub node_bytes: usize,
}

/// A weighted set of 256-bit keys, indexable by cumulative weight.
///
/// Every stored key carries a positive `u64` weight. Besides membership
/// tests, the structure answers one extra query: given an offset into the
/// total weight, return the key whose weight span covers that offset (see
/// [`get_by_cumulative_weight`](Self::get_by_cumulative_weight)). Feeding
/// it uniformly random offsets selects keys with probability proportional
/// to their weight, without ever materializing a flat weighted list.
///
/// Keys are located purely by their own nibbles, so equal content always
/// means the same position: there is exactly one trie shape for any set of
/// entries, independent of insertion order.
#[derive(Clone, Default)]
pub struct WeightedTrie {
    root: Option<Box<Node>>,
    /// Stored entry count, tracked here so size queries skip the walk.
    len: usize,
}

impl WeightedTrie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Inserts `key` with the given weight.
    ///
    /// Returns `false` and changes nothing if `weight` is zero (a span of
    /// length zero could never be selected) or if the key is already
    /// present. A stored weight never changes in place; remove the key and
    /// re-add it to reweight.
    pub fn add(&mut self, key: Key256, weight: u64) -> bool {
        if weight == 0 || self.contains(&key) {
            return false;
        }
        Self::add_at(&mut self.root, &key, weight, 0);
        self.len += 1;
        true
    }

    fn add_at(slot: &mut Option<Box<Node>>, key: &Key256, weight: u64, level: usize) {
        match slot.as_deref_mut() {
            None => *slot = Some(Box::new(Node::new_leaf(*key, weight))),
            Some(Node::Internal { weight: subtotal, children }) => {
                // Account for the incoming entry on the way down, so every
                // node on the path keeps weight == sum of leaves below.
                *subtotal += weight;
                Self::add_at(&mut children[slot_index(key, level)], key, weight, level + 1);
            }
            Some(Node::Leaf { .. }) => {
                // A leaf cannot take children. Push the resident down one
                // level and retry; the recursion repeats this while the
                // resident keeps sharing nibbles with the new key. The two
                // keys differ somewhere, so this terminates before the
                // nibbles run out.
                let resident = slot.take().expect("slot holds the leaf just matched");
                *slot = Some(resident.pushed_down(level));
                Self::add_at(slot, key, weight, level);
            }
        }
    }

    /// Membership test.
    ///
    /// A key's nibbles fully determine where it can live, so the walk ends
    /// at the only possible location: reaching a leaf compares keys,
    /// reaching an empty slot proves absence.
    pub fn contains(&self, key: &Key256) -> bool {
        let mut node = self.root.as_deref();
        let mut level = 0;
        while let Some(current) = node {
            match current {
                Node::Leaf { key: resident, .. } => return resident == key,
                Node::Internal { children, .. } => {
                    node = children[slot_index(key, level)].as_deref();
                    level += 1;
                }
            }
        }
        false
    }

    /// Resolves a cumulative-weight offset to the key whose span covers it.
    ///
    /// Imagine all entries laid out on an axis from 0 to
    /// [`total_weight`](Self::total_weight), each occupying a contiguous
    /// span as long as its weight, in depth-first slot order. This returns
    /// the key owning the span that contains `offset`, or `None` if the
    /// trie is empty or `offset >= total_weight()`. Out-of-range offsets
    /// are an ordinary boundary outcome, not a failure.
    ///
    /// Drawing `offset` uniformly from `[0, total_weight())` therefore
    /// selects each key with probability `weight / total_weight()`.
    pub fn get_by_cumulative_weight(&self, offset: u64) -> Option<&Key256> {
        let mut node = self.root.as_deref()?;
        if offset >= node.weight() {
            return None;
        }

        // Offset relative to the start of the current node's span. Strictly
        // less than node.weight() on entry to every iteration.
        let mut remaining = offset;
        loop {
            match node {
                Node::Leaf { key, .. } => return Some(key),
                Node::Internal { children, .. } => {
                    let mut chosen = None;
                    for child in children.iter().flatten() {
                        let span = child.weight();
                        if remaining < span {
                            chosen = Some(&**child);
                            break;
                        }
                        remaining -= span;
                    }
                    // Child weights sum to the parent's, so one span
                    // always covers the remainder.
                    node = chosen.expect("child spans cover the parent weight");
                }
            }
        }
    }

    /// Removes `key`, returning whether it was present.
    ///
    /// Absent keys are tolerated: the call returns `false` and changes
    /// nothing. A successful removal subtracts the leaf's weight from
    /// every ancestor, and any ancestor drained to zero is deleted along
    /// with it, so no empty chain is left behind.
    pub fn remove(&mut self, key: &Key256) -> bool {
        if Self::remove_at(&mut self.root, key, 0) == 0 {
            return false;
        }
        self.len -= 1;
        true
    }

    /// Removes `key` from the subtree in `slot` and returns the removed
    /// weight, 0 meaning the key was not there. Weights are settled
    /// post-order: the recursion reports what was removed below, this
    /// level subtracts it, and a node whose weight reaches zero is dropped
    /// by clearing its slot on the way back up.
    fn remove_at(slot: &mut Option<Box<Node>>, key: &Key256, level: usize) -> u64 {
        let removed = match slot.as_deref_mut() {
            None => return 0,
            Some(Node::Leaf { key: resident, weight }) => {
                if resident != key {
                    // The only slot `key` could occupy holds someone else.
                    return 0;
                }
                *weight
            }
            Some(Node::Internal { weight, children }) => {
                let removed = Self::remove_at(&mut children[slot_index(key, level)], key, level + 1);
                *weight -= removed;
                if *weight > 0 {
                    return removed;
                }
                // Drained: the last leaf below just went away. Fall
                // through and delete this node too.
                removed
            }
        };
        if removed > 0 {
            *slot = None;
        }
        removed
    }

    /// Combined weight of all stored entries.
    pub fn total_weight(&self) -> u64 {
        self.root.as_deref().map_or(0, Node::weight)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the trie holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the whole tree and reports node counts, depth and an
    /// estimated memory footprint.
    pub fn stats(&self) -> TrieStats {
        let mut stats = TrieStats::default();
        if let Some(root) = self.root.as_deref() {
            Self::collect_stats(root, 0, &mut stats);
        }
        stats
    }

    fn collect_stats(node: &Node, depth: usize, stats: &mut TrieStats) {
        stats.node_bytes += mem::size_of::<Node>();
        stats.max_depth = stats.max_depth.max(depth);
        match node {
            Node::Leaf { .. } => stats.leaf_nodes += 1,
            Node::Internal { children, .. } => {
                stats.internal_nodes += 1;
                stats.node_bytes += mem::size_of::<Children>();
                for child in children.iter().flatten() {
                    Self::collect_stats(child, depth + 1, stats);
                }
            }
        }
    }

    /// Selects a key with probability proportional to its weight, or
    /// `None` if the trie is empty. Available with the `rand` feature.
    #[cfg(feature = "rand")]
    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Option<&Key256> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        self.get_by_cumulative_weight(rng.gen_range(0..total))
    }

    pub(crate) fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn root_mut(&mut self) -> Option<&mut Node> {
        self.root.as_deref_mut()
    }
}
