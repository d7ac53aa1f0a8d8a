//! Trie node model.
//!
//! Nodes come in exactly two shapes. A leaf stores one `(key, weight)`
//! entry; an internal node fans out over 16 child slots and carries the
//! combined weight of every leaf below it. In a populated trie most nodes
//! are leaves, so keeping the child array out of the leaf variant is what
//! keeps the structure compact.

use crate::key::Key256;

/// Child slots per internal node: one 4-bit nibble is consumed per level.
pub(crate) const FANOUT: usize = 16;

/// Maximum descent depth: 64 nibbles fully determine a 256-bit key.
pub(crate) const MAX_DEPTH: usize = Key256::LEN * 2;

// Every level consumes exactly 4 bits, so MAX_DEPTH levels consume the
// whole key and slot selection never has to wrap the byte index.
const _: () = assert!(MAX_DEPTH * 4 == Key256::LEN * 8);

/// The child array of an internal node. A slot owns at most one subtree.
pub(crate) type Children = [Option<Box<Node>>; FANOUT];

/// A node in the weighted trie.
#[derive(Clone)]
pub(crate) enum Node {
    /// One stored entry. Weight is positive.
    Leaf { key: Key256, weight: u64 },
    /// A fan-out point. `weight` is the sum of the weights of all leaves
    /// reachable below it. The child array is boxed so the two variants
    /// stay close in size.
    Internal { weight: u64, children: Box<Children> },
}

impl Node {
    pub(crate) fn new_leaf(key: Key256, weight: u64) -> Self {
        Node::Leaf { key, weight }
    }

    pub(crate) fn new_internal(weight: u64) -> Self {
        Node::Internal {
            weight,
            children: empty_children(),
        }
    }

    /// The entry weight of a leaf, or the subtree total of an internal node.
    pub(crate) fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Pushes a leaf one level down: the leaf is re-parked under a fresh
    /// internal node of the same weight, in the slot its own key selects
    /// at `level`. Internal nodes pass through unchanged.
    pub(crate) fn pushed_down(self: Box<Self>, level: usize) -> Box<Self> {
        let slot = match &*self {
            Node::Leaf { key, .. } => slot_index(key, level),
            Node::Internal { .. } => return self,
        };
        let weight = self.weight();
        let mut children = empty_children();
        children[slot] = Some(self);
        Box::new(Node::Internal { weight, children })
    }
}

fn empty_children() -> Box<Children> {
    Box::new(std::array::from_fn(|_| None))
}

/// Returns the child slot `key` selects at `level`.
///
/// Level `2i` reads the low nibble of byte `i`, level `2i + 1` the high
/// nibble. All four operations derive their descent through this one
/// function, so every key has exactly one possible location in the trie.
#[inline]
pub(crate) fn slot_index(key: &Key256, level: usize) -> usize {
    debug_assert!(level < MAX_DEPTH, "descent past the key's nibble space");
    let byte = key.as_bytes()[level / 2];
    let shift = (level & 1) * 4;
    usize::from((byte >> shift) & 0xF)
}
