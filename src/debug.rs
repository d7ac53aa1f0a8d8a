//! Diagnostics: structural dump and invariant verification.
//!
//! Nothing here is needed in the hot path. `dump` exists for eyeballing
//! small tries; `verify_integrity` re-derives every structural invariant
//! from scratch and is leaned on heavily by the tests.

use smallvec::SmallVec;

use crate::node::{slot_index, Node, MAX_DEPTH};
use crate::trie::WeightedTrie;

/// Slot path from the root to the node under inspection. Bounded by the
/// maximum descent depth, so it never spills to the heap.
type Path = SmallVec<[u8; MAX_DEPTH]>;

impl WeightedTrie {
    /// Prints the tree to stdout, depth first, one node per line. Intended
    /// for debugging small tries.
    pub fn dump(&self) {
        println!("=== WeightedTrie ===");
        println!("entries: {}, total weight: {}", self.len(), self.total_weight());
        match self.root() {
            Some(root) => dump_node(root, None, 0),
            None => println!("(empty)"),
        }
        println!("====================");
    }

    /// Checks every structural invariant and returns a description of each
    /// violation found. An empty result means the trie is sound.
    ///
    /// Verified per node: internal weights equal the sum of their children,
    /// no weight is zero, no internal node is childless or deeper than the
    /// key's nibble space, and every leaf sits on exactly the path its own
    /// key selects. The leaf count is also checked against [`len`](Self::len).
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut leaves = 0usize;
        if let Some(root) = self.root() {
            let mut path = Path::new();
            verify_node(root, &mut path, &mut leaves, &mut issues);
        }
        if leaves != self.len() {
            issues.push(format!(
                "trie reports {} entries but holds {} leaves",
                self.len(),
                leaves
            ));
        }
        issues
    }
}

fn dump_node(node: &Node, slot: Option<usize>, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = match slot {
        Some(slot) => format!("[{:x}] ", slot),
        None => String::new(),
    };
    match node {
        Node::Leaf { key, weight } => println!("{}{}{} w={}", indent, label, key, weight),
        Node::Internal { weight, children } => {
            println!("{}{}* w={}", indent, label, weight);
            for (slot, child) in children.iter().enumerate() {
                if let Some(child) = child {
                    dump_node(child, Some(slot), depth + 1);
                }
            }
        }
    }
}

fn verify_node(node: &Node, path: &mut Path, leaves: &mut usize, issues: &mut Vec<String>) {
    match node {
        Node::Leaf { key, weight } => {
            *leaves += 1;
            if *weight == 0 {
                issues.push(format!("leaf {} has zero weight", key));
            }
            // Re-derive the descent path from the leaf's own key; any
            // mismatch means lookups could no longer reach this entry.
            for (level, &slot) in path.iter().enumerate() {
                let expected = slot_index(key, level);
                if usize::from(slot) != expected {
                    issues.push(format!(
                        "leaf {} sits in slot {:x} at level {}, its key selects {:x}",
                        key, slot, level, expected
                    ));
                }
            }
        }
        Node::Internal { weight, children } => {
            if path.len() >= MAX_DEPTH {
                issues.push(format!(
                    "internal node at depth {} exceeds the maximum of {}",
                    path.len(),
                    MAX_DEPTH
                ));
                return;
            }
            if *weight == 0 {
                issues.push(format!("internal node at depth {} has zero weight", path.len()));
            }
            let mut child_sum = 0u64;
            let mut child_count = 0usize;
            for (slot, child) in children.iter().enumerate() {
                if let Some(child) = child {
                    child_sum += child.weight();
                    child_count += 1;
                    path.push(slot as u8);
                    verify_node(child, path, leaves, issues);
                    path.pop();
                }
            }
            if child_count == 0 {
                issues.push(format!("internal node at depth {} has no children", path.len()));
            }
            if child_sum != *weight {
                issues.push(format!(
                    "internal node at depth {} weighs {} but its children sum to {}",
                    path.len(),
                    weight,
                    child_sum
                ));
            }
        }
    }
}
