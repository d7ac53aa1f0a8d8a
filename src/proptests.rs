use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate(trie: &WeightedTrie) {
    let issues = trie.verify_integrity();
    assert!(issues.is_empty(), "invariant violations: {:?}", issues);
}

/// A small fixed pool of keys. Indices repeat across a generated op
/// sequence, so adds collide with earlier adds and removes actually hit.
/// Two thirds of the pool differ only in the last byte, forcing push-down
/// chains through all 62 shared nibbles; the rest split at the root.
fn pool_key(idx: usize) -> Key256 {
    let mut bytes = match idx % 3 {
        0 => [0x00u8; 32],
        1 => [0x11u8; 32],
        _ => {
            let mut spread = [0x22u8; 32];
            spread[0] = idx as u8;
            spread
        }
    };
    bytes[31] = idx as u8;
    Key256::from_bytes(bytes)
}

#[derive(Clone, Debug)]
enum Op {
    Add(usize, u64),
    Remove(usize),
    Contains(usize),
    /// Query offset as a fraction of the total weight at execution time.
    Query(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (0usize..24, 1u64..=500).prop_map(|(idx, weight)| Op::Add(idx, weight)),
        3 => (0usize..24).prop_map(Op::Remove),
        2 => (0usize..24).prop_map(Op::Contains),
        2 => any::<u16>().prop_map(Op::Query),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any op sequence leaves the trie agreeing with a plain map model,
    /// and with its own invariants intact.
    #[test]
    fn equivalence_with_model(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut trie = WeightedTrie::new();
        let mut model: BTreeMap<[u8; 32], u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Add(idx, weight) => {
                    let key = pool_key(idx);
                    let inserted = trie.add(key, weight);
                    prop_assert_eq!(inserted, !model.contains_key(key.as_bytes()));
                    if inserted {
                        model.insert(*key.as_bytes(), weight);
                    }
                }
                Op::Remove(idx) => {
                    let key = pool_key(idx);
                    prop_assert_eq!(trie.remove(&key), model.remove(key.as_bytes()).is_some());
                }
                Op::Contains(idx) => {
                    let key = pool_key(idx);
                    prop_assert_eq!(trie.contains(&key), model.contains_key(key.as_bytes()));
                }
                Op::Query(fraction) => {
                    let total: u64 = model.values().sum();
                    prop_assert_eq!(trie.total_weight(), total);
                    if total == 0 {
                        prop_assert!(trie.get_by_cumulative_weight(0).is_none());
                    } else {
                        let offset = u64::from(fraction) % total;
                        match trie.get_by_cumulative_weight(offset) {
                            Some(found) => prop_assert!(model.contains_key(found.as_bytes())),
                            None => prop_assert!(
                                false,
                                "offset {} below total {} resolved to nothing",
                                offset,
                                total
                            ),
                        }
                        prop_assert!(trie.get_by_cumulative_weight(total).is_none());
                    }
                }
            }
            prop_assert_eq!(trie.len(), model.len());
        }

        let total: u64 = model.values().sum();
        prop_assert_eq!(trie.total_weight(), total);
        validate(&trie);
    }
}

proptest! {
    /// Sweeping every offset below the total yields each stored key as
    /// exactly one contiguous block the size of its weight.
    #[test]
    fn offsets_partition_into_weight_blocks(
        entries in prop::collection::btree_map(0usize..24, 1u64..=60, 1..12)
    ) {
        let mut trie = WeightedTrie::new();
        for (&idx, &weight) in &entries {
            prop_assert!(trie.add(pool_key(idx), weight));
        }

        let total: u64 = entries.values().sum();
        prop_assert_eq!(trie.total_weight(), total);
        prop_assert!(trie.get_by_cumulative_weight(total).is_none());

        // Fold consecutive equal keys into (key, span) blocks.
        let mut blocks: Vec<([u8; 32], u64)> = Vec::new();
        for offset in 0..total {
            match trie.get_by_cumulative_weight(offset) {
                Some(key) => {
                    let key = *key.as_bytes();
                    match blocks.last_mut() {
                        Some((last, span)) if *last == key => *span += 1,
                        _ => blocks.push((key, 1)),
                    }
                }
                None => prop_assert!(false, "offset {} below total {} resolved to nothing", offset, total),
            }
        }

        // One block per entry: a key never shows up in two places.
        prop_assert_eq!(blocks.len(), entries.len());
        let mut seen: BTreeMap<[u8; 32], u64> = BTreeMap::new();
        for (key, span) in blocks {
            prop_assert!(seen.insert(key, span).is_none());
        }
        let expected: BTreeMap<[u8; 32], u64> = entries
            .iter()
            .map(|(&idx, &weight)| (*pool_key(idx).as_bytes(), weight))
            .collect();
        prop_assert_eq!(seen, expected);
    }
}

fn for_each_permutation(n: usize, visit: &mut dyn FnMut(&[usize])) {
    fn rec(items: &mut Vec<usize>, k: usize, visit: &mut dyn FnMut(&[usize])) {
        if k == items.len() {
            visit(items.as_slice());
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            rec(items, k + 1, visit);
            items.swap(k, i);
        }
    }
    let mut items: Vec<usize> = (0..n).collect();
    rec(&mut items, 0, visit);
}

/// Five keys sharing 62 nibbles, removed in every one of the 120 possible
/// orders: weight subtotals and chain collapse must hold at each step no
/// matter which leaf leaves first.
#[test]
fn every_removal_order_preserves_invariants() {
    let keys: Vec<Key256> = (0..5u8)
        .map(|i| {
            let mut bytes = [0x5a; 32];
            bytes[31] = i;
            Key256::from_bytes(bytes)
        })
        .collect();
    let weight_of = |i: usize| (i as u64 + 1) * 3;

    let mut base = WeightedTrie::new();
    for (i, key) in keys.iter().enumerate() {
        assert!(base.add(*key, weight_of(i)));
    }
    let full_total: u64 = (0..keys.len()).map(weight_of).sum();
    assert_eq!(base.total_weight(), full_total);
    validate(&base);

    for_each_permutation(keys.len(), &mut |order| {
        let mut trie = base.clone();
        let mut remaining = full_total;
        for &i in order {
            assert!(trie.remove(&keys[i]));
            remaining -= weight_of(i);
            assert_eq!(trie.total_weight(), remaining);
            validate(&trie);
        }
        assert!(trie.is_empty());
        assert_eq!(trie.total_weight(), 0);
    });
}
