//! Property-based tests for RedBlackDict.
//!
//! These tests check that every mutation keeps the red-black invariants and
//! that the dictionary agrees with `std::collections::BTreeMap` as a model.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use rbdict::persistent::RedBlackDict;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Store(i16, i32),
    Erase(i16),
}

/// Small keys so that erasures regularly hit stored keys.
fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-64i16..64, any::<i32>()).prop_map(|(key, value)| Operation::Store(key, value)),
        2 => (-64i16..64).prop_map(Operation::Erase),
    ]
}

fn arbitrary_dict(max_size: usize) -> impl Strategy<Value = RedBlackDict<i32, i32>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect::<RedBlackDict<i32, i32>>())
}

// =============================================================================
// Invariant Laws
// =============================================================================

proptest! {
    /// Law: any sequence of store/erase keeps every invariant and matches
    /// the model after each step.
    #[test]
    fn prop_operations_keep_invariants(
        operations in prop::collection::vec(operation(), 0..200)
    ) {
        let mut dict = RedBlackDict::new();
        let mut model = BTreeMap::new();
        for operation in operations {
            match operation {
                Operation::Store(key, value) => {
                    dict = dict.store(key, value);
                    model.insert(key, value);
                }
                Operation::Erase(key) => {
                    dict = dict.erase(&key);
                    model.remove(&key);
                }
            }
            prop_assert!(dict.verify().is_ok(), "{:?}", dict.verify());
        }
        let expected: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(dict.to_list(), expected);
    }

    /// Law: to_list is strictly ascending.
    #[test]
    fn prop_to_list_strictly_ascending(dict in arbitrary_dict(100)) {
        let keys = dict.fetch_keys();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: from_list(to_list(dict)) has the same entries.
    #[test]
    fn prop_list_round_trip(dict in arbitrary_dict(100)) {
        let rebuilt = RedBlackDict::from_list(dict.to_list());
        prop_assert_eq!(rebuilt.to_list(), dict.to_list());
        prop_assert!(rebuilt.verify().is_ok());
    }

    /// Law: size(dict) == to_list(dict).len()
    #[test]
    fn prop_size_matches_list(dict in arbitrary_dict(100)) {
        prop_assert_eq!(dict.size(), dict.to_list().len());
    }
}

// =============================================================================
// Membership Laws
// =============================================================================

proptest! {
    /// Law: find after store returns the stored value.
    #[test]
    fn prop_find_after_store(dict in arbitrary_dict(50), key: i32, value: i32) {
        let stored = dict.store(key, value);
        prop_assert_eq!(stored.find(&key), Some(&value));
        prop_assert!(stored.is_key(&key));
    }

    /// Law: erase(k, store(k, v, dict)) has the keys of dict minus k.
    #[test]
    fn prop_erase_after_store(dict in arbitrary_dict(50), key: i32, value: i32) {
        let erased = dict.store(key, value).erase(&key);
        let mut expected: BTreeSet<i32> = dict.keys().copied().collect();
        expected.remove(&key);
        prop_assert_eq!(erased.fetch_keys(), expected.into_iter().collect::<Vec<_>>());
        prop_assert!(erased.verify().is_ok());
    }

    /// Law: erase does not affect other keys.
    #[test]
    fn prop_erase_keeps_other_keys(dict in arbitrary_dict(50), key1: i32, key2: i32) {
        prop_assume!(key1 != key2);
        let erased = dict.erase(&key1);
        prop_assert_eq!(erased.find(&key2), dict.find(&key2));
    }
}

// =============================================================================
// Persistence Laws
// =============================================================================

proptest! {
    /// Law: store and erase never change an earlier snapshot.
    #[test]
    fn prop_snapshots_unchanged(
        dict in arbitrary_dict(50),
        key: i32,
        value: i32
    ) {
        let before = dict.to_list();
        let _stored = dict.store(key, value);
        let _erased = dict.erase(&key);
        prop_assert_eq!(dict.to_list(), before);
    }
}

// =============================================================================
// Traversal Laws
// =============================================================================

proptest! {
    /// Law: filter keeps exactly the keys satisfying the predicate.
    #[test]
    fn prop_filter_agrees_with_predicate(dict in arbitrary_dict(100), modulus in 1i32..5) {
        let filtered = dict.filter(|key, _| key % modulus == 0);
        let expected: Vec<i32> = dict
            .keys()
            .copied()
            .filter(|key| key % modulus == 0)
            .collect();
        prop_assert_eq!(filtered.fetch_keys(), expected);
        prop_assert!(filtered.verify().is_ok());
    }

    /// Law: itera with an always-resuming visitor agrees with fold.
    #[test]
    fn prop_itera_agrees_with_fold(dict in arbitrary_dict(100)) {
        let by_fold = dict.fold(0i64, |_, value, sum| sum + i64::from(*value));
        let by_itera = dict.itera(0i64, |_, value, sum, rest| rest.resume(sum + i64::from(*value)));
        prop_assert_eq!(by_fold, by_itera);
    }

    /// Law: merge contains the union of both key sets.
    #[test]
    fn prop_merge_union(left in arbitrary_dict(50), right in arbitrary_dict(50)) {
        let merged = left.merge(&right, |_, a, _| *a);
        let expected: BTreeSet<i32> = left.keys().chain(right.keys()).copied().collect();
        prop_assert_eq!(merged.fetch_keys(), expected.into_iter().collect::<Vec<_>>());
        for (key, value) in &left {
            prop_assert_eq!(merged.find(key), Some(value));
        }
        prop_assert!(merged.verify().is_ok());
    }
}
