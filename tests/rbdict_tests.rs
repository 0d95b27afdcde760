//! Integration tests for RedBlackDict.

use std::sync::Once;

use rbdict::persistent::{DictError, Flow, FlowWith, RedBlackDict};
use rstest::{fixture, rstest};

static TRACING: Once = Once::new();

/// Routes library events to the test output when `RUST_LOG` asks for them.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[fixture]
fn letters() -> RedBlackDict<i32, String> {
    init_tracing();
    RedBlackDict::new()
        .store(5, "a".to_string())
        .store(3, "b".to_string())
        .store(8, "c".to_string())
        .store(1, "d".to_string())
}

fn pairs(entries: &[(i32, &str)]) -> Vec<(i32, String)> {
    entries
        .iter()
        .map(|(key, value)| (*key, (*value).to_string()))
        .collect()
}

// =============================================================================
// Scenario
// =============================================================================

#[rstest]
fn test_store_erase_scenario(letters: RedBlackDict<i32, String>) {
    assert_eq!(
        letters.to_list(),
        pairs(&[(1, "d"), (3, "b"), (5, "a"), (8, "c")])
    );
    assert_eq!(letters.size(), 4);

    let erased = letters.erase(&3);
    assert_eq!(erased.to_list(), pairs(&[(1, "d"), (5, "a"), (8, "c")]));
    assert_eq!(erased.size(), 3);
    assert!(erased.verify().is_ok());

    assert_eq!(letters.find(&9), None);
}

#[rstest]
fn test_merge_scenario() {
    let left = RedBlackDict::from_list(pairs(&[(1, "x"), (2, "y")]));
    let right = RedBlackDict::from_list(pairs(&[(2, "z"), (3, "w")]));
    let merged = left.merge(&right, |_, a, b| format!("{a}{b}"));
    assert_eq!(merged.to_list(), pairs(&[(1, "x"), (2, "yz"), (3, "w")]));
}

// =============================================================================
// Persistence
// =============================================================================

#[rstest]
fn test_versions_are_independent(letters: RedBlackDict<i32, String>) {
    let stored = letters.store(4, "e".to_string());
    let erased = letters.erase(&5);
    let updated = letters.update_val(&1, "D".to_string()).unwrap();

    assert_eq!(letters.size(), 4);
    assert_eq!(letters.find(&1), Some(&"d".to_string()));
    assert_eq!(stored.size(), 5);
    assert!(!erased.is_key(&5));
    assert_eq!(updated.find(&1), Some(&"D".to_string()));
}

#[rstest]
fn test_erase_missing_key_is_noop(letters: RedBlackDict<i32, String>) {
    assert_eq!(letters.erase(&42), letters);
    let empty: RedBlackDict<i32, String> = RedBlackDict::new();
    assert!(empty.erase(&1).is_empty());
}

#[rstest]
fn test_take_returns_value_and_rest(letters: RedBlackDict<i32, String>) {
    let (value, rest) = letters.take(&8).unwrap();
    assert_eq!(value, "c");
    assert_eq!(rest.fetch_keys(), vec![1, 3, 5]);
    assert!(letters.take(&7).is_none());
}

// =============================================================================
// Update Family
// =============================================================================

type Partial = fn(&RedBlackDict<i32, i32>) -> Result<RedBlackDict<i32, i32>, DictError>;

#[rstest]
#[case::update_val(|dict: &RedBlackDict<i32, i32>| dict.update_val(&9, 1))]
#[case::update(|dict: &RedBlackDict<i32, i32>| dict.update(&9, |value| value + 1))]
#[case::update_counter(|dict: &RedBlackDict<i32, i32>| dict.update_counter(&9, 1))]
fn test_partial_updates_reject_missing_key(#[case] operation: Partial) {
    let dict = RedBlackDict::new().store(1, 1);
    assert_eq!(operation(&dict).err(), Some(DictError::KeyNotFound));
    assert!(!dict.is_key(&9));
}

#[rstest]
fn test_update_counter_accumulates() {
    let dict = RedBlackDict::new().store("hits", 0u64);
    let dict = (0..10).try_fold(dict, |dict, _| dict.update_counter("hits", 3));
    assert_eq!(dict.unwrap().find("hits"), Some(&30));
}

#[rstest]
fn test_update_with_default_inserts_then_updates() {
    let dict = RedBlackDict::new()
        .update_with_default("word", |count| count + 1, 1)
        .update_with_default("word", |count| count + 1, 1);
    assert_eq!(dict.find("word"), Some(&2));
}

#[rstest]
fn test_append_builds_sequences() {
    let dict = ["apple", "avocado", "banana", "blueberry", "cherry"]
        .into_iter()
        .fold(RedBlackDict::new(), |dict, word| {
            dict.append(word.chars().next().unwrap_or('?'), word)
        });
    assert_eq!(dict.find(&'a'), Some(&vec!["apple", "avocado"]));
    assert_eq!(dict.find(&'c'), Some(&vec!["cherry"]));

    let extended = dict.append_list('c', ["citrus", "cranberry"]);
    assert_eq!(
        extended.find(&'c'),
        Some(&vec!["cherry", "citrus", "cranberry"])
    );
    assert_eq!(dict.find(&'c'), Some(&vec!["cherry"]));
}

// =============================================================================
// Bulk Behaviour
// =============================================================================

#[rstest]
#[case::ascending((0..1000).collect())]
#[case::descending((0..1000).rev().collect())]
#[case::interleaved((0..1000).map(|index| (index * 7919) % 1000).collect())]
fn test_bulk_store_then_erase(#[case] keys: Vec<i32>) {
    init_tracing();
    let mut dict = keys
        .iter()
        .fold(RedBlackDict::new(), |dict, key| dict.store(*key, key * 2));
    assert!(dict.verify().is_ok());
    assert_eq!(dict.size(), 1000);

    for key in keys.iter().step_by(2) {
        dict = dict.erase(key);
        assert!(dict.verify().is_ok());
    }
    assert_eq!(dict.size(), 500);

    for key in keys.iter().skip(1).step_by(2) {
        dict = dict.erase(key);
    }
    assert!(dict.is_empty());
}

// =============================================================================
// Suspendable Traversal
// =============================================================================

#[rstest]
fn test_iter_finds_first_match_and_stops(letters: RedBlackDict<i32, String>) {
    let mut visited = 0;
    let found = letters.iter(None, |key, value, rest| {
        visited += 1;
        if value == "a" {
            Flow::done(Some(*key))
        } else {
            rest.resume()
        }
    });
    assert_eq!(found, Some(5));
    assert_eq!(visited, 3);
}

#[rstest]
fn test_iter_default_when_no_match(letters: RedBlackDict<i32, String>) {
    let found = letters.iter(-1, |key, value, rest| {
        if value == "zzz" {
            Flow::done(*key)
        } else {
            rest.resume()
        }
    });
    assert_eq!(found, -1);
}

#[rstest]
fn test_traversal_over_large_dict_does_not_grow_stack() {
    init_tracing();
    let dict: RedBlackDict<i64, i64> = (0..250_000).map(|key| (key, key)).collect();

    let last = dict.iter(None, |key, _, rest| {
        if *key == 249_999 {
            Flow::done(Some(*key))
        } else {
            rest.resume()
        }
    });
    assert_eq!(last, Some(249_999));

    let sum = dict.itera(0i64, |_, value, sum, rest| rest.resume(sum + value));
    assert_eq!(sum, (0..250_000i64).sum::<i64>());
}

#[rstest]
fn test_itera_stops_with_final_accumulator(letters: RedBlackDict<i32, String>) {
    let below_five = letters.itera(Vec::new(), |key, _, mut keys, rest| {
        if *key >= 5 {
            FlowWith::done(keys)
        } else {
            keys.push(*key);
            rest.resume(keys)
        }
    });
    assert_eq!(below_five, vec![1, 3]);
}

#[rstest]
fn test_itera_collects_in_order(letters: RedBlackDict<i32, String>) {
    let joined = letters.itera(String::new(), |_, value, mut joined, rest| {
        joined.push_str(value);
        rest.resume(joined)
    });
    assert_eq!(joined, "dbac");
}

#[rstest]
fn test_cursor_can_be_suspended_and_forked(letters: RedBlackDict<i32, String>) {
    let (first, _, rest) = letters.entries().step().unwrap();
    assert_eq!(*first, 1);

    let fork = rest.clone();
    let remaining: Vec<i32> = rest.map(|(key, _)| *key).collect();
    let forked: Vec<i32> = fork.map(|(key, _)| *key).collect();
    assert_eq!(remaining, vec![3, 5, 8]);
    assert_eq!(remaining, forked);
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[rstest]
fn test_hash_agrees_with_eq() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(dict: &RedBlackDict<i32, i32>) -> u64 {
        let mut hasher = DefaultHasher::new();
        dict.hash(&mut hasher);
        hasher.finish()
    }

    let forward: RedBlackDict<i32, i32> = (0..50).map(|key| (key, -key)).collect();
    let backward: RedBlackDict<i32, i32> = (0..50).rev().map(|key| (key, -key)).collect();
    assert_eq!(forward, backward);
    assert_eq!(hash_of(&forward), hash_of(&backward));
}

#[rstest]
fn test_into_iterator_for_reference(letters: RedBlackDict<i32, String>) {
    let mut keys = Vec::new();
    for (key, _) in &letters {
        keys.push(*key);
    }
    assert_eq!(keys, vec![1, 3, 5, 8]);
}
