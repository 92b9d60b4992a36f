//! Tests for Store
//!
//! These tests verify:
//! - Basic set/get/get_key/delete/delete_key operations
//! - Reads on an empty store never create keys
//! - Columns come back sorted regardless of insert order
//! - Keys disappear when their last column is removed

use std::collections::HashSet;

use kcvstore::store::{SliceBound, Store};

// =============================================================================
// Helper Functions
// =============================================================================

fn pair(col: &str, val: &str) -> (Vec<u8>, Vec<u8>) {
    (col.as_bytes().to_vec(), val.as_bytes().to_vec())
}

fn keyset(keys: &[&str]) -> HashSet<Vec<u8>> {
    keys.iter().map(|k| k.as_bytes().to_vec()).collect()
}

/// Deterministic permutation of `items` (multiplicative stride over a prime-sized cycle)
fn scrambled(items: &[u8]) -> Vec<u8> {
    let n = items.len();
    let mut out = Vec::with_capacity(n);
    let mut idx = 0usize;
    for _ in 0..n {
        idx = (idx + 37) % n;
        out.push(items[idx]);
    }
    out
}

fn printable() -> Vec<u8> {
    (0x20u8..0x7f).collect()
}

fn setup_sample_store() -> Store {
    let mut store = Store::new();
    store.set(b"a", b"aa", b"x");
    store.set(b"a", b"ab", b"x");
    store.set(b"c", b"cc", b"x");
    store.set(b"c", b"cd", b"x");
    store.set(b"d", b"de", b"x");
    store.set(b"d", b"df", b"x");
    store
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_get() {
    let store = setup_sample_store();
    assert_eq!(store.get(b"a", b"aa"), Some(&b"x"[..]));
}

#[test]
fn test_get_key() {
    let store = setup_sample_store();
    assert_eq!(store.get_key(b"a"), vec![pair("aa", "x"), pair("ab", "x")]);
}

#[test]
fn test_nonexistent_get() {
    let store = setup_sample_store();
    assert_eq!(store.get(b"z", b"yy"), None);
}

#[test]
fn test_nonexistent_get_key() {
    let store = setup_sample_store();
    assert!(store.get_key(b"z").is_empty());
}

#[test]
fn test_get_on_overwritten_value() {
    let mut store = setup_sample_store();
    store.set(b"a", b"aa", b"y");
    assert_eq!(store.get(b"a", b"aa"), Some(&b"y"[..]));
}

#[test]
fn test_get_key_on_overwritten_values() {
    let mut store = setup_sample_store();
    store.set(b"a", b"aa", b"y");
    store.set(b"a", b"ab", b"z");

    assert_eq!(store.get_key(b"a"), vec![pair("aa", "y"), pair("ab", "z")]);
    assert_eq!(store.column_count(b"a"), 2);
}

#[test]
fn test_delete() {
    let mut store = setup_sample_store();
    assert!(store.delete(b"d", b"df"));
    assert_eq!(store.get_key(b"d"), vec![pair("de", "x")]);
}

#[test]
fn test_delete_key() {
    let mut store = setup_sample_store();
    assert!(store.delete_key(b"c"));
    assert!(store.get_key(b"c").is_empty());
    assert_eq!(store.get_keys(), keyset(&["a", "d"]));
}

#[test]
fn test_get_keys() {
    let store = setup_sample_store();
    assert_eq!(store.get_keys(), keyset(&["a", "c", "d"]));
    assert_eq!(store.len(), 3);
}

#[test]
fn test_empty_key_column_and_value_are_valid() {
    let mut store = Store::new();
    store.set(b"", b"", b"");

    assert_eq!(store.get(b"", b""), Some(&b""[..]));
    assert_eq!(store.get_keys(), keyset(&[""]));
}

// =============================================================================
// Empty Store Tests
// =============================================================================

#[test]
fn test_empty_store_reads() {
    let store = Store::new();

    assert_eq!(store.get(b"any key", b"any col"), None);
    assert!(store.get_key(b"any key").is_empty());
    assert!(store.get_keys().is_empty());
    assert!(store
        .get_slice(b"any key", b"any start", b"any stop")
        .is_empty());
}

#[test]
fn test_empty_store_deletes_are_noops() {
    let mut store = Store::new();

    assert!(!store.delete(b"any key", b"any col"));
    assert!(!store.delete_key(b"any key"));
    assert!(store.get_keys().is_empty());
}

// =============================================================================
// Idempotence Tests
//
// Every ordered pair of reads on a fresh store must report empty results
// and leave get_keys() empty.
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Read {
    Get,
    GetKey,
    GetKeys,
    GetSlice,
}

fn assert_read_is_empty(store: &Store, read: Read) {
    match read {
        Read::Get => assert_eq!(store.get(b"key", b"col"), None),
        Read::GetKey => assert!(store.get_key(b"key").is_empty()),
        Read::GetKeys => assert!(store.get_keys().is_empty()),
        Read::GetSlice => assert!(store
            .get_slice(b"key", b"col", SliceBound::Unbounded)
            .is_empty()),
    }
}

#[test]
fn test_read_pairs_on_fresh_store() {
    let reads = [Read::Get, Read::GetKey, Read::GetKeys, Read::GetSlice];

    for first in reads {
        for second in reads {
            let store = Store::new();
            assert_read_is_empty(&store, first);
            assert_read_is_empty(&store, second);
            assert!(
                store.get_keys().is_empty(),
                "{:?} then {:?} created a key",
                first,
                second
            );
        }
    }
}

#[test]
fn test_delete_missing_then_get_keys() {
    let mut store = Store::new();
    store.delete(b"key", b"col");
    assert!(store.get_keys().is_empty());
}

#[test]
fn test_delete_missing_key_then_get_keys() {
    let mut store = Store::new();
    store.delete_key(b"key");
    assert!(store.get_keys().is_empty());
}

#[test]
fn test_delete_missing_column_of_existing_key() {
    let mut store = Store::new();
    store.set(b"key", b"col", b"val");

    assert!(!store.delete(b"key", b"other"));
    assert_eq!(store.get_key(b"key"), vec![pair("col", "val")]);
}

// =============================================================================
// Ordering / Membership Tests
// =============================================================================

#[test]
fn test_get_key_returns_sorted_columns() {
    let cols = scrambled(&printable());
    let mut store = Store::new();
    for col in &cols {
        store.set(b"key", &[*col], b"val");
    }

    let retrieved: Vec<u8> = store.get_key(b"key").into_iter().map(|(c, _)| c[0]).collect();
    let mut expected = cols.clone();
    expected.sort();
    assert_eq!(retrieved, expected);
}

#[test]
fn test_columns_sort_bytewise() {
    let mut store = Store::new();
    for col in ["b", "B", "aa", "a", "ab", "\u{e9}"] {
        store.set(b"k", col.as_bytes(), b"v");
    }

    let cols: Vec<Vec<u8>> = store.get_key(b"k").into_iter().map(|(c, _)| c).collect();
    let expected: Vec<Vec<u8>> = ["B", "a", "aa", "ab", "b", "\u{e9}"]
        .iter()
        .map(|c| c.as_bytes().to_vec())
        .collect();
    assert_eq!(cols, expected);
}

#[test]
fn test_set_then_get_tracks_latest_value() {
    let vals = scrambled(&printable());
    let mut store = Store::new();

    for val in &vals {
        store.set(b"key", b"col", &[*val]);
        assert_eq!(store.get(b"key", b"col"), Some(&[*val][..]));
        assert_eq!(store.get_key(b"key"), vec![(b"col".to_vec(), vec![*val])]);
        assert_eq!(store.get_keys(), keyset(&["key"]));
    }
}

#[test]
fn test_get_keys_after_each_delete_key() {
    let keys = scrambled(&printable());
    let mut store = Store::new();
    for key in &keys {
        store.set(&[*key], b"col", b"val");
    }

    let mut remaining: HashSet<Vec<u8>> = keys.iter().map(|k| vec![*k]).collect();
    assert_eq!(store.get_keys(), remaining);

    for key in scrambled(&keys) {
        store.delete_key(&[key]);
        remaining.remove(&vec![key]);
        assert_eq!(store.get_keys(), remaining);
    }
    assert!(store.is_empty());
}

#[test]
fn test_deleting_only_column_removes_key() {
    let mut store = Store::new();
    store.set(b"solo", b"col", b"val");
    store.set(b"other", b"col", b"val");

    store.delete(b"solo", b"col");

    assert_eq!(store.get_keys(), keyset(&["other"]));
    assert_eq!(store.column_count(b"solo"), 0);
}

#[test]
fn test_deleting_non_last_column_keeps_key_and_order() {
    let mut store = Store::new();
    for col in ["d", "a", "c", "b"] {
        store.set(b"k", col.as_bytes(), col.as_bytes());
    }

    store.delete(b"k", b"b");

    assert_eq!(store.get_keys(), keyset(&["k"]));
    assert_eq!(
        store.get_key(b"k"),
        vec![pair("a", "a"), pair("c", "c"), pair("d", "d")]
    );
}

#[test]
fn test_key_recreated_after_becoming_empty() {
    let mut store = Store::new();
    store.set(b"k", b"a", b"1");
    store.delete(b"k", b"a");
    store.set(b"k", b"b", b"2");

    assert_eq!(store.get_key(b"k"), vec![pair("b", "2")]);
}
