//! Store Module
//!
//! The in-memory key → column → value structure.
//!
//! ## Responsibilities
//! - Keep each key's columns in sorted order as they are inserted/removed
//! - Point lookups, whole-key dumps, and inclusive column slices
//! - Enumerate the keys that currently hold at least one column
//!
//! ## Presence Invariant
//! A key is in the store iff its record has at least one column. Only
//! [`Store::set`] creates a record; reads use plain lookups and never
//! insert a default. Removing a key's last column removes the record.
//!
//! ## Data Structure Choice
//! `BTreeMap<Key, KeyRecord>` where each `KeyRecord` is itself a
//! `BTreeMap<Column, Value>`:
//! - Ordered columns without a re-sort step
//! - O(log n) insert/remove and slice seek per key
//! - Deterministic key order when snapshotting

mod record;
mod slice;

use std::collections::{BTreeMap, HashSet};

pub use record::KeyRecord;
pub use slice::SliceBound;

/// A (column, value) pair as returned by `get_key` and `get_slice`
pub type ColumnValue = (Vec<u8>, Vec<u8>);

/// The top-level key/column/value store
///
/// Free of I/O and locking; the host is responsible for serializing
/// mutations (see [`crate::engine::Engine`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    records: BTreeMap<Vec<u8>, KeyRecord>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Set the value at `key`/`col`, creating the key's record if needed
    pub fn set(&mut self, key: &[u8], col: &[u8], val: &[u8]) {
        match self.records.get_mut(key) {
            Some(record) => {
                record.insert(col.to_vec(), val.to_vec());
            }
            None => {
                let mut record = KeyRecord::new();
                record.insert(col.to_vec(), val.to_vec());
                self.records.insert(key.to_vec(), record);
            }
        }
    }

    /// Return the value at `key`/`col`, or `None` if either is absent
    pub fn get(&self, key: &[u8], col: &[u8]) -> Option<&[u8]> {
        self.records.get(key).and_then(|record| record.get(col))
    }

    /// Return every (column, value) pair under `key`, sorted by column
    pub fn get_key(&self, key: &[u8]) -> Vec<ColumnValue> {
        match self.records.get(key) {
            Some(record) => record
                .iter()
                .map(|(col, val)| (col.to_vec(), val.to_vec()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Return the set of keys holding at least one column
    pub fn get_keys(&self) -> HashSet<Vec<u8>> {
        self.records.keys().cloned().collect()
    }

    /// Remove the column `col` from `key`
    ///
    /// Returns `true` if something was removed. Removing the last column
    /// drops the key entirely.
    pub fn delete(&mut self, key: &[u8], col: &[u8]) -> bool {
        let Some(record) = self.records.get_mut(key) else {
            return false;
        };

        let removed = record.remove(col).is_some();
        if record.is_empty() {
            self.records.remove(key);
        }
        removed
    }

    /// Remove `key` with all its columns. Returns `true` if the key existed.
    pub fn delete_key(&mut self, key: &[u8]) -> bool {
        self.records.remove(key).is_some()
    }

    /// Return the (column, value) pairs under `key` between `start` and `stop`
    ///
    /// See [`SliceBound`] and the module docs of `slice` for how bounds
    /// that are not existing columns are treated.
    pub fn get_slice<'a>(
        &self,
        key: &[u8],
        start: impl Into<SliceBound<'a>>,
        stop: impl Into<SliceBound<'a>>,
    ) -> Vec<ColumnValue> {
        match self.records.get(key) {
            Some(record) => slice::select(record, start.into(), stop.into()),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Inspection (non-mutating helpers)
    // =========================================================================

    /// Number of keys in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of columns under `key` (0 for unknown keys)
    pub fn column_count(&self, key: &[u8]) -> usize {
        self.records.get(key).map_or(0, KeyRecord::len)
    }

    /// Iterate over (key, record) pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &KeyRecord)> {
        self.records.iter().map(|(k, r)| (k.as_slice(), r))
    }

    // =========================================================================
    // Crate-internal
    // =========================================================================

    /// Borrow a key's record
    pub(crate) fn record(&self, key: &[u8]) -> Option<&KeyRecord> {
        self.records.get(key)
    }

    /// Put a key's record back to a previously captured state
    ///
    /// `None` or an empty record removes the key.
    pub(crate) fn restore_record(&mut self, key: &[u8], record: Option<KeyRecord>) {
        match record {
            Some(record) if !record.is_empty() => {
                self.records.insert(key.to_vec(), record);
            }
            _ => {
                self.records.remove(key);
            }
        }
    }
}
