//! KeyRecord implementation
//!
//! BTreeMap-based column index for a single key.

use std::collections::BTreeMap;
use std::ops::Bound;

/// The ordered column → value mapping owned by one key
///
/// The B-tree doubles as the sorted column index and the value table:
/// inserting a new column is O(log n), and overwriting an existing
/// column's value leaves the order untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRecord {
    columns: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl KeyRecord {
    /// Create a new empty record
    pub fn new() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a column, returning the previous value
    pub fn insert(&mut self, col: Vec<u8>, val: Vec<u8>) -> Option<Vec<u8>> {
        self.columns.insert(col, val)
    }

    /// Look up a column's value
    pub fn get(&self, col: &[u8]) -> Option<&[u8]> {
        self.columns.get(col).map(Vec::as_slice)
    }

    /// Remove a column, returning its value if it existed
    pub fn remove(&mut self, col: &[u8]) -> Option<Vec<u8>> {
        self.columns.remove(col)
    }

    /// Whether `col` is literally one of this record's columns
    pub fn contains(&self, col: &[u8]) -> bool {
        self.columns.contains_key(col)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over (column, value) pairs in ascending column order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.columns
            .iter()
            .map(|(c, v)| (c.as_slice(), v.as_slice()))
    }

    /// Iterate over the columns between two bounds, in order.
    ///
    /// Callers must not pass inverted bounds; `BTreeMap::range` panics on them.
    pub(crate) fn range<'a>(
        &'a self,
        lower: Bound<&'a [u8]>,
        upper: Bound<&'a [u8]>,
    ) -> impl Iterator<Item = (&'a [u8], &'a [u8])> {
        self.columns
            .range::<[u8], _>((lower, upper))
            .map(|(c, v)| (c.as_slice(), v.as_slice()))
    }
}
