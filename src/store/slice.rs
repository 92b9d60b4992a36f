//! Range queries over a key's sorted columns
//!
//! ## Bound Rules
//! A bound counts as *missing* when it is [`SliceBound::Unbounded`] or when
//! its column is not literally present under the key. Membership decides,
//! not lexicographic position:
//!
//! | start        | stop         | result                                |
//! |--------------|--------------|---------------------------------------|
//! | Unbounded    | Unbounded    | every column                          |
//! | missing      | missing      | empty (unless both Unbounded)         |
//! | missing      | present      | first column ..= stop                 |
//! | present      | missing      | start ..= last column                 |
//! | present      | present      | start ..= stop (empty if start > stop)|

use std::ops::Bound;

use super::KeyRecord;

/// One end of a slice query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceBound<'a> {
    /// Open end
    Unbounded,

    /// An inclusive column bound
    Column(&'a [u8]),
}

impl<'a> SliceBound<'a> {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, SliceBound::Unbounded)
    }

    /// The bound's column, if one was given
    pub fn column(&self) -> Option<&'a [u8]> {
        match self {
            SliceBound::Unbounded => None,
            SliceBound::Column(col) => Some(col),
        }
    }
}

impl<'a> From<Option<&'a [u8]>> for SliceBound<'a> {
    fn from(bound: Option<&'a [u8]>) -> Self {
        match bound {
            Some(col) => SliceBound::Column(col),
            None => SliceBound::Unbounded,
        }
    }
}

impl<'a> From<&'a [u8]> for SliceBound<'a> {
    fn from(col: &'a [u8]) -> Self {
        SliceBound::Column(col)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for SliceBound<'a> {
    fn from(col: &'a [u8; N]) -> Self {
        SliceBound::Column(col)
    }
}

/// Select the (column, value) pairs of `record` between `start` and `stop`
pub(crate) fn select(
    record: &KeyRecord,
    start: SliceBound<'_>,
    stop: SliceBound<'_>,
) -> Vec<(Vec<u8>, Vec<u8>)> {
    let start_col = start.column().filter(|col| record.contains(col));
    let stop_col = stop.column().filter(|col| record.contains(col));

    // Two garbage endpoints select nothing; two open endpoints select everything.
    if start_col.is_none() && stop_col.is_none() && !(start.is_unbounded() && stop.is_unbounded())
    {
        return Vec::new();
    }

    if let (Some(lo), Some(hi)) = (start_col, stop_col) {
        if lo > hi {
            return Vec::new();
        }
    }

    let lower = start_col.map_or(Bound::Unbounded, Bound::Included);
    let upper = stop_col.map_or(Bound::Unbounded, Bound::Included);

    record
        .range(lower, upper)
        .map(|(col, val)| (col.to_vec(), val.to_vec()))
        .collect()
}
