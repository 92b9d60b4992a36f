//! Snapshot Module
//!
//! Whole-store persistence: the entire store is serialized and the backing
//! file rewritten in full after every mutation.
//!
//! ## Responsibilities
//! - Load a previously saved store at startup (absent or empty file = none)
//! - Rewrite the whole snapshot on demand
//! - Detect corrupt snapshots via magic, version, length and CRC32
//!
//! There is no log and no atomic replace: a crash in the middle of a
//! rewrite can leave a corrupt snapshot behind. Load reports that as
//! [`crate::KcvError::SnapshotCorruption`].
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Header (18 bytes)                                               │
//! │   Magic: "KCVS" (4) | Version: u16 (2) | PayloadLen: u64 (8)    │
//! │   PayloadCRC: u32 (4)                                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Payload (PayloadLen bytes)                                      │
//! │   bincode(Vec<SnapshotRecord { key, columns: [(col, val)] }>)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Columns carry no order field; the column index is rebuilt on load.

mod file;
mod format;

pub use file::SnapshotFile;
pub use format::{decode_store, encode_store};

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying a KCVStore snapshot file
pub(crate) const MAGIC: &[u8; 4] = b"KCVS";

/// Current snapshot format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + PayloadLen (8) + CRC (4) = 18 bytes
pub const HEADER_SIZE: usize = 18;
