//! # KCVStore
//!
//! An in-process key/column/value store with:
//! - Per-key columns kept in sorted order as they are written
//! - Point lookups, whole-key dumps, and inclusive column slices
//! - Whole-store snapshot persistence after every mutation
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                             │
//! │                  (Multiple Clients)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                │
//! │            (Single Writer / Multi Reader)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Store    │ ───────▶ │  Snapshot   │
//!   │  (RwLock)   │  rewrite │   (file)    │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use kcvstore::store::{SliceBound, Store};
//!
//! let mut store = Store::new();
//! store.set(b"a", b"ab", b"x");
//! store.set(b"a", b"aa", b"x");
//!
//! assert_eq!(store.get(b"a", b"aa"), Some(&b"x"[..]));
//! assert_eq!(store.get_key(b"a")[0].0, b"aa".to_vec());
//! assert!(store.get_slice(b"a", b"zz", b"zz").is_empty());
//! assert_eq!(store.get_slice(b"a", SliceBound::Unbounded, SliceBound::Unbounded).len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod snapshot;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KcvError, Result};
pub use config::Config;
pub use engine::Engine;
pub use store::{SliceBound, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of KCVStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
