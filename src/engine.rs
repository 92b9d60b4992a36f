//! Engine Module
//!
//! Hosts the store and its snapshot file.
//!
//! ## Responsibilities
//! - Load the snapshot on startup, or write an initial one
//! - Serialize mutations and rewrite the snapshot after each one
//! - Allow overlapping reads
//! - Route protocol commands to store operations

use std::path::Path;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{Command, Reply};
use crate::snapshot::SnapshotFile;
use crate::store::{ColumnValue, SliceBound, Store};

/// The store host
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (set/delete/delete_key): hold the store's write lock for
///   the mutation *and* the snapshot rewrite, so at most one writer runs
///   and readers never observe a change that is not yet being saved.
/// - **Reads** (get/get_key/get_keys/get_slice): share the read lock.
///
/// ## Save Failures
/// If rewriting the snapshot fails, the touched key is put back to its
/// pre-mutation state before the error is returned.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The in-memory store
    store: RwLock<Store>,

    /// Backing snapshot, `None` when running in memory
    snapshot: Option<SnapshotFile>,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Load the snapshot if it exists and is non-empty
    /// 2. Otherwise start empty and write an initial snapshot
    pub fn open(config: Config) -> Result<Self> {
        let Some(path) = config.snapshot_path.clone() else {
            tracing::info!("Engine opened in memory");
            return Ok(Self {
                config,
                store: RwLock::new(Store::new()),
                snapshot: None,
            });
        };

        let snapshot = SnapshotFile::new(path, config.sync_on_save);

        let store = match snapshot.load()? {
            Some(store) => store,
            None => {
                let store = Store::new();
                snapshot.save(&store)?;
                store
            }
        };

        tracing::info!(
            "Engine opened from {} with {} keys",
            snapshot.path().display(),
            store.len()
        );

        Ok(Self {
            config,
            store: RwLock::new(store),
            snapshot: Some(snapshot),
        })
    }

    /// Open with a snapshot path (convenience method)
    ///
    /// Uses default config with the specified snapshot file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config {
            snapshot_path: Some(path.to_path_buf()),
            ..Config::default()
        };
        Self::open(config)
    }

    /// Create an engine that never touches disk
    pub fn in_memory() -> Self {
        Self {
            config: Config {
                snapshot_path: None,
                ..Config::default()
            },
            store: RwLock::new(Store::new()),
            snapshot: None,
        }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::ListKeys => Ok(Reply::Keys(self.get_keys())),
            Command::Get { key, col } => Ok(Reply::Value(self.get(&key, &col))),
            Command::GetKey { key } => Ok(Reply::Columns(self.get_key(&key))),
            Command::GetSlice { key, start, stop } => Ok(Reply::Columns(self.get_slice(
                &key,
                start.as_deref().into(),
                stop.as_deref().into(),
            ))),
            Command::Set { key, col, val } => {
                self.set(&key, &col, &val)?;
                Ok(Reply::Done)
            }
            Command::Delete { key, col } => {
                self.delete(&key, &col)?;
                Ok(Reply::Done)
            }
            Command::DeleteKey { key } => {
                self.delete_key(&key)?;
                Ok(Reply::Done)
            }
            Command::Ping => Ok(Reply::Pong),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the value at `key`/`col`
    pub fn get(&self, key: &[u8], col: &[u8]) -> Option<Vec<u8>> {
        self.store.read().get(key, col).map(<[u8]>::to_vec)
    }

    /// Get all (column, value) pairs under `key`, sorted by column
    pub fn get_key(&self, key: &[u8]) -> Vec<ColumnValue> {
        self.store.read().get_key(key)
    }

    /// Get every key holding at least one column, in no particular order
    pub fn get_keys(&self) -> Vec<Vec<u8>> {
        self.store.read().get_keys().into_iter().collect()
    }

    /// Get the inclusive column slice of `key` between `start` and `stop`
    pub fn get_slice(
        &self,
        key: &[u8],
        start: SliceBound<'_>,
        stop: SliceBound<'_>,
    ) -> Vec<ColumnValue> {
        self.store.read().get_slice(key, start, stop)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Set the value at `key`/`col` and persist
    pub fn set(&self, key: &[u8], col: &[u8], val: &[u8]) -> Result<()> {
        self.mutate("set", key, |store| {
            store.set(key, col, val);
            true
        })
        .map(|_| ())
    }

    /// Delete `key`/`col` and persist. Returns whether anything was removed.
    pub fn delete(&self, key: &[u8], col: &[u8]) -> Result<bool> {
        self.mutate("delete", key, |store| store.delete(key, col))
    }

    /// Delete `key` and persist. Returns whether the key existed.
    pub fn delete_key(&self, key: &[u8]) -> Result<bool> {
        self.mutate("delete_key", key, |store| store.delete_key(key))
    }

    /// Apply a single-key mutation under the write lock, then save
    ///
    /// `op` returns whether the store changed; unchanged stores are not
    /// rewritten.
    fn mutate<F>(&self, name: &str, key: &[u8], op: F) -> Result<bool>
    where
        F: FnOnce(&mut Store) -> bool,
    {
        let mut store = self.store.write();

        let Some(snapshot) = &self.snapshot else {
            return Ok(op(&mut *store));
        };

        let previous = store.record(key).cloned();
        if !op(&mut *store) {
            return Ok(false);
        }

        if let Err(e) = snapshot.save(&*store) {
            tracing::warn!(
                "Snapshot save after {} failed, reverting key: {}",
                name,
                e
            );
            store.restore_record(key, previous);
            return Err(e);
        }

        tracing::trace!(
            "{} applied and saved ({} columns left under key)",
            name,
            store.column_count(key)
        );
        Ok(true)
    }

    /// Close the engine gracefully
    ///
    /// Rewrites the snapshot one last time
    pub fn close(self) -> Result<()> {
        if let Some(snapshot) = &self.snapshot {
            snapshot.save(&*self.store.read())?;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of keys currently stored
    pub fn key_count(&self) -> usize {
        self.store.read().len()
    }

    /// Path of the snapshot file, if persistent
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot.as_ref().map(SnapshotFile::path)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
