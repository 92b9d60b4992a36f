//! Snapshot file
//!
//! Loads and rewrites the backing snapshot file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{KcvError, Result};
use crate::store::Store;

use super::format::{decode_store, encode_store};

/// Handle on the backing snapshot file
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    sync: bool,
}

impl SnapshotFile {
    /// Create a handle for `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>, sync: bool) -> Self {
        Self {
            path: path.into(),
            sync,
        }
    }

    /// Load the saved store
    ///
    /// Returns `Ok(None)` when the file does not exist or is empty.
    pub fn load(&self) -> Result<Option<Store>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(KcvError::Io(e)),
        };

        if bytes.is_empty() {
            tracing::debug!("Snapshot at {} is empty", self.path.display());
            return Ok(None);
        }

        let store = decode_store(&bytes)?;
        tracing::debug!(
            "Loaded snapshot from {} ({} keys, {} bytes)",
            self.path.display(),
            store.len(),
            bytes.len()
        );
        Ok(Some(store))
    }

    /// Rewrite the snapshot with the whole store
    ///
    /// The file is truncated and written in place.
    pub fn save(&self, store: &Store) -> Result<()> {
        let bytes = encode_store(store)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;

        if self.sync {
            let file: File = writer
                .into_inner()
                .map_err(|e| KcvError::Io(e.into_error()))?;
            file.sync_all()?;
        }

        tracing::debug!(
            "Saved snapshot to {} ({} keys, {} bytes)",
            self.path.display(),
            store.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
