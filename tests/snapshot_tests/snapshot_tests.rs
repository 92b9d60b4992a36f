//! Tests for SnapshotFile
//!
//! These tests verify:
//! - Missing and empty snapshot files load as "no snapshot"
//! - Save/load reproduces the whole store, column order included
//! - Corrupt snapshots (magic, version, length, CRC) are rejected

use std::fs;
use std::path::PathBuf;

use kcvstore::snapshot::{decode_store, encode_store, SnapshotFile, HEADER_SIZE};
use kcvstore::store::Store;
use kcvstore::KcvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.snapshot");
    (temp_dir, path)
}

fn sample_store() -> Store {
    let mut store = Store::new();
    store.set(b"users", b"charlie", b"3");
    store.set(b"users", b"alice", b"1");
    store.set(b"users", b"bob", b"2");
    store.set(b"empty-value", b"col", b"");
    store.set(&[0, 255], &[1, 2, 3], &[0xde, 0xad]);
    store
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_missing_file() {
    let (_temp, path) = setup_temp_path();
    let snapshot = SnapshotFile::new(&path, true);

    assert!(snapshot.load().unwrap().is_none());
    assert!(!path.exists());
}

#[test]
fn test_load_empty_file() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, b"").unwrap();

    let snapshot = SnapshotFile::new(&path, true);
    assert!(snapshot.load().unwrap().is_none());
}

#[test]
fn test_save_then_load() {
    let (_temp, path) = setup_temp_path();
    let snapshot = SnapshotFile::new(&path, true);
    let store = sample_store();

    snapshot.save(&store).unwrap();
    let loaded = snapshot.load().unwrap().unwrap();

    assert_eq!(loaded, store);
    assert_eq!(
        loaded.get_key(b"users"),
        vec![
            (b"alice".to_vec(), b"1".to_vec()),
            (b"bob".to_vec(), b"2".to_vec()),
            (b"charlie".to_vec(), b"3".to_vec()),
        ]
    );
    assert_eq!(loaded.get(&[0, 255], &[1, 2, 3]), Some(&[0xde, 0xad][..]));
}

#[test]
fn test_save_empty_store_then_load() {
    let (_temp, path) = setup_temp_path();
    let snapshot = SnapshotFile::new(&path, false);

    snapshot.save(&Store::new()).unwrap();

    assert!(fs::metadata(&path).unwrap().len() > 0);
    assert!(snapshot.load().unwrap().unwrap().is_empty());
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let (_temp, path) = setup_temp_path();
    let snapshot = SnapshotFile::new(&path, true);

    snapshot.save(&sample_store()).unwrap();

    let mut smaller = Store::new();
    smaller.set(b"k", b"c", b"v");
    snapshot.save(&smaller).unwrap();

    assert_eq!(snapshot.load().unwrap().unwrap(), smaller);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("dir").join("s.snapshot");
    let snapshot = SnapshotFile::new(&path, true);

    snapshot.save(&sample_store()).unwrap();

    assert!(path.exists());
    assert_eq!(snapshot.path(), path.as_path());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_bad_magic_rejected() {
    let mut bytes = encode_store(&sample_store()).unwrap();
    bytes[0] = b'X';

    assert!(matches!(
        decode_store(&bytes),
        Err(KcvError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_bad_version_rejected() {
    let mut bytes = encode_store(&sample_store()).unwrap();
    bytes[4] = 0xff;

    assert!(matches!(
        decode_store(&bytes),
        Err(KcvError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_truncated_header_rejected() {
    let bytes = encode_store(&sample_store()).unwrap();

    assert!(matches!(
        decode_store(&bytes[..HEADER_SIZE - 1]),
        Err(KcvError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_truncated_payload_rejected() {
    let bytes = encode_store(&sample_store()).unwrap();

    assert!(matches!(
        decode_store(&bytes[..bytes.len() - 1]),
        Err(KcvError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_flipped_payload_byte_rejected() {
    let mut bytes = encode_store(&sample_store()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;

    assert!(matches!(
        decode_store(&bytes),
        Err(KcvError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_corrupt_file_fails_load() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, b"not a snapshot at all").unwrap();

    let snapshot = SnapshotFile::new(&path, true);
    assert!(matches!(
        snapshot.load(),
        Err(KcvError::SnapshotCorruption(_))
    ));
}

#[test]
fn test_load_from_directory_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = SnapshotFile::new(temp_dir.path(), true);

    assert!(matches!(snapshot.load(), Err(KcvError::Io(_))));
}
