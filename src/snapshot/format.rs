//! Snapshot encoding
//!
//! Converts a whole [`Store`] to and from the snapshot byte format.

use serde::{Deserialize, Serialize};

use crate::error::{KcvError, Result};
use crate::store::Store;

use super::{HEADER_SIZE, MAGIC, VERSION};

/// One key and its columns as stored in the payload
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    key: Vec<u8>,
    columns: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Serialize the whole store (header + payload)
pub fn encode_store(store: &Store) -> Result<Vec<u8>> {
    let records: Vec<SnapshotRecord> = store
        .iter()
        .map(|(key, record)| SnapshotRecord {
            key: key.to_vec(),
            columns: record
                .iter()
                .map(|(col, val)| (col.to_vec(), val.to_vec()))
                .collect(),
        })
        .collect();

    let payload = bincode::serialize(&records)
        .map_err(|e| KcvError::Serialization(format!("Failed to encode snapshot: {}", e)))?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes.extend_from_slice(&payload);

    Ok(bytes)
}

/// Rebuild a store from snapshot bytes
///
/// Column order is recomputed by inserting each column through
/// [`Store::set`]; keys with no columns are skipped.
pub fn decode_store(bytes: &[u8]) -> Result<Store> {
    if bytes.len() < HEADER_SIZE {
        return Err(KcvError::SnapshotCorruption(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    if &bytes[0..4] != MAGIC {
        return Err(KcvError::SnapshotCorruption(format!(
            "Invalid snapshot magic: expected KCVS, got {:?}",
            &bytes[0..4]
        )));
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(KcvError::SnapshotCorruption(format!(
            "Unsupported snapshot version: {}",
            version
        )));
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[6..14]);
    let payload_len = u64::from_le_bytes(len_bytes) as usize;

    let stored_crc = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_len {
        return Err(KcvError::SnapshotCorruption(format!(
            "Payload length mismatch: header says {}, file has {}",
            payload_len,
            payload.len()
        )));
    }

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    let actual_crc = hasher.finalize();
    if actual_crc != stored_crc {
        return Err(KcvError::SnapshotCorruption(format!(
            "CRC mismatch: expected {:08x}, computed {:08x}",
            stored_crc, actual_crc
        )));
    }

    let records: Vec<SnapshotRecord> = bincode::deserialize(payload)
        .map_err(|e| KcvError::SnapshotCorruption(format!("Failed to decode payload: {}", e)))?;

    let mut store = Store::new();
    for record in records {
        for (col, val) in record.columns {
            store.set(&record.key, &col, &val);
        }
    }

    Ok(store)
}
