//! Shared test utilities for silt-engine tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use silt_store::{BlockStore, MemoryStore};
use silt_types::{EngineConfig, Manifest, ManifestId};

use crate::{Reassembler, Splitter};

pub const TEST_MAX_BYTES: u64 = 1_000_000_000;

/// Generate deterministic, non-repeating test data.
pub fn test_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

/// An in-memory store plus a splitter/reassembler pair over it.
pub fn memory_pipeline(chunk_size: u32) -> (Arc<MemoryStore>, Splitter, Reassembler) {
    let store = Arc::new(MemoryStore::new(TEST_MAX_BYTES));
    let config = EngineConfig {
        chunk_size,
        ..EngineConfig::default()
    };
    let splitter = Splitter::new(store.clone(), config);
    let reassembler = Reassembler::new(store.clone(), config);
    (store, splitter, reassembler)
}

/// Splitter/reassembler pair over an arbitrary store and config.
pub fn pipeline_over(
    store: Arc<dyn BlockStore>,
    config: EngineConfig,
) -> (Splitter, Reassembler) {
    (
        Splitter::new(store.clone(), config),
        Reassembler::new(store, config),
    )
}

/// Split `data`, publish the manifest, and return the handle.
pub async fn store_bytes(splitter: &Splitter, data: &[u8]) -> (ManifestId, Manifest) {
    splitter
        .split_and_publish(std::io::Cursor::new(data.to_vec()), BTreeMap::new())
        .await
        .unwrap()
}

/// Reassemble `manifest_id` into a fresh buffer.
pub async fn restore_bytes(reassembler: &Reassembler, manifest_id: ManifestId) -> Vec<u8> {
    let mut out = Vec::new();
    reassembler
        .reassemble(manifest_id, std::io::Cursor::new(&mut out))
        .await
        .unwrap();
    out
}
