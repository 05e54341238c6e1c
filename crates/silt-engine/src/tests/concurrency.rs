//! Ordering and isolation under concurrent, out-of-order IO.

use std::collections::BTreeMap;
use std::sync::Arc;

use silt_store::{MemoryStore, SlowStore};
use silt_types::EngineConfig;

use super::helpers::{
    TEST_MAX_BYTES, memory_pipeline, pipeline_over, restore_bytes, store_bytes, test_data,
};

/// A pipeline over a store whose IO completes in scrambled order.
fn slow_pipeline(chunk_size: u32, seed: u64) -> (crate::Splitter, crate::Reassembler) {
    let inner = Arc::new(MemoryStore::new(TEST_MAX_BYTES));
    let slow = Arc::new(
        SlowStore::new(inner)
            .read_latency(1, 15)
            .write_latency(1, 15)
            .seed(seed),
    );
    let config = EngineConfig {
        chunk_size,
        put_concurrency: 4,
        fetch_concurrency: 4,
    };
    pipeline_over(slow, config)
}

#[tokio::test]
async fn test_out_of_order_fetches_still_write_in_order() {
    let (splitter, reassembler) = slow_pipeline(128, 42);
    let data = test_data(128 * 10 + 77);

    let (manifest_id, _) = store_bytes(&splitter, &data).await;
    let restored = restore_bytes(&reassembler, manifest_id).await;

    assert_eq!(restored, data, "latency must never reorder output bytes");
}

#[tokio::test]
async fn test_concurrent_puts_produce_sequential_indices() {
    let (splitter, _reassembler) = slow_pipeline(64, 7);
    let (_, manifest) = store_bytes(&splitter, &test_data(64 * 9)).await;

    let indices: Vec<u32> = manifest.chunks.iter().map(|d| d.index).collect();
    assert_eq!(indices, (0..9).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_concurrent_files_share_one_store() {
    let (_store, splitter, reassembler) = memory_pipeline(256);
    let splitter = Arc::new(splitter);

    let files: Vec<Vec<u8>> = (0..8).map(|i| test_data(1000 + i * 137)).collect();

    // Split all files concurrently against the same store.
    let mut tasks = tokio::task::JoinSet::new();
    for data in files.clone() {
        let splitter = splitter.clone();
        tasks.spawn(async move {
            let (id, _) = splitter
                .split_and_publish(std::io::Cursor::new(data.clone()), BTreeMap::new())
                .await
                .unwrap();
            (id, data)
        });
    }

    // Every file restores to its own bytes.
    while let Some(joined) = tasks.join_next().await {
        let (id, data) = joined.unwrap();
        assert_eq!(restore_bytes(&reassembler, id).await, data);
    }
}

#[tokio::test]
async fn test_concurrency_level_does_not_change_manifest() {
    let data = test_data(5000);

    let mut manifests = Vec::new();
    for put_concurrency in [1, 8] {
        let store = Arc::new(MemoryStore::new(TEST_MAX_BYTES));
        let config = EngineConfig {
            chunk_size: 512,
            put_concurrency,
            fetch_concurrency: 8,
        };
        let (splitter, _) = pipeline_over(store, config);
        let manifest = splitter
            .split(std::io::Cursor::new(data.clone()), BTreeMap::new())
            .await
            .unwrap();
        manifests.push(manifest);
    }

    assert_eq!(manifests[0].chunks, manifests[1].chunks);
    assert_eq!(manifests[0].total_size, manifests[1].total_size);
}
