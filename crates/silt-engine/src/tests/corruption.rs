//! Corruption, absence, and malformed-manifest detection.

use bytes::Bytes;
use silt_cas::CasError;
use silt_store::{BlockStore, StoreError};
use silt_types::ManifestId;

use crate::EngineError;

use super::helpers::{memory_pipeline, store_bytes, test_data};

async fn try_restore(
    reassembler: &crate::Reassembler,
    manifest_id: ManifestId,
) -> Result<Vec<u8>, EngineError> {
    let mut out = Vec::new();
    reassembler
        .reassemble(manifest_id, std::io::Cursor::new(&mut out))
        .await?;
    Ok(out)
}

#[tokio::test]
async fn test_missing_chunk_names_index_and_id() {
    let (store, splitter, reassembler) = memory_pipeline(256);
    let (manifest_id, manifest) = store_bytes(&splitter, &test_data(1000)).await;

    // Drop the third chunk, as external GC might.
    let victim = manifest.chunks[2].clone();
    store.delete(victim.chunk_id.into()).await.unwrap();

    let err = try_restore(&reassembler, manifest_id).await.unwrap_err();
    match err {
        EngineError::MissingChunk { index, chunk_id } => {
            assert_eq!(index, 2);
            assert_eq!(chunk_id, victim.chunk_id);
        }
        other => panic!("expected MissingChunk, got: {other}"),
    }
}

#[tokio::test]
async fn test_same_length_bit_rot_detected() {
    let (store, splitter, reassembler) = memory_pipeline(256);
    let (manifest_id, manifest) = store_bytes(&splitter, &test_data(1000)).await;

    // Flip bytes without changing the length: only the hash check can see it.
    let victim = &manifest.chunks[1];
    store.corrupt(victim.chunk_id.into(), Bytes::from(vec![0u8; 256]));

    let err = try_restore(&reassembler, manifest_id).await.unwrap_err();
    assert!(
        matches!(err, EngineError::ChunkHashMismatch { index: 1, .. }),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_truncated_chunk_detected_by_size() {
    let (store, splitter, reassembler) = memory_pipeline(256);
    let (manifest_id, manifest) = store_bytes(&splitter, &test_data(1000)).await;

    let victim = &manifest.chunks[0];
    store.corrupt(victim.chunk_id.into(), Bytes::from_static(b"short"));

    let err = try_restore(&reassembler, manifest_id).await.unwrap_err();
    assert!(
        matches!(
            err,
            EngineError::ChunkSizeMismatch {
                index: 0,
                expected: 256,
                actual: 5,
                ..
            }
        ),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_unknown_manifest_id_is_not_found() {
    let (_store, _splitter, reassembler) = memory_pipeline(256);
    let bogus = ManifestId::from_data(b"never stored");

    let err = try_restore(&reassembler, bogus).await.unwrap_err();
    assert!(
        matches!(err, EngineError::ManifestNotFound(id) if id == bogus),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_garbage_manifest_block_fails_decode() {
    let (store, _splitter, reassembler) = memory_pipeline(256);

    // Store garbage under its own hash so the fetch itself succeeds.
    let garbage = Bytes::from_static(&[0xFF, 0x00, 0xFF, 0x00, 0x13, 0x37]);
    let manifest_id = ManifestId::from_data(&garbage);
    store.put(manifest_id.into(), garbage).await.unwrap();

    let err = try_restore(&reassembler, manifest_id).await.unwrap_err();
    assert!(
        matches!(err, EngineError::Cas(CasError::Decode(_))),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_corrupt_descriptor_set_rejected_before_fetching() {
    use silt_types::{ChunkDescriptor, ChunkId, MANIFEST_VERSION, Manifest};

    let (store, _splitter, reassembler) = memory_pipeline(256);

    // An index gap the codec cannot see but validation must.
    let manifest = Manifest {
        version: MANIFEST_VERSION,
        total_size: 20,
        chunk_size: 256,
        chunks: vec![
            ChunkDescriptor {
                chunk_id: ChunkId::from_data(b"a"),
                index: 0,
                size: 10,
            },
            ChunkDescriptor {
                chunk_id: ChunkId::from_data(b"b"),
                index: 5,
                size: 10,
            },
        ],
        created_at: 0,
        metadata: Default::default(),
    };
    let bytes = silt_cas::encode_manifest(&manifest).unwrap();
    let manifest_id = ManifestId::from_data(&bytes);
    store.put(manifest_id.into(), Bytes::from(bytes)).await.unwrap();

    let err = try_restore(&reassembler, manifest_id).await.unwrap_err();
    assert!(
        matches!(err, EngineError::Cas(CasError::InvalidManifest { .. })),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_file_store_rot_surfaces_as_store_error() {
    use std::sync::Arc;

    use silt_store::FileStore;
    use silt_types::EngineConfig;

    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(FileStore::new(dir.path()).unwrap());
    let config = EngineConfig {
        chunk_size: 256,
        ..EngineConfig::default()
    };
    let (splitter, reassembler) = super::helpers::pipeline_over(store.clone(), config);

    let (manifest_id, manifest) = store_bytes(&splitter, &test_data(1000)).await;

    // Rot a chunk file on disk; FileStore verifies on read.
    let hex = silt_types::BlockId::from(manifest.chunks[1].chunk_id).to_string();
    let path = dir
        .path()
        .join(&hex[0..2])
        .join(&hex[2..4])
        .join(&hex);
    std::fs::write(path, vec![0u8; 256]).unwrap();

    let err = try_restore(&reassembler, manifest_id).await.unwrap_err();
    assert!(
        matches!(err, EngineError::Store(StoreError::CorruptBlock { .. })),
        "got: {err}"
    );
}
