//! The reassemble pipeline: manifest ID → ordered chunk fetches → sink.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use silt_cas::{decode_manifest, validate_manifest};
use silt_store::BlockStore;
use silt_types::{ChunkDescriptor, ChunkId, EngineConfig, Manifest, ManifestId};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::EngineError;

/// Reconstructs the original byte stream named by a [`ManifestId`].
///
/// Chunk fetches run with bounded concurrency, but bytes reach the sink
/// strictly in ascending index order: completed fetches park in an ordering
/// buffer until their turn comes. Any miss, size disagreement, or hash
/// disagreement aborts the reassembly — the sink may then hold a truncated
/// prefix which callers must discard, but it never holds wrong bytes
/// presented as complete.
pub struct Reassembler {
    store: Arc<dyn BlockStore>,
    config: EngineConfig,
}

impl Reassembler {
    /// Create a reassembler over the given store.
    pub fn new(store: Arc<dyn BlockStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Fetch and decode the manifest named by `manifest_id`.
    ///
    /// A store miss is [`EngineError::ManifestNotFound`]; malformed bytes
    /// and invariant violations surface as distinct
    /// [`CasError`](silt_cas::CasError) variants so callers can tell
    /// absence from corruption.
    pub async fn fetch_manifest(&self, manifest_id: ManifestId) -> Result<Manifest, EngineError> {
        let bytes = self
            .store
            .get(manifest_id.into())
            .await?
            .ok_or(EngineError::ManifestNotFound(manifest_id))?;

        let manifest = decode_manifest(&bytes)?;
        validate_manifest(&manifest)?;
        Ok(manifest)
    }

    /// Reassemble the file named by `manifest_id` into `sink`.
    ///
    /// On success the sink holds the exact original byte stream; the
    /// returned count equals the manifest's `total_size`.
    pub async fn reassemble(
        &self,
        manifest_id: ManifestId,
        sink: impl AsyncWrite + Unpin,
    ) -> Result<u64, EngineError> {
        let manifest = self.fetch_manifest(manifest_id).await?;

        debug!(
            %manifest_id,
            chunks = manifest.chunks.len(),
            total_size = manifest.total_size,
            "reassembling"
        );

        let written = self.write_chunks(&manifest, sink).await?;

        info!(%manifest_id, written, "reassembly complete");
        Ok(written)
    }

    /// Fetch every chunk of an already-validated manifest and write them to
    /// `sink` in ascending index order.
    async fn write_chunks(
        &self,
        manifest: &Manifest,
        mut sink: impl AsyncWrite + Unpin,
    ) -> Result<u64, EngineError> {
        // Defensive re-sort; the codec preserves order and validation has
        // already established contiguity.
        let mut descriptors = manifest.chunks.clone();
        descriptors.sort_by_key(|d| d.index);

        let semaphore = Arc::new(Semaphore::new(self.config.fetch_concurrency));
        let mut fetches: JoinSet<Result<(u32, Bytes), EngineError>> = JoinSet::new();

        for desc in descriptors {
            let store = self.store.clone();
            let semaphore = semaphore.clone();
            fetches.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                let data = fetch_chunk(store.as_ref(), &desc).await?;
                Ok((desc.index, data))
            });
        }

        // Fetches complete in arbitrary order; the buffer holds them until
        // their index is next in line. The sink only ever sees in-order bytes.
        let mut parked: BTreeMap<u32, Bytes> = BTreeMap::new();
        let mut next_index = 0u32;
        let mut written = 0u64;

        while let Some(joined) = fetches.join_next().await {
            let (index, data) = joined??;
            parked.insert(index, data);

            while let Some(data) = parked.remove(&next_index) {
                sink.write_all(&data).await.map_err(EngineError::Sink)?;
                written += data.len() as u64;
                next_index += 1;
            }
        }

        sink.flush().await.map_err(EngineError::Sink)?;
        Ok(written)
    }
}

/// Fetch one chunk and check it against its descriptor.
async fn fetch_chunk(
    store: &dyn BlockStore,
    desc: &ChunkDescriptor,
) -> Result<Bytes, EngineError> {
    let data = store
        .get(desc.chunk_id.into())
        .await?
        .ok_or(EngineError::MissingChunk {
            index: desc.index,
            chunk_id: desc.chunk_id,
        })?;

    if data.len() != desc.size as usize {
        return Err(EngineError::ChunkSizeMismatch {
            index: desc.index,
            chunk_id: desc.chunk_id,
            expected: desc.size,
            actual: data.len(),
        });
    }

    // Re-hash to catch same-length bit rot and address collisions.
    let actual = ChunkId::from_data(&data);
    if actual != desc.chunk_id {
        return Err(EngineError::ChunkHashMismatch {
            index: desc.index,
            expected: desc.chunk_id,
            actual,
        });
    }

    Ok(data)
}
