//! The split pipeline: stream → chunks → block store → published manifest.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use silt_cas::{CasError, Chunker, build_manifest, encode_manifest};
use silt_store::BlockStore;
use silt_types::{ChunkDescriptor, ChunkId, EngineConfig, Manifest, ManifestId};
use tokio::io::AsyncRead;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::EngineError;

/// Splits a byte stream into fixed-size content-addressed chunks.
///
/// Chunk puts are dispatched concurrently up to `put_concurrency` in
/// flight; the manifest is only assembled once every put has confirmed, so
/// a published [`ManifestId`] always names fully durable data. If anything
/// fails mid-split no manifest is returned — chunks already written stay in
/// the store as harmless content-addressed orphans for external GC.
pub struct Splitter {
    store: Arc<dyn BlockStore>,
    chunker: Chunker,
    config: EngineConfig,
}

impl Splitter {
    /// Create a splitter over the given store.
    pub fn new(store: Arc<dyn BlockStore>, config: EngineConfig) -> Self {
        Self {
            store,
            chunker: Chunker::new(config.chunk_size),
            config,
        }
    }

    /// Split a stream into stored chunks and return its manifest.
    ///
    /// The manifest is *not* yet stored; call [`Splitter::publish`] to
    /// obtain the file-level identifier. An empty stream yields a valid
    /// manifest with zero descriptors.
    pub async fn split(
        &self,
        mut reader: impl AsyncRead + Unpin,
        metadata: BTreeMap<String, String>,
    ) -> Result<Manifest, EngineError> {
        let semaphore = Arc::new(Semaphore::new(self.config.put_concurrency));
        let mut puts: JoinSet<Result<(), silt_store::StoreError>> = JoinSet::new();
        let mut descriptors = Vec::new();
        let mut total_size = 0u64;

        let result = async {
            let mut index = 0u32;
            loop {
                let window = match self.chunker.next_window(&mut reader).await {
                    Ok(Some(window)) => window,
                    Ok(None) => break,
                    Err(CasError::Io(e)) => return Err(EngineError::Read(e)),
                    Err(e) => return Err(e.into()),
                };

                let data = Bytes::from(window);
                let chunk_id = ChunkId::from_data(&data);
                let size = data.len() as u32;
                total_size += size as u64;
                debug!(%chunk_id, index, size, "dispatching chunk put");
                descriptors.push(ChunkDescriptor {
                    chunk_id,
                    index,
                    size,
                });
                index += 1;

                let permit = semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .expect("semaphore closed");
                let store = self.store.clone();
                puts.spawn(async move {
                    let _permit = permit;
                    store.put(chunk_id.into(), data).await
                });

                // Surface put failures as soon as they land instead of
                // reading the rest of the stream first.
                while let Some(joined) = puts.try_join_next() {
                    joined??;
                }
            }

            // Barrier: every chunk must be durable before the manifest
            // exists at all.
            while let Some(joined) = puts.join_next().await {
                joined??;
            }
            Ok(())
        }
        .await;

        if let Err(e) = result {
            // Cancel in-flight puts; orphaned chunks are content-addressed
            // and reachable garbage only.
            puts.abort_all();
            return Err(e);
        }

        let manifest = build_manifest(
            descriptors,
            total_size,
            self.config.chunk_size,
            metadata,
        )?;

        info!(
            total_size,
            chunks = manifest.chunks.len(),
            "split complete"
        );

        Ok(manifest)
    }

    /// Encode a manifest and store it as a block of its own.
    ///
    /// Returns the [`ManifestId`] — the file-level identifier handed to
    /// callers and surrounding metadata stores.
    pub async fn publish(&self, manifest: &Manifest) -> Result<ManifestId, EngineError> {
        let bytes = encode_manifest(manifest)?;
        let manifest_id = ManifestId::from_data(&bytes);
        self.store
            .put(manifest_id.into(), Bytes::from(bytes))
            .await?;

        info!(%manifest_id, chunks = manifest.chunks.len(), "manifest published");
        Ok(manifest_id)
    }

    /// Split a stream and publish its manifest in one call.
    pub async fn split_and_publish(
        &self,
        reader: impl AsyncRead + Unpin,
        metadata: BTreeMap<String, String>,
    ) -> Result<(ManifestId, Manifest), EngineError> {
        let manifest = self.split(reader, metadata).await?;
        let manifest_id = self.publish(&manifest).await?;
        Ok((manifest_id, manifest))
    }
}
