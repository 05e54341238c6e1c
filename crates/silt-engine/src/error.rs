//! Error types for the split/reassemble pipelines.

use silt_types::{ChunkId, ManifestId};

/// Errors surfaced by [`Splitter`](crate::Splitter) and
/// [`Reassembler`](crate::Reassembler).
///
/// Nothing here is retried internally; retry policy belongs to the caller.
/// Corruption (`Cas`, the mismatch variants) is kept distinct from absence
/// (`ManifestNotFound`, `MissingChunk`): the former implies data loss, the
/// latter may just mean a fetch is worth retrying elsewhere.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input stream failed during a split.
    #[error("input read error: {0}")]
    Read(#[source] std::io::Error),

    /// The output sink failed during a reassembly.
    #[error("sink write error: {0}")]
    Sink(#[source] std::io::Error),

    /// Block store operation failed.
    #[error("store error: {0}")]
    Store(#[from] silt_store::StoreError),

    /// Manifest codec or validation error.
    #[error("cas error: {0}")]
    Cas(#[from] silt_cas::CasError),

    /// No block exists under the given manifest ID.
    #[error("manifest not found: {0}")]
    ManifestNotFound(ManifestId),

    /// A chunk referenced by the manifest is absent from the store.
    #[error("missing chunk at index {index}: {chunk_id}")]
    MissingChunk {
        /// Position of the missing chunk in the manifest.
        index: u32,
        /// Its content identifier.
        chunk_id: ChunkId,
    },

    /// A fetched chunk's length disagrees with its descriptor.
    #[error(
        "corrupt chunk at index {index} ({chunk_id}): descriptor says {expected} bytes, store returned {actual}"
    )]
    ChunkSizeMismatch {
        /// Position of the chunk in the manifest.
        index: u32,
        /// Its content identifier.
        chunk_id: ChunkId,
        /// Size recorded in the descriptor.
        expected: u32,
        /// Size of the bytes actually fetched.
        actual: usize,
    },

    /// A fetched chunk's bytes no longer hash to its identifier.
    #[error("corrupt chunk at index {index}: expected {expected}, actual hash {actual}")]
    ChunkHashMismatch {
        /// Position of the chunk in the manifest.
        index: u32,
        /// The identifier the manifest recorded.
        expected: ChunkId,
        /// The hash of the bytes the store returned.
        actual: ChunkId,
    },

    /// A pipeline worker task panicked or was cancelled.
    #[error("task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
