//! Core trait for content-addressed block storage.

use bytes::Bytes;
use silt_types::BlockId;

use crate::error::StoreError;

/// Trait for storing and retrieving content-addressed blocks.
///
/// Keys are [`BlockId`]s, so a key fully determines its content: re-putting
/// an existing ID is a harmless overwrite with identical bytes, and
/// concurrent puts of the same ID can never conflict. Implementations must
/// be `Send + Sync` for use across async tasks; data moves as [`Bytes`] to
/// keep transfers through the pipeline zero-copy.
#[async_trait::async_trait]
pub trait BlockStore: Send + Sync {
    /// Store a block under the given ID. Idempotent for duplicate IDs.
    async fn put(&self, id: BlockId, data: Bytes) -> Result<(), StoreError>;

    /// Retrieve a block by ID. Returns `None` if not found.
    async fn get(&self, id: BlockId) -> Result<Option<Bytes>, StoreError>;

    /// Delete a block by ID. Used only by external garbage collection.
    async fn delete(&self, id: BlockId) -> Result<(), StoreError>;

    /// Check whether a block exists.
    async fn contains(&self, id: BlockId) -> Result<bool, StoreError>;

    /// List all stored block IDs.
    async fn list(&self) -> Result<Vec<BlockId>, StoreError>;

    /// Verify block integrity by re-hashing and comparing to the ID.
    async fn verify(&self, id: BlockId) -> Result<bool, StoreError>;
}
