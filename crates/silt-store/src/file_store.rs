//! File-based block storage backend.
//!
//! Stores one file per block with a 2-level fan-out directory structure:
//! `{base_dir}/{hex[0..2]}/{hex[2..4]}/{hex}`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;
use silt_types::BlockId;
use tracing::{debug, error};

use crate::error::StoreError;
use crate::traits::BlockStore;

/// File-based block store with 2-level fan-out directory layout.
///
/// Each block is stored as a file at:
/// `{base_dir}/{hex(id)[0..2]}/{hex(id)[2..4]}/{hex(id)}`.
///
/// Writes are atomic: data is written to a temporary file first, then
/// renamed into place. This prevents corrupted blocks from partial writes,
/// and makes duplicate puts of the same ID safe to run concurrently.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new file store rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Compute the full file path for a block ID.
    fn block_path(&self, id: &BlockId) -> PathBuf {
        let hex = id.to_string();
        self.base_dir.join(&hex[0..2]).join(&hex[2..4]).join(&hex)
    }
}

#[async_trait::async_trait]
impl BlockStore for FileStore {
    async fn put(&self, id: BlockId, data: Bytes) -> Result<(), StoreError> {
        let path = self.block_path(&id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Atomic write: write to a temp file in the same directory, then rename.
        // This ensures we never leave a half-written block on disk.
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        debug!(%id, path = %path.display(), size = data.len(), "stored block to file");
        Ok(())
    }

    async fn get(&self, id: BlockId) -> Result<Option<Bytes>, StoreError> {
        let path = self.block_path(&id);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                // Verify-on-read: always re-hash and compare to the BlockId.
                // A corrupt block is an error, not a value, so the caller can
                // distinguish rot from absence.
                let actual_id = BlockId::from_data(&data);
                if actual_id != id {
                    error!(expected = %id, actual = %actual_id, "block corruption detected on read");
                    return Err(StoreError::CorruptBlock {
                        expected: id,
                        actual: actual_id,
                    });
                }
                Ok(Some(Bytes::from(data)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn delete(&self, id: BlockId) -> Result<(), StoreError> {
        let path = self.block_path(&id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(%id, "deleted block file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn contains(&self, id: BlockId) -> Result<bool, StoreError> {
        let path = self.block_path(&id);
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn list(&self) -> Result<Vec<BlockId>, StoreError> {
        let mut ids = Vec::new();
        let base = self.base_dir.clone();

        // Walk the 2-level fan-out: base/XX/YY/<hex>
        let mut level0 = tokio::fs::read_dir(&base).await?;
        while let Some(d0) = level0.next_entry().await? {
            if !d0.file_type().await?.is_dir() {
                continue;
            }
            let mut level1 = tokio::fs::read_dir(d0.path()).await?;
            while let Some(d1) = level1.next_entry().await? {
                if !d1.file_type().await?.is_dir() {
                    continue;
                }
                let mut files = tokio::fs::read_dir(d1.path()).await?;
                while let Some(entry) = files.next_entry().await? {
                    if !entry.file_type().await?.is_file() {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str()
                        && let Ok(id) = BlockId::from_str(name)
                    {
                        ids.push(id);
                    }
                }
            }
        }
        Ok(ids)
    }

    async fn verify(&self, id: BlockId) -> Result<bool, StoreError> {
        let path = self.block_path(&id);
        match tokio::fs::read(&path).await {
            Ok(data) => {
                let computed = BlockId::from_data(&data);
                Ok(computed == id)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
