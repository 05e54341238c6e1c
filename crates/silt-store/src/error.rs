//! Error types for block storage operations.

use silt_types::BlockId;

/// Errors that can occur during block storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested block was not found.
    #[error("block not found: {0}")]
    NotFound(BlockId),

    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The store has reached its capacity limit.
    #[error("store capacity exceeded: need {needed} bytes, only {available} available")]
    CapacityExceeded {
        /// Bytes needed for the operation.
        needed: u64,
        /// Bytes currently available.
        available: u64,
    },

    /// Block data on disk does not match its content-addressed ID.
    #[error("block corruption detected: expected {expected}, actual hash {actual}")]
    CorruptBlock {
        /// The ID that was requested.
        expected: BlockId,
        /// The ID computed from the data actually on disk.
        actual: BlockId,
    },
}
