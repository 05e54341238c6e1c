//! Error types for content addressing operations.

/// Errors that can occur during chunking and manifest codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CasError {
    /// Serializing a manifest failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Manifest bytes are malformed or truncated.
    #[error("manifest decode error: {0}")]
    Decode(String),

    /// An I/O error occurred during streaming.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest has an unsupported version.
    #[error("unsupported manifest version {found}, this build supports version {supported}")]
    UnsupportedVersion {
        /// Version found in the manifest.
        found: u8,
        /// Version this build supports.
        supported: u8,
    },

    /// Manifest violates a structural invariant.
    ///
    /// Distinct from [`CasError::Decode`]: the bytes parsed fine but the
    /// descriptor set is inconsistent, which indicates corruption rather
    /// than a framing problem.
    #[error("corrupt manifest: {reason}")]
    InvalidManifest {
        /// Which invariant was violated.
        reason: String,
    },
}
