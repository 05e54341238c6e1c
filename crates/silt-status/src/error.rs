//! Error types for status reconciliation.

/// Errors that can occur while reconciling remote deal/pin status.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// The remote status API call failed.
    #[error("status client error: {0}")]
    Client(String),

    /// Persisting a fetched report failed.
    #[error("status store error: {0}")]
    Store(String),
}
