//! The two seams of the reconciliation job.

use silt_types::ManifestId;

use crate::error::StatusError;
use crate::report::StatusReport;

/// Fetches deal/pin status from the remote API.
///
/// Abstracts the transport so the poller can be tested without a network;
/// the production implementation (HTTP against the remote endpoint) lives
/// outside this workspace.
#[async_trait::async_trait]
pub trait StatusClient: Send + Sync {
    /// Fetch the current status for one manifest ID.
    ///
    /// Returns `Ok(None)` when the remote service does not know the ID yet.
    async fn fetch(&self, manifest_id: ManifestId) -> Result<Option<StatusReport>, StatusError>;
}

/// Local persistence for tracked IDs and fetched reports.
#[async_trait::async_trait]
pub trait StatusStore: Send + Sync {
    /// The manifest IDs whose status should be reconciled.
    async fn tracked(&self) -> Result<Vec<ManifestId>, StatusError>;

    /// Insert or replace the stored report for its manifest ID.
    async fn upsert(&self, report: StatusReport) -> Result<(), StatusError>;
}
