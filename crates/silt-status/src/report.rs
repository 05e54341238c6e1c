//! Status records returned by the remote deal/pin API.

use serde::{Deserialize, Serialize};
use silt_types::ManifestId;

/// Pinning and aggregation state of one submitted file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStatus {
    /// Whether the content is live on the remote service.
    pub active: bool,
    /// Whether a pin operation is still in progress.
    pub pinning: bool,
    /// Remote pinning state label (e.g. `"pinned"`, `"queued"`).
    pub pinning_status: String,
    /// Remote deal state label (e.g. `"deal-made"`, `"failed"`).
    pub deal_status: String,
    /// How many replicas the service reports.
    pub replication: u32,
    /// Whether the remote service gave up on this content.
    pub failed: bool,
    /// Unix timestamp (seconds) of the last remote update.
    pub updated_at: u64,
}

/// One storage deal the remote service made for the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStatus {
    /// On-chain deal identifier.
    pub deal_id: i64,
    /// Deal UUID assigned by the service.
    pub deal_uuid: String,
    /// Storage provider the deal was made with.
    pub provider: String,
    /// Whether the deal failed.
    pub failed: bool,
    /// Whether the deal is verified.
    pub verified: bool,
    /// Whether the provider was slashed.
    pub slashed: bool,
    /// Unix timestamp (seconds) when the sector was sealed, if it was.
    pub sealed_at: Option<u64>,
    /// Unix timestamp (seconds) when the deal landed on chain, if it did.
    pub on_chain_at: Option<u64>,
}

/// Everything the remote API reports for one manifest ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// The file-level identifier the status belongs to.
    pub manifest_id: ManifestId,
    /// Pin/aggregation state.
    pub content: ContentStatus,
    /// Deals made so far.
    pub deals: Vec<DealStatus>,
    /// How many times the remote service failed to process the content.
    pub failures_count: u32,
}

impl StatusReport {
    /// A report with default content state and no deals.
    pub fn new(manifest_id: ManifestId) -> Self {
        Self {
            manifest_id,
            content: ContentStatus::default(),
            deals: Vec::new(),
            failures_count: 0,
        }
    }
}
