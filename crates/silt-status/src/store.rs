//! In-memory status store, for tests and single-process deployments.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use silt_types::ManifestId;

use crate::error::StatusError;
use crate::report::StatusReport;
use crate::traits::StatusStore;

/// Keeps the tracked set and the latest report per ID behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tracked: BTreeSet<ManifestId>,
    reports: BTreeMap<ManifestId, StatusReport>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start reconciling status for a manifest ID.
    pub fn track(&self, manifest_id: ManifestId) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.tracked.insert(manifest_id);
    }

    /// Stop reconciling a manifest ID. Its last report is kept.
    pub fn untrack(&self, manifest_id: &ManifestId) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.tracked.remove(manifest_id);
    }

    /// The most recently upserted report for an ID, if any.
    pub fn get(&self, manifest_id: &ManifestId) -> Option<StatusReport> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.reports.get(manifest_id).cloned()
    }
}

#[async_trait::async_trait]
impl StatusStore for MemoryStatusStore {
    async fn tracked(&self) -> Result<Vec<ManifestId>, StatusError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.tracked.iter().copied().collect())
    }

    async fn upsert(&self, report: StatusReport) -> Result<(), StatusError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.reports.insert(report.manifest_id, report);
        Ok(())
    }
}
