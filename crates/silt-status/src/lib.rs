//! Remote deal/pin status reconciliation.
//!
//! After a file is split and its manifest published, surrounding services
//! submit the file-level [`ManifestId`](silt_types::ManifestId) to a remote
//! pinning/deal service and later want to know how that submission is
//! doing. This crate specifies that boundary and runs the reconciliation
//! loop:
//!
//! - [`StatusClient`] — fetches the current [`StatusReport`] for one
//!   manifest ID from the remote API. The HTTP transport lives outside this
//!   workspace; tests use an in-memory mock.
//! - [`StatusStore`] — the set of tracked IDs plus upsert of fetched
//!   reports into local metadata.
//! - [`StatusPoller`] — periodic job that walks the tracked set, fetches,
//!   and upserts. It never influences split/reassemble correctness.

mod error;
mod poller;
mod report;
mod store;
mod traits;

pub use error::StatusError;
pub use poller::{StatusPoller, StatusPollerConfig};
pub use report::{ContentStatus, DealStatus, StatusReport};
pub use store::MemoryStatusStore;
pub use traits::{StatusClient, StatusStore};
