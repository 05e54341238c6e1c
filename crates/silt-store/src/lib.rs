//! Block storage trait and backend implementations.
//!
//! This crate defines the [`BlockStore`] trait for persisting
//! content-addressed blocks, along with three backends:
//!
//! - [`MemoryStore`] — in-memory storage backed by a `RwLock<HashMap>`.
//! - [`FileStore`] — file-based storage with a 2-level fan-out directory layout.
//! - [`SlowStore`] — a latency-injecting wrapper for concurrency tests.

mod error;
mod file_store;
mod memory_store;
mod slow_store;
mod traits;

pub use error::StoreError;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use slow_store::SlowStore;
pub use traits::BlockStore;
