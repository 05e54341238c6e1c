//! Split and reassemble pipelines over a content-addressed block store.
//!
//! The two halves of the round-trip contract live here:
//!
//! - [`Splitter`] — reads a byte stream in fixed-size windows, stores each
//!   window as a content-addressed block, and publishes an ordered manifest
//!   whose own block ID becomes the file-level identifier.
//! - [`Reassembler`] — resolves a manifest ID back to the exact original
//!   byte stream, verifying ordering and chunk integrity along the way.
//!
//! Both operate against an `Arc<dyn BlockStore>`, so any backend — memory,
//! disk, or a remote DAG store — can sit underneath without the pipelines
//! changing.

mod error;
mod reassembler;
mod splitter;

#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use reassembler::Reassembler;
pub use splitter::Splitter;
