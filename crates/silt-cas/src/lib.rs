//! Content addressing, chunking, and the manifest codec.
//!
//! This crate provides:
//! - [`Chunker`] — splits data into fixed-size chunks, each identified by its
//!   BLAKE3 hash.
//! - [`build_manifest`] — constructs a [`Manifest`](silt_types::Manifest)
//!   from chunk descriptors.
//! - [`encode_manifest`] / [`decode_manifest`] — the postcard wire codec that
//!   lets a manifest be stored as a content-addressed block of its own.
//! - [`validate_manifest`] — the index-contiguity check the reassembler runs
//!   before trusting a decoded manifest.

mod chunker;
mod error;
mod manifest;

pub use chunker::{Chunk, Chunker};
pub use error::CasError;
pub use manifest::{
    build_manifest, build_manifest_with_timestamp, decode_manifest, encode_manifest,
    validate_manifest,
};
