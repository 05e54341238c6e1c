//! Shared types and identifiers for silt.
//!
//! This crate defines the core types used across the silt workspace:
//! content identifiers ([`ChunkId`], [`ManifestId`]), the manifest data
//! model ([`Manifest`], [`ChunkDescriptor`]), and engine configuration
//! ([`EngineConfig`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current manifest envelope version.
///
/// Bumped whenever the serialized layout of [`Manifest`] changes; decoding
/// rejects unknown versions rather than misinterpreting old data.
pub const MANIFEST_VERSION: u8 = 1;

/// Default chunk size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u32 = 1_048_576;

// ---------------------------------------------------------------------------
// ID types
// ---------------------------------------------------------------------------

/// Error returned when parsing an ID from a hex string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError;

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected 64 hex characters")
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Create an ID by hashing arbitrary data with BLAKE3.
            pub fn from_data(data: &[u8]) -> Self {
                Self(blake3::hash(data).into())
            }

            /// Return the raw 32-byte representation.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            /// Parse an ID from its 64-character lowercase hex form.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                hex_to_bytes(s).map(Self).ok_or(ParseIdError)
            }
        }
    };
}

define_id!(
    /// Storage key for any content-addressed block: `blake3(block_data)`.
    ///
    /// Both chunks and encoded manifests are stored as blocks; [`ChunkId`]
    /// and [`ManifestId`] convert into `BlockId` losslessly.
    BlockId
);

define_id!(
    /// Content-addressed identifier for a chunk: `blake3(chunk_data)`.
    ChunkId
);

define_id!(
    /// Content-addressed identifier for a whole file:
    /// `blake3(encoded_manifest)`.
    ///
    /// This is the externally visible handle for a stored file — the value
    /// surrounding metadata stores persist and hand back to clients.
    ManifestId
);

impl From<ChunkId> for BlockId {
    fn from(id: ChunkId) -> Self {
        Self(id.0)
    }
}

impl From<ManifestId> for BlockId {
    fn from(id: ManifestId) -> Self {
        Self(id.0)
    }
}

fn hex_to_bytes(s: &str) -> Option<[u8; 32]> {
    if s.len() != 64 {
        return None;
    }
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Manifest data model
// ---------------------------------------------------------------------------

/// One chunk of a split file, as recorded in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    /// Content-addressed identifier for this chunk.
    pub chunk_id: ChunkId,
    /// Zero-based position of this chunk in the original stream.
    ///
    /// For a manifest of N descriptors the index set is exactly `0..N`:
    /// no gaps, no duplicates.
    pub index: u32,
    /// Size of this chunk in bytes.
    pub size: u32,
}

/// Ordered description of how a file was split.
///
/// Concatenating chunk bytes in ascending `index` order reproduces the
/// original input byte-for-byte. The manifest is serialized and stored as a
/// regular block; its [`ManifestId`] is the BLAKE3 hash of those encoded
/// bytes, so the manifest never embeds its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Envelope version, see [`MANIFEST_VERSION`].
    pub version: u8,
    /// Total size of the original stream in bytes.
    pub total_size: u64,
    /// Chunk size the stream was split with (last chunk may be smaller).
    pub chunk_size: u32,
    /// Per-chunk descriptors in ascending index order.
    pub chunks: Vec<ChunkDescriptor>,
    /// Unix timestamp (seconds) when the file was split.
    pub created_at: u64,
    /// User-supplied metadata (e.g. filename, content-type).
    pub metadata: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the split/reassemble pipelines.
///
/// Passed explicitly into `Splitter`/`Reassembler` construction; nothing is
/// read from ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chunk size in bytes.
    pub chunk_size: u32,
    /// Maximum block store puts in flight during a split.
    pub put_concurrency: usize,
    /// Maximum block store gets in flight during a reassembly.
    pub fetch_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            put_concurrency: 8,
            fetch_concurrency: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
