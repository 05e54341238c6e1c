//! Manifest building, validation, and the wire codec.
//!
//! A [`Manifest`] is the ordered list of chunk descriptors that names a
//! file. It is stored as a regular block: serialized with postcard, then
//! put into the block store under `blake3(bytes)`. Because the identifier
//! is derived from the encoded form, the manifest never embeds its own ID
//! and `decode_manifest(encode_manifest(m)) == m` holds exactly.

use silt_types::{ChunkDescriptor, MANIFEST_VERSION, Manifest};

use crate::error::CasError;

/// Build a [`Manifest`] from chunk descriptors.
///
/// `total_size` must equal the sum of descriptor sizes and the descriptors
/// must carry indices `0..N` in order; both are checked so a malformed
/// manifest can never be published in the first place.
pub fn build_manifest(
    chunks: Vec<ChunkDescriptor>,
    total_size: u64,
    chunk_size: u32,
    metadata: std::collections::BTreeMap<String, String>,
) -> Result<Manifest, CasError> {
    build_manifest_with_timestamp(chunks, total_size, chunk_size, metadata, now_secs())
}

/// Build a manifest with an explicit timestamp (for deterministic testing).
pub fn build_manifest_with_timestamp(
    chunks: Vec<ChunkDescriptor>,
    total_size: u64,
    chunk_size: u32,
    metadata: std::collections::BTreeMap<String, String>,
    created_at: u64,
) -> Result<Manifest, CasError> {
    let manifest = Manifest {
        version: MANIFEST_VERSION,
        total_size,
        chunk_size,
        chunks,
        created_at,
        metadata,
    };
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Serialize a manifest to postcard bytes.
///
/// Descriptor order in the byte representation is descriptor order in the
/// manifest; the codec never re-sorts.
pub fn encode_manifest(manifest: &Manifest) -> Result<Vec<u8>, CasError> {
    postcard::to_allocvec(manifest).map_err(|e| CasError::Serialization(e.to_string()))
}

/// Deserialize a manifest from postcard bytes.
///
/// Truncated or garbage input fails with [`CasError::Decode`]; a manifest
/// with an unknown version number is rejected rather than silently
/// misinterpreted across format changes. Structural invariants are *not*
/// checked here — callers run [`validate_manifest`] separately so that
/// "malformed bytes" and "corrupt descriptor set" stay distinguishable.
pub fn decode_manifest(bytes: &[u8]) -> Result<Manifest, CasError> {
    let manifest: Manifest =
        postcard::from_bytes(bytes).map_err(|e| CasError::Decode(e.to_string()))?;
    if manifest.version != MANIFEST_VERSION {
        return Err(CasError::UnsupportedVersion {
            found: manifest.version,
            supported: MANIFEST_VERSION,
        });
    }
    Ok(manifest)
}

/// Check the structural invariants of a manifest.
///
/// For N descriptors the index set must be exactly `0..N` (no gaps, no
/// duplicates, ascending), and `total_size` must equal the sum of the
/// descriptor sizes. Reconstructing from a manifest that violates either
/// would silently produce a wrong byte sequence, so violations are fatal.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), CasError> {
    let mut sum = 0u64;
    for (position, desc) in manifest.chunks.iter().enumerate() {
        if desc.index as usize != position {
            return Err(CasError::InvalidManifest {
                reason: format!(
                    "descriptor at position {position} has index {}, expected {position}",
                    desc.index
                ),
            });
        }
        if desc.size == 0 {
            return Err(CasError::InvalidManifest {
                reason: format!("descriptor {} has zero size", desc.index),
            });
        }
        sum += desc.size as u64;
    }
    if sum != manifest.total_size {
        return Err(CasError::InvalidManifest {
            reason: format!(
                "descriptor sizes sum to {sum}, manifest claims {}",
                manifest.total_size
            ),
        });
    }
    Ok(())
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
