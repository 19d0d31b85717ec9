//! Canonical serialization for deterministic hashing.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: vectors serialize in index order
//! - No HashMap in hashed data: sort first, as [`class_fingerprint`] does

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

use crate::types::TreeMask;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, 0))
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}

/// Fingerprint of a set of canonical representatives, independent of the
/// order they were found in.
pub fn class_fingerprint(representatives: &[TreeMask]) -> Result<String, serde_json::Error> {
    let mut sorted = representatives.to_vec();
    sorted.sort_unstable();
    canonical_hash_hex(&sorted)
}
