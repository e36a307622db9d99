//! Deterministic hashing of canonical signatures.
//!
//! Signature fingerprints are SHA-256 (NIST FIPS 180-4) over a domain tag and
//! a length-prefixed payload. Equal signatures hash identically across runs
//! and processes; triple and signature hashes live in separate domains.

use crate::signature::{Signature, Triple};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain for a single relation triple (v1).
pub const DOMAIN_TRIPLE_V1: &[u8] = b"KG_TRIPLE";

/// Domain for a full canonical signature (v1).
pub const DOMAIN_SIGNATURE_V1: &[u8] = b"KG_SIGNATURE";

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Creates a zero hash (all zeros).
    #[inline]
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Creates a hash from a raw byte array.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA-256 of the given data with domain separation.
    ///
    /// Layout: `b"KGP:<domain>:v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"KGP:");
        hasher.update(domain);
        hasher.update(b":v1");
        let len = data.len() as u64;
        hasher.update(len.to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Lower-case hex encoding of all 32 bytes.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are enough to tell variants apart in logs.
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Appends `bytes` with a 64-bit little-endian length prefix.
fn push_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    out.extend_from_slice(bytes);
}

/// Hash of one triple. Each component is length prefixed, so
/// `("ab", "c", "d")` and `("a", "bc", "d")` hash differently.
pub fn triple_hash(triple: &Triple) -> HashValue {
    let mut data = Vec::with_capacity(
        24 + triple.source.len() + triple.relation.len() + triple.target.len(),
    );
    push_prefixed(&mut data, triple.source.as_bytes());
    push_prefixed(&mut data, triple.relation.as_bytes());
    push_prefixed(&mut data, triple.target.as_bytes());
    HashValue::hash_with_domain(DOMAIN_TRIPLE_V1, &data)
}

/// Hash of a canonical signature.
///
/// The signature is already sorted, so the hash depends only on the triple
/// multiset: graphs that differ only in edge order or node ids fingerprint
/// identically.
pub fn signature_fingerprint(signature: &Signature) -> HashValue {
    let triples = signature.triples();
    let mut data = Vec::with_capacity(8 + triples.len() * 32);
    data.extend_from_slice(&(triples.len() as u64).to_le_bytes());
    for triple in triples {
        data.extend_from_slice(triple_hash(triple).as_bytes());
    }
    HashValue::hash_with_domain(DOMAIN_SIGNATURE_V1, &data)
}
