//! Hashing primitives used throughout the protocol.
//!
//! Challenges are scalars obtained by wide reduction of a Sha3-512 digest;
//! generators are obtained by hashing onto the Ristretto group. `fast_hash`
//! is the plain 32-byte digest folded into the RingCT message.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use sha3::{Digest, Keccak256, Sha3_512};

/// Hashes arbitrary bytes to a scalar mod the group order.
///
/// Uses a 64-byte digest with wide reduction, so the result is
/// indistinguishable from uniform.
pub fn hash_to_scalar(bytes: &[u8]) -> Scalar {
    let mut hasher = Sha3_512::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Hashes arbitrary bytes onto the Ristretto group.
pub fn hash_to_point(bytes: &[u8]) -> RistrettoPoint {
    RistrettoPoint::hash_from_bytes::<Sha3_512>(bytes)
}

/// Plain Keccak-256 digest of the input.
pub fn fast_hash(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
