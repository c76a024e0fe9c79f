//! Ristretto group adapter for the RingCT protocol.
//!
//! Hash-to-scalar and hash-to-point primitives plus the deterministic
//! auxiliary-generator cache shared by every proof in the crate.

/// Hashing onto the scalar field and the group.
pub mod hash;

/// Deterministic auxiliary generators and commitment primitives.
pub mod generators;

// Re-export
pub use self::generators::Generators;
pub use self::hash::{fast_hash, hash_to_point, hash_to_scalar};
