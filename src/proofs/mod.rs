//! The zero-knowledge proof stack.
//!
//! [`RangeProof`] proves a committed amount lies in `[0, 2^64)`;
//! [`BitMatrixProof`] proves a committed matrix is a one-hot bit
//! decomposition; [`MembershipProof`] composes the two into a
//! one-out-of-many proof over a list of ElGamal pairs.

/// Scalar-vector helpers shared by the proofs.
pub mod vectorutil;

/// Logarithmic-size range proof for 64-bit amounts.
pub mod rangeproof;

/// One-hot bit-matrix decomposition proof.
pub mod bitmatrix;

/// One-out-of-many membership proof.
pub mod membership;

// Re-export
pub use self::bitmatrix::BitMatrixProof;
pub use self::membership::MembershipProof;
pub use self::rangeproof::RangeProof;
