#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/ringct-rust/latest")]
#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Ristretto group adapter: hashing to scalars and points, the memoized
/// auxiliary-generator cache and the Pedersen commitment primitives.
///
/// Everything the proof modules need from the curve lives behind this module,
/// so the rest of the crate never touches generator derivation directly.
pub mod ristretto;

/// ElGamal point-pair ciphertexts.
///
/// A dual-base encryption of a scalar relative to an auxiliary generator and
/// the base generator. The pair is additively homomorphic, which is what lets
/// ring commitments and public keys be folded together inside the proofs.
pub mod elgamal;

/// Spend and key-image key material.
pub mod keys;

/// Confidential coins: amount commitments, range proofs and the ECDH
/// amount encryption used to hand a coin to a recipient.
pub mod coin;

/// The zero-knowledge proof stack.
///
/// Range proofs over committed amounts, the one-hot bit-matrix decomposition
/// proof, and the one-out-of-many membership proof built on top of it.
pub mod proofs;

/// Multi-signer Schnorr signatures and the serializable spend signature.
pub mod signatures;

/// Ring confidential transaction aggregation and spend orchestration.
pub mod ringct;

/// Byte-level serialization helpers (varints, decode cursor).
pub mod util;

// Re-export commonly used types for convenience
pub use coin::Coin;
pub use elgamal::ElGamalPair;
pub use keys::{KeyPair, SpendKey};
pub use proofs::{BitMatrixProof, MembershipProof, RangeProof};
pub use ringct::{RingCt, SpendParams};
pub use ristretto::Generators;
pub use signatures::{MultiSignature, SpendSignature};
