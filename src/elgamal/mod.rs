//! ElGamal point-pair ciphertexts for the RingCT protocol.
//!
//! Provides the additively homomorphic dual-base encryption that ring
//! commitments and public keys are folded into.

/// ElGamal pair implementation and API.
pub mod elgamal;

/// Re-export of the [`ElGamalPair`] type for convenience.
pub use self::elgamal::ElGamalPair;
