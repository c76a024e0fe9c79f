//! Signatures over the assembled transaction.
//!
//! [`MultiSignature`] is the accountable multi-signer Schnorr aggregate
//! binding the spend to every input's key-image secret;
//! [`SpendSignature`] is the complete serializable wire artifact.

/// Accountable multi-signer Schnorr aggregate.
pub mod multisig;

/// The serializable spend signature.
pub mod spend;

// Re-export
pub use self::multisig::MultiSignature;
pub use self::spend::SpendSignature;
