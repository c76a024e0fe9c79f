//! Ring confidential transaction aggregation and spend orchestration.
//!
//! [`RingCt`] folds key images, ring public keys, ring commitments and the
//! masked balance point into one transcript and derives the final
//! commitment list the membership proof runs over. [`SpendParams`]
//! assembles a concrete spend (real inputs, outputs, decoy ring members)
//! and drives signing into a [`crate::signatures::SpendSignature`].

/// The RingCT transcript aggregator.
pub mod ringct;

/// Spend assembly and signing.
pub mod spend_params;

// Re-export
pub use self::ringct::{RingCt, SubResult};
pub use self::spend_params::SpendParams;
