//! Accountable-subgroup Schnorr aggregate signature.
//!
//! All signers' public keys are lexicographically sorted by their raw
//! encoding and hashed into a binding value, so the signature commits to
//! the full ordered key set and key-substitution attacks are excluded. The
//! sort order is a plain byte comparison and must stay bit-exact across
//! implementations.

#![allow(non_snake_case)]

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use itertools::Itertools;
use rand::rngs::OsRng;
use serde_derive::{Deserialize, Serialize};

use crate::ristretto::hash::hash_to_scalar;

/// An aggregate Schnorr signature `(R, s)` over a set of signers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSignature {
    pub(crate) R: RistrettoPoint,
    pub(crate) s: Scalar,
}

// Hash of the key set, sorted by raw encoding.
fn key_set_binding(X: &[RistrettoPoint]) -> Scalar {
    let bytes: Vec<u8> = X
        .iter()
        .map(|x| x.compress().to_bytes())
        .sorted()
        .flatten()
        .collect();
    hash_to_scalar(&bytes)
}

// Per-key challenge c_i = H(X_i, R, X*, M).
fn per_key_challenge(
    X_i: &RistrettoPoint,
    R: &RistrettoPoint,
    binding: &Scalar,
    message: &[u8],
) -> Scalar {
    let mut bytes = Vec::with_capacity(96 + message.len());
    bytes.extend_from_slice(X_i.compress().as_bytes());
    bytes.extend_from_slice(R.compress().as_bytes());
    bytes.extend_from_slice(binding.as_bytes());
    bytes.extend_from_slice(message);
    hash_to_scalar(&bytes)
}

impl MultiSignature {
    /// Signs `message` with every secret in `x`.
    ///
    /// The public keys are derived as `X_i = G·x_i`; each signer's share is
    /// `r_i + x_i·c_i` and the shares aggregate into a single `(R, s)`.
    pub fn sign(message: &[u8], x: &[Scalar]) -> MultiSignature {
        assert!(!x.is_empty());
        let X: Vec<RistrettoPoint> = x
            .iter()
            .map(|x_i| x_i * &RISTRETTO_BASEPOINT_TABLE)
            .collect();
        let binding = key_set_binding(&X);

        let r: Vec<Scalar> = (0..x.len()).map(|_| Scalar::random(&mut OsRng)).collect();
        let r_sum: Scalar = r.iter().sum();
        let R = &r_sum * &RISTRETTO_BASEPOINT_TABLE;

        let mut s = Scalar::zero();
        for i in 0..x.len() {
            let c_i = per_key_challenge(&X[i], &R, &binding, message);
            s += r[i] + x[i] * c_i;
        }
        MultiSignature { R, s }
    }

    /// Verifies the aggregate against the full public-key set:
    /// `G·s == R + Σ X_i·c_i`.
    pub fn verify(&self, message: &[u8], X: &[RistrettoPoint]) -> bool {
        if X.is_empty() {
            return false;
        }
        let binding = key_set_binding(X);
        let sG = &self.s * &RISTRETTO_BASEPOINT_TABLE;
        let mut expected = self.R;
        for X_i in X {
            let c_i = per_key_challenge(X_i, &self.R, &binding, message);
            expected += X_i * c_i;
        }
        sG == expected
    }

    /// Serializes the signature: `R ‖ s`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(self.R.compress().as_bytes());
        bytes.extend_from_slice(self.s.as_bytes());
        bytes
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sign_verify_test() {
        for n in [1usize, 2, 5] {
            let secrets: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut OsRng)).collect();
            let keys: Vec<RistrettoPoint> = secrets
                .iter()
                .map(|x| x * &RISTRETTO_BASEPOINT_TABLE)
                .collect();
            let signature = MultiSignature::sign(b"spend authorization", &secrets);
            assert!(signature.verify(b"spend authorization", &keys), "{} signers", n);
        }
    }

    #[test]
    fn tampered_message_rejected_test() {
        let secrets: Vec<Scalar> = (0..3).map(|_| Scalar::random(&mut OsRng)).collect();
        let keys: Vec<RistrettoPoint> = secrets
            .iter()
            .map(|x| x * &RISTRETTO_BASEPOINT_TABLE)
            .collect();
        let message = b"transfer 1000".to_vec();
        let signature = MultiSignature::sign(&message, &secrets);

        for i in 0..message.len() {
            let mut tampered = message.clone();
            tampered[i] ^= 0x20;
            assert!(!signature.verify(&tampered, &keys));
        }
    }

    #[test]
    fn wrong_key_set_rejected_test() {
        let secrets: Vec<Scalar> = (0..2).map(|_| Scalar::random(&mut OsRng)).collect();
        let mut keys: Vec<RistrettoPoint> = secrets
            .iter()
            .map(|x| x * &RISTRETTO_BASEPOINT_TABLE)
            .collect();
        let signature = MultiSignature::sign(b"message", &secrets);
        keys[1] = RistrettoPoint::random(&mut OsRng);
        assert!(!signature.verify(b"message", &keys));
    }
}
