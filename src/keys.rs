//! Spend key material and linkable key images.
//!
//! A key pair carries two secrets: the spend secret that opens the ElGamal
//! public key, and the key-image secret whose public image is the linkable
//! double-spend tag.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, Rng};

use crate::elgamal::ElGamalPair;
use crate::ristretto::Generators;

/// The two secret scalars behind a spendable output.
#[derive(Debug, Copy, Clone)]
pub struct SpendKey {
    pub(crate) private_key: Scalar,
    pub(crate) key_image_private: Scalar,
}

impl SpendKey {
    /// Draws a fresh pair of secrets.
    pub fn random<R: Rng + CryptoRng>(rng: &mut R) -> SpendKey {
        SpendKey {
            private_key: Scalar::random(rng),
            key_image_private: Scalar::random(rng),
        }
    }

    /// ECDH shared secret with a counterparty public point.
    pub fn shared_secret(&self, out_pk: &RistrettoPoint) -> RistrettoPoint {
        out_pk * self.private_key
    }

    /// The spend secret.
    pub fn private_key(&self) -> Scalar {
        self.private_key
    }

    /// The key-image secret.
    pub fn key_image_private(&self) -> Scalar {
        self.key_image_private
    }
}

/// A spend key together with its public half.
///
/// `key_image = G·key_image_private` is a deterministic linkable tag: two
/// spends of the same underlying coin expose the same image. The public key
/// is the ElGamal encryption of the key image under the spend secret.
#[derive(Debug, Copy, Clone)]
pub struct KeyPair {
    spend_key: SpendKey,
    key_image: RistrettoPoint,
    public_key: ElGamalPair,
}

impl KeyPair {
    /// Generates a fresh random key pair.
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R, gens: &Generators) -> KeyPair {
        let spend_key = SpendKey::random(rng);
        let key_image = &spend_key.key_image_private * &RISTRETTO_BASEPOINT_TABLE;
        let public_key = ElGamalPair::encrypt(gens, &key_image, spend_key.private_key);
        KeyPair {
            spend_key,
            key_image,
            public_key,
        }
    }

    /// The secret half.
    pub fn spend_key(&self) -> &SpendKey {
        &self.spend_key
    }

    /// The linkable key image.
    pub fn key_image(&self) -> RistrettoPoint {
        self.key_image
    }

    /// The ElGamal public key.
    pub fn public_key(&self) -> ElGamalPair {
        self.public_key
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn key_image_deterministic_test() {
        let gens = Generators::default();
        let pair = KeyPair::generate(&mut OsRng, &gens);
        let rederived =
            &pair.spend_key().key_image_private * &RISTRETTO_BASEPOINT_TABLE;
        assert_eq!(pair.key_image(), rederived);
    }

    #[test]
    fn public_key_opens_test() {
        let gens = Generators::default();
        let pair = KeyPair::generate(&mut OsRng, &gens);
        let expected = ElGamalPair::encrypt(
            &gens,
            &pair.key_image(),
            pair.spend_key().private_key(),
        );
        assert_eq!(pair.public_key(), expected);
    }

    #[test]
    fn shared_secret_agreement_test() {
        let gens = Generators::default();
        let alice = KeyPair::generate(&mut OsRng, &gens);
        let bob = KeyPair::generate(&mut OsRng, &gens);
        // both sides land on out_pk scaled by the two private keys
        let a_view = alice.spend_key().shared_secret(&bob.public_key().p2());
        let b_view = bob.spend_key().shared_secret(&alice.public_key().p2());
        assert_eq!(a_view, b_view);
    }
}
