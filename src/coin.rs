//! Confidential coins.
//!
//! A coin binds an amount and blinding mask to an owning key pair through a
//! Pedersen commitment, with a range proof attached at output-creation
//! time. `EcdhInfo` carries the amount and mask to a recipient under a
//! Diffie-Hellman shared secret, so the recipient can rebuild the coin via
//! the decode path when spending it later.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;

use crate::keys::KeyPair;
use crate::proofs::rangeproof::RangeProof;
use crate::ristretto::hash::hash_to_scalar;
use crate::ristretto::Generators;

/// A spendable confidential output.
///
/// Immutable once created; consumed when used as a ring-signature input.
#[derive(Debug, Clone)]
pub struct Coin {
    pub(crate) amount: Scalar,
    pub(crate) mask: Scalar,
    amount_key: KeyPair,
    commitment: RistrettoPoint,
    range_proof: Option<RangeProof>,
}

impl Coin {
    // Private constructor
    fn set_coin(amount_key: KeyPair, amount: Scalar, mask: Scalar, gens: &Generators) -> Coin {
        Coin {
            amount,
            mask,
            amount_key,
            commitment: gens.commit(amount, mask),
            range_proof: None,
        }
    }

    /// Creates a fresh output for `amount` with a random key pair, a random
    /// mask and an attached range proof.
    pub fn new_output(amount: Scalar, gens: &Generators) -> Coin {
        let amount_key = KeyPair::generate(&mut OsRng, gens);
        let mask = Scalar::random(&mut OsRng);

        let mut coin = Coin::set_coin(amount_key, amount, mask, gens);
        coin.range_proof = Some(RangeProof::prove(amount, mask, gens));
        coin
    }

    /// Rebuilds a received coin from the encrypted amount info; the decode
    /// side of the ECDH exchange. Inputs carry no range proof.
    pub fn from_input(
        amount_key: KeyPair,
        encrypted_info: &EcdhInfo,
        out_pk: &RistrettoPoint,
        gens: &Generators,
    ) -> Coin {
        let shared_secret = amount_key.spend_key().shared_secret(out_pk);
        Coin::set_coin(
            amount_key,
            encrypted_info.amount(&shared_secret),
            encrypted_info.mask(&shared_secret),
            gens,
        )
    }

    /// The committed amount.
    pub fn amount(&self) -> Scalar {
        self.amount
    }

    /// The blinding mask.
    pub fn mask(&self) -> Scalar {
        self.mask
    }

    /// The owning key pair.
    pub fn amount_key(&self) -> &KeyPair {
        &self.amount_key
    }

    /// The Pedersen commitment `G·amount + Hp·mask`.
    pub fn commitment(&self) -> RistrettoPoint {
        self.commitment
    }

    /// The attached range proof, present on outputs only.
    pub fn range_proof(&self) -> Option<&RangeProof> {
        self.range_proof.as_ref()
    }

    /// Encrypts this coin's amount and mask for the holder of `out_pk`.
    pub fn encrypted_info(&self, out_pk: &RistrettoPoint) -> EcdhInfo {
        EcdhInfo::encrypt(
            self.amount,
            self.mask,
            &self.amount_key.spend_key().shared_secret(out_pk),
        )
    }
}

/// Elliptic curve Diffie-Hellman encrypted amount and mask.
#[derive(Debug, Copy, Clone)]
pub struct EcdhInfo {
    amount_encrypted: Scalar,
    mask_encrypted: Scalar,
}

impl EcdhInfo {
    /// Pads amount and mask with a hash of the shared secret.
    pub fn encrypt(amount: Scalar, mask: Scalar, shared_secret: &RistrettoPoint) -> EcdhInfo {
        let pad = hash_to_scalar(shared_secret.compress().as_bytes());
        EcdhInfo {
            amount_encrypted: amount + pad,
            mask_encrypted: mask + pad,
        }
    }

    /// Recovers the amount.
    pub fn amount(&self, shared_secret: &RistrettoPoint) -> Scalar {
        self.amount_encrypted - hash_to_scalar(shared_secret.compress().as_bytes())
    }

    /// Recovers the mask.
    pub fn mask(&self, shared_secret: &RistrettoPoint) -> Scalar {
        self.mask_encrypted - hash_to_scalar(shared_secret.compress().as_bytes())
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
