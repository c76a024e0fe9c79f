//! The RingCT transcript aggregator.
//!
//! Construction is pure and deterministic: both signer and verifier build
//! it from the same public inputs and must arrive at the same message and
//! the same derived [`SubResult`]. Nothing in the sub-result is secret.

use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;

use crate::elgamal::ElGamalPair;
use crate::proofs::membership::MembershipProof;
use crate::proofs::rangeproof::RangeProof;
use crate::ristretto::hash::{fast_hash, hash_to_scalar};
use crate::ristretto::Generators;
use crate::signatures::spend::SpendSignature;

/// Values derived from the transcript: one aggregation scalar per input and
/// the final commitment list the membership proof runs over.
///
/// Recomputed from the transcript on both sides, never persisted.
#[derive(Debug, Clone)]
pub struct SubResult {
    /// Per-input aggregation scalars.
    pub final_inputs: Vec<Scalar>,
    /// Per-ring-slot folded commitments.
    pub final_commitments: Vec<ElGamalPair>,
}

/// The assembled ring confidential transaction.
#[derive(Debug)]
pub struct RingCt {
    key_images: Vec<RistrettoPoint>,
    public_keys: Vec<Vec<ElGamalPair>>,
    commitments: Vec<RistrettoPoint>,
    masked_index_point: RistrettoPoint,
    message: Vec<u8>,
    sub_result: SubResult,
}

// The serialized transcript fields, message appended when already known.
fn serialize_fields(
    key_images: &[RistrettoPoint],
    public_keys: &[Vec<ElGamalPair>],
    commitments: &[RistrettoPoint],
    masked_index_point: &RistrettoPoint,
    message: Option<&[u8]>,
) -> Vec<u8> {
    let mut bytes = Vec::new();
    for key_image in key_images {
        bytes.extend_from_slice(key_image.compress().as_bytes());
    }
    for row in public_keys {
        for public_key in row {
            bytes.extend_from_slice(&public_key.to_bytes());
        }
    }
    for commitment in commitments {
        bytes.extend_from_slice(commitment.compress().as_bytes());
    }
    bytes.extend_from_slice(masked_index_point.compress().as_bytes());
    if let Some(message) = message {
        bytes.extend_from_slice(message);
    }
    bytes
}

impl RingCt {
    /// Builds the transcript and eagerly derives the sub-result.
    ///
    /// `public_keys` is the `inputs × ring_size` matrix; dimension
    /// mismatches are programming errors.
    pub fn new(
        key_images: Vec<RistrettoPoint>,
        public_keys: Vec<Vec<ElGamalPair>>,
        commitments: Vec<RistrettoPoint>,
        masked_index_point: RistrettoPoint,
        range_proofs: &[RangeProof],
    ) -> RingCt {
        assert_eq!(key_images.len(), public_keys.len());
        assert!(public_keys.iter().all(|row| row.len() == commitments.len()));

        // message = fields ‖ digest of all range proofs
        let mut range_proof_bytes = Vec::new();
        for proof in range_proofs {
            range_proof_bytes.extend_from_slice(&proof.to_bytes());
        }
        let mut message = serialize_fields(
            &key_images,
            &public_keys,
            &commitments,
            &masked_index_point,
            None,
        );
        message.extend_from_slice(&fast_hash(&range_proof_bytes));

        let sub_result = Self::compute_sub(
            &key_images,
            &public_keys,
            &commitments,
            &masked_index_point,
            &message,
        );

        RingCt {
            key_images,
            public_keys,
            commitments,
            masked_index_point,
            message,
            sub_result,
        }
    }

    /// The full serialized transcript, message included.
    pub fn to_bytes(&self) -> Vec<u8> {
        serialize_fields(
            &self.key_images,
            &self.public_keys,
            &self.commitments,
            &self.masked_index_point,
            Some(&self.message),
        )
    }

    /// The derived sub-result.
    pub fn sub_result(&self) -> &SubResult {
        &self.sub_result
    }

    /// The key images of all inputs.
    pub fn key_images(&self) -> &[RistrettoPoint] {
        &self.key_images
    }

    /// Runs the membership proof for the secret ring slot under the
    /// aggregate secret.
    pub fn sign(
        &self,
        ring_index: usize,
        aggregate_secret: Scalar,
        base: usize,
        exponent: usize,
        gens: &Generators,
    ) -> Result<MembershipProof, &'static str> {
        MembershipProof::prove(
            &self.sub_result.final_commitments,
            ring_index,
            aggregate_secret,
            base,
            exponent,
            gens,
        )
    }

    /// Verifies a spend signature against this transcript.
    ///
    /// The multi-signature over `(signature bytes ‖ transcript bytes)` is
    /// checked against the key images first; only then does the membership
    /// proof run. Both must pass.
    pub fn verify(&self, spend_signature: &SpendSignature, gens: &Generators) -> bool {
        let signed = [
            spend_signature.signature.to_bytes(),
            self.to_bytes(),
        ]
        .concat();
        if !spend_signature.multi_sig.verify(&signed, &self.key_images) {
            return false;
        }
        spend_signature.signature.is_valid(
            spend_signature.decomposition_base,
            &self.sub_result.final_commitments,
            gens,
        )
    }

    fn compute_sub(
        key_images: &[RistrettoPoint],
        public_keys: &[Vec<ElGamalPair>],
        commitments: &[RistrettoPoint],
        masked_index_point: &RistrettoPoint,
        message: &[u8],
    ) -> SubResult {
        let inputs = public_keys.len();
        let ring_size = commitments.len();

        let ct_bytes = serialize_fields(
            key_images,
            public_keys,
            commitments,
            masked_index_point,
            Some(message),
        );

        let mut final_inputs = Vec::with_capacity(inputs);
        let mut input_public_keys = Vec::with_capacity(inputs);
        for (input, key_image) in key_images.iter().enumerate() {
            input_public_keys.push(ElGamalPair::new(*key_image, RistrettoPoint::identity()));
            let mut bytes = key_image.compress().as_bytes().to_vec();
            bytes.extend_from_slice(&ct_bytes);
            bytes.extend_from_slice(&(input as u32).to_le_bytes());
            final_inputs.push(hash_to_scalar(&bytes));
        }

        let mut final_commitments = Vec::with_capacity(ring_size);
        for ring in 0..ring_size {
            let mut folded = ElGamalPair::new(commitments[ring], *masked_index_point);
            for input in 0..inputs {
                folded = folded
                    + &(public_keys[input][ring] - input_public_keys[input])
                        * &final_inputs[input];
            }
            final_commitments.push(folded);
        }

        SubResult {
            final_inputs,
            final_commitments,
        }
    }
}
