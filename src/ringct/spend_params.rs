//! Spend assembly and signing.
//!
//! Builds the anonymity ring around the real inputs: the real public keys
//! and the balancing commitment sit at a secret, uniformly random ring
//! index; every other slot is filled with fresh decoy key pairs and random
//! commitments, indistinguishable from the real ones.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use rand::rngs::OsRng;
use rand::Rng;

use crate::coin::Coin;
use crate::elgamal::ElGamalPair;
use crate::keys::KeyPair;
use crate::proofs::rangeproof::RangeProof;
use crate::ringct::ringct::RingCt;
use crate::ristretto::Generators;
use crate::signatures::multisig::MultiSignature;
use crate::signatures::spend::SpendSignature;

/// A fully assembled spend, ready to sign.
#[derive(Debug)]
pub struct SpendParams {
    inputs: Vec<Coin>,
    outputs: Vec<Coin>,
    decomposition_base: usize,
    decomposition_exponent: usize,
    ring_index: usize,
    commitments: Vec<RistrettoPoint>,
    public_keys: Vec<Vec<ElGamalPair>>,
    masked_index: Scalar,
    masked_index_point: RistrettoPoint,
    ring_ct: RingCt,
}

impl SpendParams {
    /// Assembles a spend of `inputs` into `outputs` inside a ring of
    /// `base^exponent` members.
    ///
    /// Fails if an output is missing its range proof; the outputs of
    /// [`Coin::new_output`] always carry one.
    pub fn new(
        inputs: Vec<Coin>,
        outputs: Vec<Coin>,
        decomposition_base: usize,
        decomposition_exponent: usize,
        gens: &Generators,
    ) -> Result<SpendParams, &'static str> {
        assert!(decomposition_base >= 2 && decomposition_exponent >= 1);
        assert!(!inputs.is_empty() && !outputs.is_empty());

        let mut range_proofs = Vec::with_capacity(outputs.len());
        for output in &outputs {
            range_proofs.push(
                output
                    .range_proof()
                    .cloned()
                    .ok_or("Error::MissingRangeProof")?,
            );
        }

        let ring_size = decomposition_base.pow(decomposition_exponent as u32);
        let ring_index = OsRng.gen_range(0, ring_size);

        let public_keys = Self::gather_public_keys(&inputs, ring_size, ring_index, gens);
        let commitments = Self::gather_commitments(&inputs, &outputs, ring_size, ring_index);

        let masked_index = Self::gather_masked_index(&inputs, &outputs);
        let masked_index_point = &masked_index * &RISTRETTO_BASEPOINT_TABLE;

        let key_images: Vec<RistrettoPoint> = inputs
            .iter()
            .map(|input| input.amount_key().key_image())
            .collect();
        let ring_ct = RingCt::new(
            key_images,
            public_keys.clone(),
            commitments.clone(),
            masked_index_point,
            &range_proofs,
        );

        Ok(SpendParams {
            inputs,
            outputs,
            decomposition_base,
            decomposition_exponent,
            ring_index,
            commitments,
            public_keys,
            masked_index,
            masked_index_point,
            ring_ct,
        })
    }

    /// The assembled confidential transaction.
    pub fn ring_ct(&self) -> &RingCt {
        &self.ring_ct
    }

    /// Key images of every input.
    pub fn key_images(&self) -> Vec<RistrettoPoint> {
        self.inputs
            .iter()
            .map(|input| input.amount_key().key_image())
            .collect()
    }

    /// The `inputs × ring_size` public-key matrix.
    pub fn public_keys(&self) -> &[Vec<ElGamalPair>] {
        &self.public_keys
    }

    /// The per-ring-slot commitments.
    pub fn commitments(&self) -> &[RistrettoPoint] {
        &self.commitments
    }

    /// The net blinding difference `Σ input.mask − Σ output.mask`.
    pub fn masked_index(&self) -> Scalar {
        self.masked_index
    }

    /// The range proofs of all outputs.
    pub fn range_proofs(&self) -> Vec<RangeProof> {
        self.outputs
            .iter()
            .filter_map(|output| output.range_proof().cloned())
            .collect()
    }

    /// Whether the commitments balance: the real ring slot must open as
    /// `Hp·masked_index` once inputs and outputs are summed.
    pub fn check_balance(&self, gens: &Generators) -> bool {
        let mut sum = RistrettoPoint::identity();
        for input in &self.inputs {
            sum += input.commitment();
        }
        for output in &self.outputs {
            sum -= output.commitment();
        }
        sum == gens.point(1) * self.masked_index
    }

    /// Signs the spend, producing the full serializable signature.
    ///
    /// The balance invariant is checked first: an imbalanced transaction
    /// fails fast here rather than producing a signature that cannot
    /// verify.
    pub fn sign(
        &self,
        ring_ct: &RingCt,
        gens: &Generators,
    ) -> Result<SpendSignature, &'static str> {
        if !self.check_balance(gens) {
            return Err("Error::ImbalancedTransaction");
        }

        let signature = ring_ct.sign(
            self.ring_index,
            self.sign_inputs(ring_ct),
            self.decomposition_base,
            self.decomposition_exponent,
            gens,
        )?;

        let signed = [signature.to_bytes(), ring_ct.to_bytes()].concat();
        let key_image_privates: Vec<Scalar> = self
            .inputs
            .iter()
            .map(|input| input.amount_key().spend_key().key_image_private())
            .collect();
        let multi_sig = MultiSignature::sign(&signed, &key_image_privates);

        Ok(SpendSignature {
            decomposition_base: self.decomposition_base,
            decomposition_exponent: self.decomposition_exponent,
            masked_index_point: self.masked_index_point,
            signature,
            multi_sig,
        })
    }

    // The aggregate secret opening the real ring slot's folded commitment.
    fn sign_inputs(&self, ring_ct: &RingCt) -> Scalar {
        let mut aggregate = self.masked_index;
        for (input, coin) in self.inputs.iter().enumerate() {
            aggregate += coin.amount_key().spend_key().private_key()
                * ring_ct.sub_result().final_inputs[input];
        }
        aggregate
    }

    // Real public keys at the secret slot, fresh decoys everywhere else.
    fn gather_public_keys(
        inputs: &[Coin],
        ring_size: usize,
        ring_index: usize,
        gens: &Generators,
    ) -> Vec<Vec<ElGamalPair>> {
        inputs
            .iter()
            .map(|input| {
                (0..ring_size)
                    .map(|ring| {
                        if ring == ring_index {
                            input.amount_key().public_key()
                        } else {
                            KeyPair::generate(&mut OsRng, gens).public_key()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    // The balancing commitment at the secret slot, random points elsewhere.
    fn gather_commitments(
        inputs: &[Coin],
        outputs: &[Coin],
        ring_size: usize,
        ring_index: usize,
    ) -> Vec<RistrettoPoint> {
        (0..ring_size)
            .map(|ring| {
                if ring == ring_index {
                    let mut sum = RistrettoPoint::identity();
                    for input in inputs {
                        sum += input.commitment();
                    }
                    for output in outputs {
                        sum -= output.commitment();
                    }
                    sum
                } else {
                    RistrettoPoint::random(&mut OsRng)
                }
            })
            .collect()
    }

    // Net blinding difference across the spend.
    fn gather_masked_index(inputs: &[Coin], outputs: &[Coin]) -> Scalar {
        let mut masked_index = Scalar::zero();
        for input in inputs {
            masked_index += input.mask();
        }
        for output in outputs {
            masked_index -= output.mask();
        }
        masked_index
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::signatures::spend::SpendSignature;

    fn test_spend_params(
        inputs: usize,
        base: usize,
        exponent: usize,
        gens: &Generators,
    ) -> SpendParams {
        let real_inputs: Vec<Coin> = (0..inputs)
            .map(|_| Coin::new_output(Scalar::from(OsRng.gen_range(1000u64, 2000u64)), gens))
            .collect();

        // one output for the recipient, one sweeping up the change
        let first_amount = real_inputs[0].amount() - Scalar::from(2u64);
        let mut total = Scalar::zero();
        for input in &real_inputs {
            total += input.amount();
        }
        let outputs = vec![
            Coin::new_output(first_amount, gens),
            Coin::new_output(total - first_amount, gens),
        ];

        SpendParams::new(real_inputs, outputs, base, exponent, gens).unwrap()
    }

    #[test]
    fn balanced_spend_verifies_test() {
        let gens = Generators::default();
        let input = Coin::new_output(Scalar::from(1000u64), &gens);
        let outputs = vec![
            Coin::new_output(Scalar::from(700u64), &gens),
            Coin::new_output(Scalar::from(300u64), &gens),
        ];

        let params = SpendParams::new(vec![input], outputs, 2, 4, &gens).unwrap();
        assert!(params.check_balance(&gens));

        let signature = params.sign(params.ring_ct(), &gens).unwrap();
        assert!(params.ring_ct().verify(&signature, &gens));
    }

    #[test]
    fn imbalanced_spend_fails_fast_test() {
        let gens = Generators::default();
        let input = Coin::new_output(Scalar::from(1000u64), &gens);
        // 701 + 300 != 1000: commitments cannot balance
        let outputs = vec![
            Coin::new_output(Scalar::from(701u64), &gens),
            Coin::new_output(Scalar::from(300u64), &gens),
        ];

        let params = SpendParams::new(vec![input], outputs, 2, 4, &gens).unwrap();
        assert!(!params.check_balance(&gens));
        assert_eq!(
            params.sign(params.ring_ct(), &gens),
            Err("Error::ImbalancedTransaction")
        );
    }

    #[test]
    fn multi_input_spend_test() {
        let gens = Generators::default();
        let params = test_spend_params(3, 2, 4, &gens);
        let signature = params.sign(params.ring_ct(), &gens).unwrap();

        // a verifier rebuilds the transcript from public data only
        let ring_ct = RingCt::new(
            params.key_images(),
            params.public_keys().to_vec(),
            params.commitments().to_vec(),
            signature.masked_index_point,
            &params.range_proofs(),
        );
        assert!(ring_ct.verify(&signature, &gens));
    }

    #[test]
    fn serialize_deserialize_verify_test() {
        let gens = Generators::default();
        let params = test_spend_params(2, 3, 2, &gens);
        let signature = params.sign(params.ring_ct(), &gens).unwrap();

        let parsed = SpendSignature::from_bytes(&signature.to_bytes()).unwrap();
        assert_eq!(parsed, signature);
        assert!(params.ring_ct().verify(&parsed, &gens));
    }

    #[test]
    fn tampered_signature_rejected_test() {
        let gens = Generators::default();
        let params = test_spend_params(1, 2, 4, &gens);
        let mut signature = params.sign(params.ring_ct(), &gens).unwrap();
        signature.signature.z += Scalar::one();
        assert!(!params.ring_ct().verify(&signature, &gens));
    }

    #[test]
    fn send_receive_and_respend_test() {
        let gens = Generators::default();
        let input = Coin::new_output(Scalar::from(10u64), &gens);
        let output1 = Coin::new_output(Scalar::from(7u64), &gens);
        let output2 = Coin::new_output(Scalar::from(3u64), &gens);

        // the receiver's key pair and the sender's output key
        let receiver = KeyPair::generate(&mut OsRng, &gens);
        let out_pk = output2.amount_key().public_key().p2();
        let ecdh_info = output2.encrypted_info(&receiver.public_key().p2());

        let params =
            SpendParams::new(vec![input], vec![output1, output2], 2, 3, &gens).unwrap();
        let signature = params.sign(params.ring_ct(), &gens).unwrap();
        assert!(params.ring_ct().verify(&signature, &gens));

        // the second output becomes the input of a fresh spend
        let obtained = Coin::from_input(receiver, &ecdh_info, &out_pk, &gens);
        assert_eq!(obtained.amount(), Scalar::from(3u64));
        let final_output = Coin::new_output(Scalar::from(3u64), &gens);

        let params =
            SpendParams::new(vec![obtained], vec![final_output], 2, 3, &gens).unwrap();
        let signature = params.sign(params.ring_ct(), &gens).unwrap();
        assert!(params.ring_ct().verify(&signature, &gens));
    }
}
