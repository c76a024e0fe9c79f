//! Logarithmic-size range proof for committed 64-bit amounts.
//!
//! A proof that `V = Hp·value + G·gamma` commits to `value ∈ [0, 2^64)`
//! without revealing it, following the bulletproofs construction with the
//! inner-product argument compressing the opening to `log2(64)` rounds.
//!
//! Challenges are drawn from a chained hash cache seeded with `V` and
//! updated with every element the prover emits, in a fixed order. The
//! verifier rebuilds the identical chain from the proof's public fields, so
//! any transcript deviation desynchronizes the challenges and the proof
//! fails closed.

#![allow(non_snake_case)]

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, MultiscalarMul};
use rand::rngs::OsRng;
use serde_derive::{Deserialize, Serialize};

use crate::proofs::vectorutil::{
    hadamard, inner_product, vector_add, vector_powers, vector_scalar, vector_sub,
};
use crate::ristretto::hash::hash_to_scalar;
use crate::ristretto::Generators;
use crate::util::cursor::ByteCursor;

/// Bit length of the proven range.
pub const RANGE_BITS: usize = 64;
/// Folding rounds of the inner-product argument.
pub const FOLDING_ROUNDS: usize = 6;

/// A range proof for a single committed amount.
///
/// Self-contained: verification needs only these fields and the shared
/// generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeProof {
    pub(crate) V: RistrettoPoint,
    pub(crate) A: RistrettoPoint,
    pub(crate) S: RistrettoPoint,
    pub(crate) T1: RistrettoPoint,
    pub(crate) T2: RistrettoPoint,
    pub(crate) taux: Scalar,
    pub(crate) mu: Scalar,
    pub(crate) L: Vec<RistrettoPoint>,
    pub(crate) R: Vec<RistrettoPoint>,
    pub(crate) a: Scalar,
    pub(crate) b: Scalar,
    pub(crate) t: Scalar,
}

// Advance the Fiat-Shamir hash cache with newly produced bytes.
fn chain(cache: Scalar, bytes: &[u8]) -> Scalar {
    hash_to_scalar(&[cache.as_bytes().as_slice(), bytes].concat())
}

// The binary digits of the low 64 bits of a scalar, as scalars.
fn bit_decompose(value: &Scalar) -> Vec<Scalar> {
    let bytes = value.to_bytes();
    (0..RANGE_BITS)
        .map(|i| Scalar::from(u64::from((bytes[i / 8] >> (i % 8)) & 1)))
        .collect()
}

// <a,Gi> + <b,Hi> over the shared generator vectors.
fn vector_exponent(a: &[Scalar], b: &[Scalar], gens: &Generators) -> RistrettoPoint {
    assert!(a.len() == RANGE_BITS && b.len() == RANGE_BITS);
    let points: Vec<RistrettoPoint> = (0..RANGE_BITS)
        .flat_map(|i| vec![gens.point(2 * i), gens.point(2 * i + 1)])
        .collect();
    let scalars: Vec<Scalar> = a
        .iter()
        .zip(b.iter())
        .flat_map(|(x, y)| vec![*x, *y])
        .collect();
    RistrettoPoint::multiscalar_mul(scalars.iter(), points.iter())
}

// <a,A> + <b,B> for arbitrary point slices of matching length.
fn vector_exponent_custom(
    A: &[RistrettoPoint],
    B: &[RistrettoPoint],
    a: &[Scalar],
    b: &[Scalar],
) -> RistrettoPoint {
    assert!(a.len() == A.len() && b.len() == B.len() && a.len() == b.len());
    RistrettoPoint::multiscalar_mul(
        a.iter().chain(b.iter()),
        A.iter().chain(B.iter()),
    )
}

// k(y,z) from the verification identity.
fn compute_k(y: Scalar, z: Scalar) -> Scalar {
    let ones = vector_powers(Scalar::one(), RANGE_BITS);
    let mut k = Scalar::zero();
    k -= z * z * inner_product(&ones, &vector_powers(y, RANGE_BITS));
    k -= z * z * z * inner_product(&ones, &vector_powers(Scalar::from(2u64), RANGE_BITS));
    k
}

impl RangeProof {
    /// The commitment `V = Hp·value + G·gamma` the proof is bound to.
    pub fn commitment(&self) -> RistrettoPoint {
        self.V
    }

    /// Proves that `value` lies in `[0, 2^64)` under blinding `gamma`.
    ///
    /// The scalar must actually fit 64 bits; anything larger is a caller
    /// bug, not a provable statement.
    pub fn prove(value: Scalar, gamma: Scalar, gens: &Generators) -> RangeProof {
        assert!(
            value.to_bytes()[8..].iter().all(|byte| *byte == 0),
            "range proof value exceeds 64 bits"
        );
        let H = gens.point(1);
        let V = H * value + &gamma * &RISTRETTO_BASEPOINT_TABLE;

        // This hash cache is updated for Fiat-Shamir throughout the proof
        let mut cache = hash_to_scalar(V.compress().as_bytes());

        // PAPER LINES 36-37
        let aL = bit_decompose(&value);
        let aR: Vec<Scalar> = aL.iter().map(|bit| bit - Scalar::one()).collect();

        // PAPER LINES 38-39
        let alpha = Scalar::random(&mut OsRng);
        let A = vector_exponent(&aL, &aR, gens) + &alpha * &RISTRETTO_BASEPOINT_TABLE;

        // PAPER LINES 40-42
        let sL: Vec<Scalar> = (0..RANGE_BITS).map(|_| Scalar::random(&mut OsRng)).collect();
        let sR: Vec<Scalar> = (0..RANGE_BITS).map(|_| Scalar::random(&mut OsRng)).collect();
        let rho = Scalar::random(&mut OsRng);
        let S = vector_exponent(&sL, &sR, gens) + &rho * &RISTRETTO_BASEPOINT_TABLE;

        // PAPER LINES 43-45
        cache = chain(cache, A.compress().as_bytes());
        cache = chain(cache, S.compress().as_bytes());
        let y = cache;
        cache = hash_to_scalar(cache.as_bytes());
        let z = cache;

        // Polynomial construction before PAPER LINE 46
        let ones = vector_powers(Scalar::one(), RANGE_BITS);
        let twos = vector_powers(Scalar::from(2u64), RANGE_BITS);
        let y_powers = vector_powers(y, RANGE_BITS);

        let mut t1 = inner_product(
            &vector_sub(&aL, &vector_scalar(&ones, z)),
            &hadamard(&y_powers, &sR),
        );
        t1 += inner_product(
            &sL,
            &vector_add(
                &hadamard(&y_powers, &vector_add(&aR, &vector_scalar(&ones, z))),
                &vector_scalar(&twos, z * z),
            ),
        );
        let t2 = inner_product(&sL, &hadamard(&y_powers, &sR));

        // PAPER LINES 47-48
        let tau1 = Scalar::random(&mut OsRng);
        let tau2 = Scalar::random(&mut OsRng);
        let T1 = H * t1 + &tau1 * &RISTRETTO_BASEPOINT_TABLE;
        let T2 = H * t2 + &tau2 * &RISTRETTO_BASEPOINT_TABLE;

        // PAPER LINES 49-51
        cache = chain(cache, z.as_bytes());
        cache = chain(cache, T1.compress().as_bytes());
        cache = chain(cache, T2.compress().as_bytes());
        let x = cache;

        // PAPER LINES 52-53
        let taux = tau1 * x + tau2 * x * x + gamma * z * z;
        let mu = x * rho + alpha;

        // PAPER LINES 54-57
        let l = vector_add(
            &vector_sub(&aL, &vector_scalar(&ones, z)),
            &vector_scalar(&sL, x),
        );
        let r = vector_add(
            &hadamard(
                &y_powers,
                &vector_add(
                    &aR,
                    &vector_add(&vector_scalar(&ones, z), &vector_scalar(&sR, x)),
                ),
            ),
            &vector_scalar(&twos, z * z),
        );
        let t = inner_product(&l, &r);

        // PAPER LINES 32-33
        cache = chain(cache, x.as_bytes());
        cache = chain(cache, taux.as_bytes());
        cache = chain(cache, mu.as_bytes());
        cache = chain(cache, t.as_bytes());
        let x_ip = cache;

        // These are used in the inner product rounds
        let y_inv = y.invert();
        let mut G_prime: Vec<RistrettoPoint> =
            (0..RANGE_BITS).map(|i| gens.point(2 * i)).collect();
        let mut H_prime: Vec<RistrettoPoint> = vector_powers(y_inv, RANGE_BITS)
            .iter()
            .enumerate()
            .map(|(i, y_inv_pow)| gens.point(2 * i + 1) * y_inv_pow)
            .collect();
        let mut a_prime = l;
        let mut b_prime = r;

        let mut L = Vec::with_capacity(FOLDING_ROUNDS);
        let mut R = Vec::with_capacity(FOLDING_ROUNDS);
        let mut n_prime = RANGE_BITS;

        // PAPER LINE 13
        while n_prime > 1 {
            // PAPER LINE 15
            n_prime /= 2;

            // PAPER LINES 16-17
            let cL = inner_product(&a_prime[..n_prime], &b_prime[n_prime..]);
            let cR = inner_product(&a_prime[n_prime..], &b_prime[..n_prime]);

            // PAPER LINES 18-19
            let L_round = vector_exponent_custom(
                &G_prime[n_prime..],
                &H_prime[..n_prime],
                &a_prime[..n_prime],
                &b_prime[n_prime..],
            ) + H * (cL * x_ip);
            let R_round = vector_exponent_custom(
                &G_prime[..n_prime],
                &H_prime[n_prime..],
                &a_prime[n_prime..],
                &b_prime[..n_prime],
            ) + H * (cR * x_ip);

            // PAPER LINES 21-22
            cache = chain(cache, L_round.compress().as_bytes());
            cache = chain(cache, R_round.compress().as_bytes());
            let w = cache;
            let w_inv = w.invert();
            L.push(L_round);
            R.push(R_round);

            // PAPER LINES 24-25
            G_prime = (0..n_prime)
                .map(|i| G_prime[i] * w_inv + G_prime[i + n_prime] * w)
                .collect();
            H_prime = (0..n_prime)
                .map(|i| H_prime[i] * w + H_prime[i + n_prime] * w_inv)
                .collect();

            // PAPER LINES 28-29
            a_prime = (0..n_prime)
                .map(|i| a_prime[i] * w + a_prime[i + n_prime] * w_inv)
                .collect();
            b_prime = (0..n_prime)
                .map(|i| b_prime[i] * w_inv + b_prime[i + n_prime] * w)
                .collect();
        }

        // PAPER LINE 58 (with inclusions from PAPER LINE 8 and PAPER LINE 20)
        RangeProof {
            V,
            A,
            S,
            T1,
            T2,
            taux,
            mu,
            L,
            R,
            a: a_prime[0],
            b: b_prime[0],
            t,
        }
    }

    /// Checks the proof against its own commitment.
    ///
    /// Returns `false` on any algebraic mismatch; never panics for
    /// well-shaped input.
    pub fn verify(&self, gens: &Generators) -> bool {
        if self.L.len() != FOLDING_ROUNDS || self.R.len() != FOLDING_ROUNDS {
            return false;
        }
        let H = gens.point(1);

        // Reconstruct the challenges from public fields only
        let mut cache = hash_to_scalar(self.V.compress().as_bytes());
        cache = chain(cache, self.A.compress().as_bytes());
        cache = chain(cache, self.S.compress().as_bytes());
        let y = cache;
        cache = hash_to_scalar(cache.as_bytes());
        let z = cache;
        cache = chain(cache, z.as_bytes());
        cache = chain(cache, self.T1.compress().as_bytes());
        cache = chain(cache, self.T2.compress().as_bytes());
        let x = cache;
        cache = chain(cache, x.as_bytes());
        cache = chain(cache, self.taux.as_bytes());
        cache = chain(cache, self.mu.as_bytes());
        cache = chain(cache, self.t.as_bytes());
        let x_ip = cache;

        // PAPER LINE 61
        let ones = vector_powers(Scalar::one(), RANGE_BITS);
        let y_powers = vector_powers(y, RANGE_BITS);
        let left = &self.taux * &RISTRETTO_BASEPOINT_TABLE + H * self.t;
        let k = compute_k(y, z);
        let right = H * (k + z * inner_product(&ones, &y_powers))
            + self.V * (z * z)
            + self.T1 * x
            + self.T2 * (x * x);
        if left != right {
            return false;
        }

        // PAPER LINES 21-22: the round challenges
        let mut w = Vec::with_capacity(FOLDING_ROUNDS);
        for round in 0..FOLDING_ROUNDS {
            cache = chain(cache, self.L[round].compress().as_bytes());
            cache = chain(cache, self.R[round].compress().as_bytes());
            w.push(cache);
        }
        let w_inv: Vec<Scalar> = w.iter().map(|wi| wi.invert()).collect();

        // Basically PAPER LINES 24-25: fold the generator exponents
        let y_inv_powers = vector_powers(y.invert(), RANGE_BITS);
        let two_powers = vector_powers(Scalar::from(2u64), RANGE_BITS);
        let mut inner_prod_g = RistrettoPoint::identity();
        let mut inner_prod_h = RistrettoPoint::identity();
        for i in 0..RANGE_BITS {
            // Walk the index bits IN REVERSE to undo the folding order
            let mut index = i;
            let mut g_scalar = self.a;
            let mut h_scalar = self.b * y_inv_powers[i];
            for j in (0..FOLDING_ROUNDS).rev() {
                let round = FOLDING_ROUNDS - j - 1;
                let base_pow = 1usize << j;
                if index / base_pow == 0 {
                    g_scalar *= w_inv[round];
                    h_scalar *= w[round];
                } else {
                    g_scalar *= w[round];
                    h_scalar *= w_inv[round];
                    index -= base_pow;
                }
            }

            // Adjust the scalars using the exponents from PAPER LINE 62
            g_scalar += z;
            h_scalar -= (z * y_powers[i] + z * z * two_powers[i]) * y_inv_powers[i];

            inner_prod_g += gens.point(2 * i) * g_scalar;
            inner_prod_h += gens.point(2 * i + 1) * h_scalar;
        }

        // PAPER LINE 26
        let mut p_prime =
            self.A + self.S * x - &self.mu * &RISTRETTO_BASEPOINT_TABLE;
        for round in 0..FOLDING_ROUNDS {
            p_prime += self.L[round] * (w[round] * w[round]);
            p_prime += self.R[round] * (w_inv[round] * w_inv[round]);
        }
        p_prime += H * (self.t * x_ip);

        p_prime == inner_prod_g + inner_prod_h + H * (self.a * self.b * x_ip)
    }

    /// Serializes the proof: `V ‖ A ‖ S ‖ T1 ‖ T2 ‖ taux ‖ mu ‖ L ‖ R ‖ a ‖ b ‖ t`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((5 + 2 * FOLDING_ROUNDS) * 32 + 5 * 32);
        for point in [&self.V, &self.A, &self.S, &self.T1, &self.T2] {
            bytes.extend_from_slice(point.compress().as_bytes());
        }
        bytes.extend_from_slice(self.taux.as_bytes());
        bytes.extend_from_slice(self.mu.as_bytes());
        for point in self.L.iter().chain(self.R.iter()) {
            bytes.extend_from_slice(point.compress().as_bytes());
        }
        bytes.extend_from_slice(self.a.as_bytes());
        bytes.extend_from_slice(self.b.as_bytes());
        bytes.extend_from_slice(self.t.as_bytes());
        bytes
    }

    /// Rebuilds a proof from its fixed-shape serialization.
    pub fn from_bytes(bytes: &[u8]) -> Result<RangeProof, &'static str> {
        let mut cursor = ByteCursor::new(bytes);
        let V = cursor.read_point()?;
        let A = cursor.read_point()?;
        let S = cursor.read_point()?;
        let T1 = cursor.read_point()?;
        let T2 = cursor.read_point()?;
        let taux = cursor.read_scalar()?;
        let mu = cursor.read_scalar()?;
        let mut L = Vec::with_capacity(FOLDING_ROUNDS);
        for _ in 0..FOLDING_ROUNDS {
            L.push(cursor.read_point()?);
        }
        let mut R = Vec::with_capacity(FOLDING_ROUNDS);
        for _ in 0..FOLDING_ROUNDS {
            R.push(cursor.read_point()?);
        }
        let a = cursor.read_scalar()?;
        let b = cursor.read_scalar()?;
        let t = cursor.read_scalar()?;
        if !cursor.finished() {
            return Err("Error::TrailingBytes");
        }
        Ok(RangeProof {
            V,
            A,
            S,
            T1,
            T2,
            taux,
            mu,
            L,
            R,
            a,
            b,
            t,
        })
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prove_verify_test() {
        let gens = Generators::default();
        for value in [0u64, 1, 2, 1000, u64::MAX] {
            let gamma = Scalar::random(&mut OsRng);
            let proof = RangeProof::prove(Scalar::from(value), gamma, &gens);
            assert!(proof.verify(&gens), "value {} failed", value);
        }
    }

    #[test]
    fn tampered_field_rejected_test() {
        let gens = Generators::default();
        let proof = RangeProof::prove(
            Scalar::from(12345u64),
            Scalar::random(&mut OsRng),
            &gens,
        );

        let mut tampered = proof.clone();
        tampered.t += Scalar::one();
        assert!(!tampered.verify(&gens));

        let mut tampered = proof.clone();
        tampered.mu += Scalar::one();
        assert!(!tampered.verify(&gens));

        let mut tampered = proof.clone();
        tampered.A += Generators::base_point();
        assert!(!tampered.verify(&gens));

        let mut tampered = proof;
        tampered.L[3] += Generators::base_point();
        assert!(!tampered.verify(&gens));
    }

    #[test]
    fn byte_flip_rejected_test() {
        let gens = Generators::default();
        let proof = RangeProof::prove(
            Scalar::from(77u64),
            Scalar::random(&mut OsRng),
            &gens,
        );
        let bytes = proof.to_bytes();
        // flip one byte inside taux (offset past the five points)
        let mut flipped = bytes.clone();
        flipped[5 * 32 + 7] ^= 0x01;
        match RangeProof::from_bytes(&flipped) {
            Ok(parsed) => assert!(!parsed.verify(&gens)),
            Err(_) => {} // flipping may also break canonicity, which is a rejection too
        }
    }

    #[test]
    fn serialization_roundtrip_test() {
        let gens = Generators::default();
        let proof = RangeProof::prove(
            Scalar::from(987654321u64),
            Scalar::random(&mut OsRng),
            &gens,
        );
        let parsed = RangeProof::from_bytes(&proof.to_bytes()).unwrap();
        assert_eq!(parsed, proof);
        assert!(parsed.verify(&gens));
    }
}
