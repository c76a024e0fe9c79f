//! One-out-of-many membership proof.
//!
//! Proves that one element of a public list of ElGamal pairs is an
//! encryption of the identity under a known opening, without revealing
//! which. The secret index is decomposed in base `n` over `m` digits, the
//! one-hot digit matrix is proven well-formed by a [`BitMatrixProof`], and
//! a polynomial-coefficient aggregation ties the committed digits to the
//! list, with the masked aggregates `G[k]` absorbing every lower-degree
//! term of the challenge polynomial.

#![allow(non_snake_case)]

use array2d::Array2D;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use rand::rngs::OsRng;
use serde_derive::{Deserialize, Serialize};

use crate::elgamal::ElGamalPair;
use crate::proofs::bitmatrix::BitMatrixProof;
use crate::proofs::vectorutil::vector_powers;
use crate::ristretto::Generators;

/// A one-out-of-many proof over `base^exponent` public ElGamal pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipProof {
    pub(crate) bit_proof: BitMatrixProof,
    pub(crate) B: RistrettoPoint,
    pub(crate) G: Vec<ElGamalPair>,
    pub(crate) z: Scalar,
}

/// Kronecker delta as a scalar.
fn delta(j: usize, i: usize) -> Scalar {
    if j == i {
        Scalar::one()
    } else {
        Scalar::zero()
    }
}

/// Digits of `n` in the given base, least significant first.
pub(crate) fn n_ary_decompose(base: usize, mut n: usize, exponent: usize) -> Vec<usize> {
    let mut digits = vec![0usize; exponent];
    for i in (0..exponent).rev() {
        let base_pow = base.pow(i as u32);
        digits[i] = n / base_pow;
        n -= base_pow * digits[i];
    }
    digits
}

// Discrete convolution of two coefficient vectors, missing entries read as
// zero.
fn coefficient_product(c: &[Scalar], d: &[Scalar]) -> Vec<Scalar> {
    let max_len = c.len().max(d.len());
    let mut result = vec![Scalar::zero(); 2 * max_len - 1];
    for i in 0..max_len {
        for j in 0..max_len {
            let left = c.get(i).copied().unwrap_or_else(Scalar::zero);
            let right = d.get(j).copied().unwrap_or_else(Scalar::zero);
            result[i + j] += left * right;
        }
    }
    result
}

// Drop coefficients beyond degree m-1, checking the dropped tail is exactly
// what the construction guarantees: zero everywhere, except the x^m term
// which is the delta product and must be 0 or 1. A violation means the
// coefficient construction was corrupted.
fn trim_coefficients(coefs: Vec<Scalar>, m: usize) -> Result<Vec<Scalar>, &'static str> {
    for (i, value) in coefs.iter().enumerate().skip(m) {
        if i == m {
            if *value != Scalar::zero() && *value != Scalar::one() {
                return Err("Error::CoefficientTrim");
            }
        } else if *value != Scalar::zero() {
            return Err("Error::CoefficientTrim");
        }
    }
    let mut kept = coefs;
    kept.truncate(m);
    Ok(kept)
}

// For every list index k, the coefficients (in the challenge) of
// prod_j (delta(i*_j, k_j)·x + a[j][k_j]), truncated to degree m-1.
fn coefficients(
    a: &Array2D<Scalar>,
    secret_index: usize,
    base: usize,
    exponent: usize,
) -> Result<Vec<Vec<Scalar>>, &'static str> {
    let ring_size = base.pow(exponent as u32);
    let secret_digits = n_ary_decompose(base, secret_index, exponent);

    let mut coef_list = Vec::with_capacity(ring_size);
    for k in 0..ring_size {
        let k_digits = n_ary_decompose(base, k, exponent);
        let mut coefs = vec![
            a[(0, k_digits[0])],
            delta(secret_digits[0], k_digits[0]),
        ];
        for j in 1..exponent {
            coefs = coefficient_product(
                &coefs,
                &[a[(j, k_digits[j])], delta(secret_digits[j], k_digits[j])],
            );
        }
        coef_list.push(trim_coefficients(coefs, exponent)?);
    }
    Ok(coef_list)
}

impl MembershipProof {
    /// Proves that `co[secret_index]` encrypts the identity under opening
    /// `r`, for a list of `base^exponent` pairs.
    ///
    /// Array dimensions are preconditions: a list of the wrong length or an
    /// out-of-range index is a programming error and panics.
    pub fn prove(
        co: &[ElGamalPair],
        secret_index: usize,
        r: Scalar,
        base: usize,
        exponent: usize,
        gens: &Generators,
    ) -> Result<MembershipProof, &'static str> {
        assert!(base >= 2 && exponent >= 1);
        let ring_size = base.pow(exponent as u32);
        assert_eq!(co.len(), ring_size);
        assert!(secret_index < ring_size);

        let u: Vec<Scalar> = (0..exponent).map(|_| Scalar::random(&mut OsRng)).collect();
        let r_b = Scalar::random(&mut OsRng);

        let secret_digits = n_ary_decompose(base, secret_index, exponent);
        let mut d_elements = vec![Scalar::zero(); exponent * base];
        for j in 0..exponent {
            for i in 0..base {
                d_elements[j * base + i] = delta(secret_digits[j], i);
            }
        }
        let d = Array2D::from_row_major(&d_elements, exponent, base);

        let B = gens.commit_matrix(&d, r_b);
        let (bit_proof, a) = BitMatrixProof::prove(&d, r_b, gens);

        let coefs = coefficients(&a, secret_index, base, exponent)?;

        let mut G = Vec::with_capacity(exponent);
        for k in 0..exponent {
            let mut g_k = ElGamalPair::encrypt(gens, &RistrettoPoint::identity(), u[k]);
            for i in 0..ring_size {
                g_k = g_k + &co[i] * &coefs[i][k];
            }
            G.push(g_k);
        }

        // z telescopes r and the masks under powers of the challenge
        let x1 = bit_proof.challenge();
        let x1_powers = vector_powers(x1, exponent + 1);
        let mut z = r * x1_powers[exponent];
        for k in 0..exponent {
            z -= u[k] * x1_powers[k];
        }

        Ok(MembershipProof {
            bit_proof,
            B,
            G,
            z,
        })
    }

    /// Checks the proof against the public list.
    ///
    /// Returns `false` for any shape or algebraic mismatch.
    pub fn is_valid(&self, base: usize, co: &[ElGamalPair], gens: &Generators) -> bool {
        if base < 2 {
            return false;
        }
        let exponent = self.bit_proof.f_trimmed.len();
        if exponent == 0 || self.G.len() != exponent {
            return false;
        }
        if self.bit_proof.f_trimmed.iter().any(|row| row.len() + 1 != base) {
            return false;
        }
        let ring_size = match base.checked_pow(exponent as u32) {
            Some(n) => n,
            None => return false,
        };
        if co.len() != ring_size {
            return false;
        }

        if !self.bit_proof.is_valid(&self.B, gens) {
            return false;
        }

        let x1 = self.bit_proof.challenge();
        let f = match self.bit_proof.responses(x1) {
            Some(f) => f,
            None => return false,
        };

        // c' = sum_i co[i]·(prod_j f[j][i_j]) - sum_k G[k]·x1^k
        let mut c1 = ElGamalPair::identity();
        for i in 0..ring_size {
            let digits = n_ary_decompose(base, i, exponent);
            let mut g_i = f[(0, digits[0])];
            for j in 1..exponent {
                g_i *= f[(j, digits[j])];
            }
            c1 = c1 + &co[i] * &g_i;
        }
        let x1_powers = vector_powers(x1, exponent);
        for k in 0..exponent {
            c1 = c1 - &self.G[k] * &x1_powers[k];
        }

        let c = ElGamalPair::encrypt(gens, &RistrettoPoint::identity(), self.z);
        c1 == c
    }

    /// Serializes the proof:
    /// `BitMatrixProof ‖ B ‖ G[0..exponent) ‖ z`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.bit_proof.to_bytes();
        bytes.extend_from_slice(self.B.compress().as_bytes());
        for pair in &self.G {
            bytes.extend_from_slice(&pair.to_bytes());
        }
        bytes.extend_from_slice(self.z.as_bytes());
        bytes
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn test_list(
        ring_size: usize,
        secret_index: usize,
        r: Scalar,
        gens: &Generators,
    ) -> Vec<ElGamalPair> {
        (0..ring_size)
            .map(|i| {
                if i == secret_index {
                    ElGamalPair::encrypt(gens, &RistrettoPoint::identity(), r)
                } else {
                    ElGamalPair::encrypt(
                        gens,
                        &RistrettoPoint::random(&mut OsRng),
                        Scalar::random(&mut OsRng),
                    )
                }
            })
            .collect()
    }

    #[test]
    fn n_ary_decompose_test() {
        assert_eq!(n_ary_decompose(2, 6, 4), vec![0, 1, 1, 0]);
        assert_eq!(n_ary_decompose(3, 7, 2), vec![1, 2]);
        assert_eq!(n_ary_decompose(4, 15, 2), vec![3, 3]);
    }

    #[test]
    fn completeness_test() {
        let gens = Generators::default();
        for (base, exponent) in [(2usize, 4usize), (3, 2), (4, 2)] {
            let ring_size = base.pow(exponent as u32);
            for secret_index in [0, ring_size / 2, ring_size - 1] {
                let r = Scalar::random(&mut OsRng);
                let co = test_list(ring_size, secret_index, r, &gens);
                let proof =
                    MembershipProof::prove(&co, secret_index, r, base, exponent, &gens)
                        .unwrap();
                assert!(
                    proof.is_valid(base, &co, &gens),
                    "base {} exponent {} index {}",
                    base,
                    exponent,
                    secret_index
                );
            }
        }
    }

    #[test]
    fn wrong_opening_rejected_test() {
        let gens = Generators::default();
        let r = Scalar::random(&mut OsRng);
        let co = test_list(16, 5, r, &gens);
        // proving with an opening that matches no list element
        let proof =
            MembershipProof::prove(&co, 5, Scalar::random(&mut OsRng), 2, 4, &gens).unwrap();
        assert!(!proof.is_valid(2, &co, &gens));
    }

    #[test]
    fn transcript_size_independent_of_index_test() {
        let gens = Generators::default();
        let r = Scalar::random(&mut OsRng);
        let co_a = test_list(27, 0, r, &gens);
        let co_b = test_list(27, 26, r, &gens);
        let proof_a = MembershipProof::prove(&co_a, 0, r, 3, 3, &gens).unwrap();
        let proof_b = MembershipProof::prove(&co_b, 26, r, 3, 3, &gens).unwrap();
        assert_eq!(proof_a.to_bytes().len(), proof_b.to_bytes().len());
    }

    #[test]
    fn wrong_list_length_rejected_test() {
        let gens = Generators::default();
        let r = Scalar::random(&mut OsRng);
        let co = test_list(16, 3, r, &gens);
        let proof = MembershipProof::prove(&co, 3, r, 2, 4, &gens).unwrap();
        assert!(!proof.is_valid(2, &co[..8], &gens));
        assert!(!proof.is_valid(4, &co, &gens));
    }
}
