//! Proof that a committed matrix is a one-hot bit decomposition.
//!
//! The prover holds an `m × n` matrix of 0/1 scalars with exactly one `1`
//! per row, committed as `B = commit_matrix(b, r)`. The proof reveals the
//! blinded responses `f[j][i] = b[j][i]·x + a[j][i]` for columns `1..n`
//! only; column 0 is reconstructible from the row-sum invariant, which is
//! why just `n-1` columns per row go on the wire.

#![allow(non_snake_case)]

use array2d::Array2D;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use serde_derive::{Deserialize, Serialize};

use crate::ristretto::hash::hash_to_scalar;
use crate::ristretto::Generators;

/// A one-hot decomposition proof over a committed matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitMatrixProof {
    pub(crate) A: RistrettoPoint,
    pub(crate) C: RistrettoPoint,
    pub(crate) D: RistrettoPoint,
    pub(crate) f_trimmed: Vec<Vec<Scalar>>,
    pub(crate) z_a: Scalar,
    pub(crate) z_c: Scalar,
}

impl BitMatrixProof {
    /// Proves that `b` is a 0/1 matrix with one-hot rows, committed under
    /// blinding `r`.
    ///
    /// Also returns the auxiliary matrix `a`; the membership proof needs it
    /// to build its polynomial coefficients. It is not part of the proof.
    pub fn prove(
        b: &Array2D<Scalar>,
        r: Scalar,
        gens: &Generators,
    ) -> (BitMatrixProof, Array2D<Scalar>) {
        let m = b.num_rows();
        let n = b.num_columns();
        assert!(m > 0 && n > 1);

        let r_a = Scalar::random(&mut OsRng);
        let r_c = Scalar::random(&mut OsRng);
        let r_d = Scalar::random(&mut OsRng);

        // Random auxiliary rows summing to zero: column 0 absorbs the rest
        let mut a_elements = vec![Scalar::zero(); m * n];
        for j in 0..m {
            let mut row_sum = Scalar::zero();
            for i in 1..n {
                let value = Scalar::random(&mut OsRng);
                a_elements[j * n + i] = value;
                row_sum -= value;
            }
            a_elements[j * n] = row_sum;
        }
        let a = Array2D::from_row_major(&a_elements, m, n);

        let A = gens.commit_matrix(&a, r_a);

        let mut c_elements = vec![Scalar::zero(); m * n];
        let mut d_elements = vec![Scalar::zero(); m * n];
        for j in 0..m {
            for i in 0..n {
                let a_ji = a[(j, i)];
                c_elements[j * n + i] =
                    a_ji * (Scalar::one() - Scalar::from(2u64) * b[(j, i)]);
                d_elements[j * n + i] = -(a_ji * a_ji);
            }
        }
        let c = Array2D::from_row_major(&c_elements, m, n);
        let d = Array2D::from_row_major(&d_elements, m, n);

        let C = gens.commit_matrix(&c, r_c);
        let D = gens.commit_matrix(&d, r_d);

        let x = challenge_for(&A, &C, &D);

        let mut f_trimmed = Vec::with_capacity(m);
        for j in 0..m {
            let mut row = Vec::with_capacity(n - 1);
            for i in 1..n {
                row.push(b[(j, i)] * x + a[(j, i)]);
            }
            f_trimmed.push(row);
        }

        let z_a = r * x + r_a;
        let z_c = r_c * x + r_d;

        (
            BitMatrixProof {
                A,
                C,
                D,
                f_trimmed,
                z_a,
                z_c,
            },
            a,
        )
    }

    /// The Fiat-Shamir challenge bound to this proof's commitments.
    pub(crate) fn challenge(&self) -> Scalar {
        challenge_for(&self.A, &self.C, &self.D)
    }

    /// Reconstructs the full response matrix, including the implicit
    /// column 0 recovered from the row-sum invariant.
    pub(crate) fn responses(&self, x: Scalar) -> Option<Array2D<Scalar>> {
        let m = self.f_trimmed.len();
        if m == 0 {
            return None;
        }
        let n = self.f_trimmed[0].len() + 1;
        if self.f_trimmed.iter().any(|row| row.len() + 1 != n) {
            return None;
        }
        let mut f = vec![Scalar::zero(); m * n];
        for j in 0..m {
            let mut column_zero = x;
            for i in 1..n {
                let value = self.f_trimmed[j][i - 1];
                f[j * n + i] = value;
                column_zero -= value;
            }
            f[j * n] = column_zero;
        }
        Some(Array2D::from_row_major(&f, m, n))
    }

    /// Checks the proof against the matrix commitment `B`.
    pub fn is_valid(&self, B: &RistrettoPoint, gens: &Generators) -> bool {
        let x = self.challenge();
        let f = match self.responses(x) {
            Some(f) => f,
            None => return false,
        };
        let m = f.num_rows();
        let n = f.num_columns();

        let mut f1 = vec![Scalar::zero(); m * n];
        for j in 0..m {
            for i in 0..n {
                f1[j * n + i] = f[(j, i)] * (x - f[(j, i)]);
            }
        }
        let f1 = Array2D::from_row_major(&f1, m, n);

        // xB + A == COMb(f; zA)
        if B * x + self.A != gens.commit_matrix(&f, self.z_a) {
            return false;
        }
        // xC + D == COMb(f∘(x−f); zC)
        if self.C * x + self.D != gens.commit_matrix(&f1, self.z_c) {
            return false;
        }
        true
    }

    /// Serializes the proof: `A ‖ C ‖ D ‖ f_trimmed ‖ zA ‖ zC`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for point in [&self.A, &self.C, &self.D] {
            bytes.extend_from_slice(point.compress().as_bytes());
        }
        for row in &self.f_trimmed {
            for value in row {
                bytes.extend_from_slice(value.as_bytes());
            }
        }
        bytes.extend_from_slice(self.z_a.as_bytes());
        bytes.extend_from_slice(self.z_c.as_bytes());
        bytes
    }
}

fn challenge_for(A: &RistrettoPoint, C: &RistrettoPoint, D: &RistrettoPoint) -> Scalar {
    let mut bytes = Vec::with_capacity(96);
    bytes.extend_from_slice(A.compress().as_bytes());
    bytes.extend_from_slice(C.compress().as_bytes());
    bytes.extend_from_slice(D.compress().as_bytes());
    hash_to_scalar(&bytes)
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn one_hot_matrix(m: usize, n: usize, digits: &[usize]) -> Array2D<Scalar> {
        let mut elements = vec![Scalar::zero(); m * n];
        for (j, digit) in digits.iter().enumerate() {
            elements[j * n + digit] = Scalar::one();
        }
        Array2D::from_row_major(&elements, m, n)
    }

    #[test]
    fn prove_verify_test() {
        let gens = Generators::default();
        let b = one_hot_matrix(4, 2, &[0, 1, 1, 0]);
        let r = Scalar::random(&mut OsRng);
        let B = gens.commit_matrix(&b, r);
        let (proof, _) = BitMatrixProof::prove(&b, r, &gens);
        assert!(proof.is_valid(&B, &gens));
    }

    #[test]
    fn wider_base_test() {
        let gens = Generators::default();
        let b = one_hot_matrix(3, 4, &[2, 0, 3]);
        let r = Scalar::random(&mut OsRng);
        let B = gens.commit_matrix(&b, r);
        let (proof, _) = BitMatrixProof::prove(&b, r, &gens);
        assert!(proof.is_valid(&B, &gens));
    }

    #[test]
    fn wrong_commitment_rejected_test() {
        let gens = Generators::default();
        let b = one_hot_matrix(4, 2, &[1, 0, 0, 1]);
        let r = Scalar::random(&mut OsRng);
        let (proof, _) = BitMatrixProof::prove(&b, r, &gens);
        // commitment under a different blinding does not open
        let B = gens.commit_matrix(&b, Scalar::random(&mut OsRng));
        assert!(!proof.is_valid(&B, &gens));
    }

    #[test]
    fn tampered_response_rejected_test() {
        let gens = Generators::default();
        let b = one_hot_matrix(4, 2, &[1, 1, 0, 0]);
        let r = Scalar::random(&mut OsRng);
        let B = gens.commit_matrix(&b, r);
        let (mut proof, _) = BitMatrixProof::prove(&b, r, &gens);
        proof.f_trimmed[2][0] += Scalar::one();
        assert!(!proof.is_valid(&B, &gens));
    }
}
