use core::ops::{Add, Mul, Sub};

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use serde_derive::{Deserialize, Serialize};

use crate::ristretto::Generators;

/// An ordered pair of group elements forming a dual-base ElGamal ciphertext.
///
/// `encrypt(M, x)` produces `(Hp·x + M, G·x)` where `Hp` is auxiliary
/// generator 1. Pointwise addition, subtraction and scalar multiplication
/// make the pair behave like an additively homomorphic commitment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPair {
    pub(crate) p1: RistrettoPoint,
    pub(crate) p2: RistrettoPoint,
}

impl ElGamalPair {
    // Private constructor
    fn set_pair(p1: RistrettoPoint, p2: RistrettoPoint) -> ElGamalPair {
        ElGamalPair { p1, p2 }
    }

    /// Builds a pair from its two components.
    pub fn new(p1: RistrettoPoint, p2: RistrettoPoint) -> ElGamalPair {
        ElGamalPair::set_pair(p1, p2)
    }

    /// Encrypts a message point under a secret scalar:
    /// `(Hp·secret + message, G·secret)`.
    pub fn encrypt(gens: &Generators, message: &RistrettoPoint, secret: Scalar) -> ElGamalPair {
        let p1 = gens.point(1) * secret + message;
        let p2 = &secret * &RISTRETTO_BASEPOINT_TABLE;
        ElGamalPair::set_pair(p1, p2)
    }

    /// The identity pair, neutral for pointwise addition.
    pub fn identity() -> ElGamalPair {
        ElGamalPair::set_pair(RistrettoPoint::identity(), RistrettoPoint::identity())
    }

    /// First component.
    pub fn p1(&self) -> RistrettoPoint {
        self.p1
    }

    /// Second component.
    pub fn p2(&self) -> RistrettoPoint {
        self.p2
    }

    /// Canonical 64-byte encoding `P1 ‖ P2`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(self.p1.compress().as_bytes());
        bytes.extend_from_slice(self.p2.compress().as_bytes());
        bytes
    }
}

// ------- ElGamalPair Add, Sub, Mul ------- //

impl Add<ElGamalPair> for ElGamalPair {
    type Output = ElGamalPair;

    fn add(self, other: ElGamalPair) -> ElGamalPair {
        ElGamalPair::set_pair(self.p1 + other.p1, self.p2 + other.p2)
    }
}

impl Sub<ElGamalPair> for ElGamalPair {
    type Output = ElGamalPair;

    fn sub(self, other: ElGamalPair) -> ElGamalPair {
        ElGamalPair::set_pair(self.p1 - other.p1, self.p2 - other.p2)
    }
}

impl<'a, 'b> Mul<&'b Scalar> for &'a ElGamalPair {
    type Output = ElGamalPair;
    /// Scalar multiplication: both components scaled by the same scalar.
    fn mul(self, scalar: &'b Scalar) -> ElGamalPair {
        ElGamalPair::set_pair(self.p1 * scalar, self.p2 * scalar)
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
    fn encrypt_homomorphic_test() {
        let gens = Generators::default();
        let m1 = RistrettoPoint::random(&mut OsRng);
        let m2 = RistrettoPoint::random(&mut OsRng);
        let x1 = Scalar::random(&mut OsRng);
        let x2 = Scalar::random(&mut OsRng);

        let sum = ElGamalPair::encrypt(&gens, &m1, x1) + ElGamalPair::encrypt(&gens, &m2, x2);
        assert_eq!(sum, ElGamalPair::encrypt(&gens, &(m1 + m2), x1 + x2));
    }

    #[test]
    fn scalar_multiply_test() {
        let gens = Generators::default();
        let x = Scalar::random(&mut OsRng);
        let n = Scalar::from(7u64);
        let pair = ElGamalPair::encrypt(&gens, &RistrettoPoint::identity(), x);
        assert_eq!(&pair * &n, ElGamalPair::encrypt(&gens, &RistrettoPoint::identity(), x * n));
    }

    #[test]
    fn identity_neutral_test() {
        let gens = Generators::default();
        let pair = ElGamalPair::encrypt(&gens, &RistrettoPoint::identity(), Scalar::from(3u64));
        assert_eq!(pair + ElGamalPair::identity(), pair);
        assert_eq!(pair - pair, ElGamalPair::identity());
    }
}
