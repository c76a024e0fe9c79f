//! Deterministic auxiliary generators and the commitment primitives built
//! on them.
//!
//! Generator `n` is derived by hashing the encoding of `G·n` onto the group,
//! so every cache instance produces bit-identical generators. The cache is
//! append-only behind a lock and is safe to share across threads.

use core::iter;
use std::sync::Mutex;

use array2d::Array2D;
use curve25519_dalek::constants::{RISTRETTO_BASEPOINT_POINT, RISTRETTO_BASEPOINT_TABLE};
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::MultiscalarMul;

use crate::ristretto::hash::hash_to_point;

/// Memoized cache of auxiliary generators.
///
/// Entry `n` is a pure function of `n`, so recomputing an entry twice yields
/// the same point and concurrent inserts are idempotent. Proof routines take
/// a `&Generators` explicitly instead of reaching for process-wide state.
pub struct Generators {
    cache: Mutex<Vec<RistrettoPoint>>,
}

impl Generators {
    /// Create a cache with the first `capacity` generators precomputed.
    pub fn new(capacity: usize) -> Self {
        let gens = Generators {
            cache: Mutex::new(Vec::new()),
        };
        if capacity > 0 {
            gens.point(capacity - 1);
        }
        gens
    }

    /// The distinguished base generator of the group.
    pub fn base_point() -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT
    }

    /// Returns auxiliary generator `n`, deriving and memoizing any missing
    /// entries up to it.
    pub fn point(&self, n: usize) -> RistrettoPoint {
        let mut cache = self.cache.lock().expect("generator cache poisoned");
        while cache.len() <= n {
            let index = cache.len();
            cache.push(Self::derive(index));
        }
        cache[n]
    }

    // Hash the encoding of G*n onto the curve. Deterministic in n alone.
    fn derive(n: usize) -> RistrettoPoint {
        let marker = &Scalar::from(n as u64) * &RISTRETTO_BASEPOINT_TABLE;
        hash_to_point(marker.compress().as_bytes())
    }

    /// Pedersen commitment to an amount under a blinding mask:
    /// `G·amount + point(1)·mask`.
    pub fn commit(&self, amount: Scalar, mask: Scalar) -> RistrettoPoint {
        &amount * &RISTRETTO_BASEPOINT_TABLE + self.point(1) * mask
    }

    /// Multi-generator commitment to a scalar matrix under blinding `r`:
    /// `G·r + Σ point(j·n+i+1)·x[j][i]`, rows first.
    pub fn commit_matrix(&self, x: &Array2D<Scalar>, r: Scalar) -> RistrettoPoint {
        let columns = x.num_columns();
        let mut points = Vec::with_capacity(x.num_elements());
        for j in 0..x.num_rows() {
            for i in 0..columns {
                points.push(self.point(j * columns + i + 1));
            }
        }
        RistrettoPoint::multiscalar_mul(
            iter::once(&r).chain(x.elements_row_major_iter()),
            iter::once(&RISTRETTO_BASEPOINT_POINT).chain(points.iter()),
        )
    }
}

impl Default for Generators {
    fn default() -> Self {
        Generators::new(0)
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn generators_deterministic_test() {
        let a = Generators::default();
        let b = Generators::new(16);
        for n in 0..16 {
            assert_eq!(a.point(n).compress(), b.point(n).compress());
        }
    }

    #[test]
    fn generators_concurrent_test() {
        let gens = Arc::new(Generators::default());
        let reference = Generators::default().point(40).compress();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gens = Arc::clone(&gens);
                thread::spawn(move || gens.point(40).compress())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), reference);
        }
    }

    #[test]
    fn commit_matrix_test() {
        let gens = Generators::default();
        let r = Scalar::random(&mut OsRng);
        let x = Array2D::from_row_major(
            &[
                Scalar::from(1u64),
                Scalar::from(2u64),
                Scalar::from(3u64),
                Scalar::from(4u64),
            ],
            2,
            2,
        );
        // the matrix commitment opens the same way as a by-hand sum
        let mut expected = &r * &RISTRETTO_BASEPOINT_TABLE;
        for j in 0..2 {
            for i in 0..2 {
                expected += gens.point(j * 2 + i + 1) * x[(j, i)];
            }
        }
        assert_eq!(gens.commit_matrix(&x, r), expected);
    }

    #[test]
    fn commit_opens_test() {
        let gens = Generators::default();
        let mask = Scalar::random(&mut OsRng);
        let commitment = gens.commit(Scalar::from(42u64), mask);
        let expected =
            &Scalar::from(42u64) * &RISTRETTO_BASEPOINT_TABLE + gens.point(1) * mask;
        assert_eq!(commitment, expected);
    }
}
