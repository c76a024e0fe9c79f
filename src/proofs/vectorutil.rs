//! Utility functions to manipulate scalar vectors.
//!
//! Inner products, Hadamard products and power vectors shared by the range
//! proof and the membership proof.

use curve25519_dalek::scalar::Scalar;

/// Provides an iterator over the powers of a `Scalar`.
///
/// This struct is created by the `exp_iter` function.
pub struct ScalarExp {
    x: Scalar,
    next_exp_x: Scalar,
}

impl Iterator for ScalarExp {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        let exp_x = self.next_exp_x;
        self.next_exp_x *= self.x;
        Some(exp_x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::max_value(), None)
    }
}

/// Return an iterator of the powers of `x`.
pub fn exp_iter(x: Scalar) -> ScalarExp {
    let next_exp_x = Scalar::one();
    ScalarExp { x, next_exp_x }
}

/// The first `n` powers of `x`, starting from `x^0`.
pub fn vector_powers(x: Scalar, n: usize) -> Vec<Scalar> {
    exp_iter(x).take(n).collect()
}

/// Inner product of two scalar vectors.
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> Scalar {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Componentwise product of two scalar vectors.
pub fn hadamard(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).collect()
}

/// Componentwise sum of two scalar vectors.
pub fn vector_add(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
}

/// Componentwise difference of two scalar vectors.
pub fn vector_sub(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()
}

/// Every element of `a` scaled by `scalar`.
pub fn vector_scalar(a: &[Scalar], scalar: Scalar) -> Vec<Scalar> {
    a.iter().map(|x| x * scalar).collect()
}

/// Sum of a scalar vector.
pub fn sum_scalars(a: &[Scalar]) -> Scalar {
    a.iter().sum()
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exp_iter_test() {
        let x = Scalar::from(3u64);
        let exp_2: Vec<_> = exp_iter(x).take(5).collect();
        let reference: Vec<Scalar> = vec![
            Scalar::from(1u64),
            Scalar::from(3u64),
            Scalar::from(9u64),
            Scalar::from(27u64),
            Scalar::from(81u64),
        ];
        assert_eq!(reference, exp_2);
    }

    #[test]
    fn inner_product_test() {
        let a = vec![Scalar::from(1u64), Scalar::from(2u64), Scalar::from(3u64)];
        let b = vec![Scalar::from(4u64), Scalar::from(5u64), Scalar::from(6u64)];
        assert_eq!(inner_product(&a, &b), Scalar::from(32u64));
    }

    #[test]
    fn hadamard_test() {
        let a = vec![Scalar::from(2u64), Scalar::from(3u64)];
        let b = vec![Scalar::from(5u64), Scalar::from(7u64)];
        assert_eq!(
            hadamard(&a, &b),
            vec![Scalar::from(10u64), Scalar::from(21u64)]
        );
    }

    #[test]
    fn vector_arithmetic_test() {
        let a = vec![Scalar::from(5u64), Scalar::from(9u64)];
        let b = vec![Scalar::from(1u64), Scalar::from(4u64)];
        assert_eq!(
            vector_add(&a, &b),
            vec![Scalar::from(6u64), Scalar::from(13u64)]
        );
        assert_eq!(
            vector_sub(&a, &b),
            vec![Scalar::from(4u64), Scalar::from(5u64)]
        );
        assert_eq!(
            vector_scalar(&a, Scalar::from(2u64)),
            vec![Scalar::from(10u64), Scalar::from(18u64)]
        );
        assert_eq!(sum_scalars(&a), Scalar::from(14u64));
    }
}
