//! Flat numerical vectors standing in for the "value tree" of the original.
//!
//! The Python source passes arbitrary pytrees of arrays through every
//! solver; Rust has no dynamic analogue, so `nlsolve` collapses a value
//! tree to a flat `Vec<T>` (see DESIGN.md, Open Question 1). `flatten`
//! and `unflatten` are therefore identities kept around as named seams:
//! a caller gluing a structured model on top of this crate flattens once
//! at the boundary and unflattens the solution back into its own shape.

use crate::scalar::Scalar;

/// A solved-for or intermediate point. Plain alias kept for readability at
/// call sites (`y0: Y<T>`, `root_find(..., y0: Y<f64>, ...)`).
pub type Y<T> = Vec<T>;

pub fn flatten<T: Scalar>(y: &Y<T>) -> Vec<T> {
    y.clone()
}

pub fn unflatten<T: Scalar>(flat: Vec<T>) -> Y<T> {
    flat
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormKind {
    /// Root-mean-square norm: `sqrt(mean(x_i^2))`.
    Rms,
    /// Maximum absolute component.
    MaxAbs,
}

pub fn norm<T: Scalar>(v: &[T], kind: NormKind) -> T {
    match kind {
        NormKind::Rms => rms_norm(v),
        NormKind::MaxAbs => max_norm(v),
    }
}

pub fn rms_norm<T: Scalar>(v: &[T]) -> T {
    if v.is_empty() {
        return T::zero();
    }
    let sum_sq = v.iter().fold(T::zero(), |acc, &x| acc + x * x);
    (sum_sq / T::from(v.len()).unwrap()).sqrt()
}

pub fn max_norm<T: Scalar>(v: &[T]) -> T {
    v.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
}

pub fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

pub fn add<T: Scalar>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().zip(b).map(|(&x, &y)| x + y).collect()
}

pub fn sub<T: Scalar>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().zip(b).map(|(&x, &y)| x - y).collect()
}

pub fn scale<T: Scalar>(a: &[T], s: T) -> Vec<T> {
    a.iter().map(|&x| x * s).collect()
}

/// `a + s * b`, the workhorse of every descent step.
pub fn axpy<T: Scalar>(a: &[T], s: T, b: &[T]) -> Vec<T> {
    a.iter().zip(b).map(|(&x, &y)| x + s * y).collect()
}

/// Relative-difference predicate used throughout termination checks:
/// `|new - old| <= atol + rtol * |new|`, reduced with `norm`.
pub fn small_relative_diff<T: Scalar>(old: &[T], new: &[T], rtol: T, atol: T, kind: NormKind) -> bool {
    let diff = sub(new, old);
    let scale: Vec<T> = new
        .iter()
        .map(|&n| atol + rtol * n.abs())
        .collect();
    let ratio: Vec<T> = diff
        .iter()
        .zip(&scale)
        .map(|(&d, &s)| if s > T::zero() { d.abs() / s } else { T::zero() })
        .collect();
    norm(&ratio, kind) <= T::one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_norm_matches_hand_computation() {
        let v = vec![3.0_f64, 4.0];
        assert!((rms_norm(&v) - (25.0_f64 / 2.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn max_norm_picks_largest_magnitude() {
        let v = vec![-5.0_f64, 2.0, 4.0];
        assert_eq!(max_norm(&v), 5.0);
    }

    #[test]
    fn axpy_matches_hand_computation() {
        let a = vec![1.0_f64, 2.0];
        let b = vec![1.0_f64, 1.0];
        assert_eq!(axpy(&a, 2.0, &b), vec![3.0, 4.0]);
    }

    #[test]
    fn flatten_unflatten_is_identity() {
        let y: Y<f64> = vec![1.0, 2.0, 3.0];
        assert_eq!(unflatten(flatten(&y)), y);
    }
}
