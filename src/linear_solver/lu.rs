use std::marker::PhantomData;

use faer::Mat;

use super::{LinResult, LinearSolverAlgo};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;

/// Dense LU with full pivoting, the square well-posed default when an
/// operator isn't tagged symmetric/diagonal/tridiagonal. Lifted straight
/// from `newtonls-faer/src/linalg.rs`'s `DenseLu`: full pivoting never
/// hard-fails, it just produces a solution the caller's NaN check can
/// still catch on a singular input.
pub struct Lu<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Lu<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Scalar> Default for Lu<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Lu<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let matrix = operator.as_matrix();
        let lu = matrix.full_piv_lu();
        let rhs = Mat::from_fn(b.len(), 1, |i, _| b[i]);
        let solution = lu.solve(&rhs);
        Ok((0..operator.in_size()).map(|i| solution[(i, 0)]).collect())
    }
}
