use std::marker::PhantomData;

use error_stack::{Report, ResultExt};
use faer::Mat;
use faer::Side;

use super::{LinResult, LinearSolverAlgo, LinearSolverError};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;

/// Dense Cholesky (`LLᵀ`), for operators tagged symmetric positive
/// (semi)definite. Mirrors `newtonls-faer`'s sparse `FaerLu`'s use of
/// `error_stack` for a factorization that can genuinely fail, as opposed to
/// `DenseLu`'s infallible full pivoting.
pub struct Cholesky<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Cholesky<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Scalar> Default for Cholesky<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Cholesky<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let matrix = operator.as_matrix();
        let llt = matrix
            .llt(Side::Lower)
            .map_err(|e| Report::new(LinearSolverError).attach_printable(format!("{e:?}")))
            .attach_printable("Cholesky factorization requires a symmetric positive (semi)definite operator")?;

        let rhs = Mat::from_fn(b.len(), 1, |i, _| b[i]);
        let solution = llt.solve(&rhs);
        Ok((0..operator.in_size()).map(|i| solution[(i, 0)]).collect())
    }
}
