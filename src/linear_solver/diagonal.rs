use std::marker::PhantomData;

use error_stack::Report;

use super::{LinResult, LinearSolverAlgo, LinearSolverError};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;

/// O(n) solve for operators tagged diagonal, reading native storage via
/// [`LinearOperator::diagonal`] instead of densifying.
pub struct Diagonal<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Diagonal<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Scalar> Default for Diagonal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Diagonal<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let diag = match operator.diagonal() {
            Some(d) => d,
            None => {
                let m = operator.as_matrix();
                (0..m.nrows()).map(|i| m[(i, i)]).collect()
            }
        };
        if diag.iter().any(|&d| d == T::zero()) {
            return Err(Report::new(LinearSolverError)
                .attach_printable("diagonal operator has a zero entry, system is singular"));
        }
        Ok(diag.iter().zip(b).map(|(&d, &x)| x / d).collect())
    }
}
