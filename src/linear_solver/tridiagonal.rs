use std::marker::PhantomData;

use error_stack::Report;

use super::{LinResult, LinearSolverAlgo, LinearSolverError};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;

/// O(n) Thomas algorithm for operators tagged tridiagonal
/// (`original_source/solver/tridiagonal.py`).
pub struct Tridiagonal<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Tridiagonal<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Scalar> Default for Tridiagonal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Tridiagonal<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let (lower, diag, upper) = match operator.tridiagonal_bands() {
            Some(bands) => bands,
            None => {
                return Err(Report::new(LinearSolverError)
                    .attach_printable("operator does not expose tridiagonal storage"))
            }
        };
        let n = diag.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        // Forward sweep: eliminate the sub-diagonal.
        let mut c_prime = vec![T::zero(); n];
        let mut d_prime = vec![T::zero(); n];
        let mut denom = diag[0];
        if denom == T::zero() {
            return Err(Report::new(LinearSolverError)
                .attach_printable("tridiagonal pivot is zero at row 0"));
        }
        c_prime[0] = upper[0] / denom;
        d_prime[0] = b[0] / denom;
        for i in 1..n {
            denom = diag[i] - lower[i] * c_prime[i - 1];
            if denom == T::zero() {
                return Err(Report::new(LinearSolverError)
                    .attach_printable(format!("tridiagonal pivot is zero at row {i}")));
            }
            c_prime[i] = upper[i] / denom;
            d_prime[i] = (b[i] - lower[i] * d_prime[i - 1]) / denom;
        }

        // Back substitution.
        let mut x = vec![T::zero(); n];
        x[n - 1] = d_prime[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = d_prime[i] - c_prime[i] * x[i + 1];
        }
        Ok(x)
    }
}
