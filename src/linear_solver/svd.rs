use std::marker::PhantomData;

use error_stack::{Report, ResultExt};
use faer::Mat;

use super::{LinResult, LinearSolverAlgo, LinearSolverError};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;

/// Minimum-norm pseudoinverse solve via SVD: `Auto`'s fallback for
/// non-square operators and for `well_posed == Some(false)`, per spec §4.8
/// and §13 Open Question 3 (kept as SVD rather than rank-revealing QR).
pub struct Svd<T: Scalar> {
    /// Singular values below `rcond * sigma_max` are treated as zero.
    pub rcond: f64,
    _marker: PhantomData<T>,
}

impl<T: Scalar> Svd<T> {
    pub fn new() -> Self {
        Self { rcond: 1e-12, _marker: PhantomData }
    }

    pub fn with_rcond(mut self, rcond: f64) -> Self {
        self.rcond = rcond;
        self
    }
}

impl<T: Scalar> Default for Svd<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Svd<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let matrix = operator.as_matrix();
        let svd = matrix
            .svd()
            .map_err(|e| Report::new(LinearSolverError).attach_printable(format!("{e:?}")))
            .attach_printable("SVD factorization failed")?;

        let u = svd.u();
        let s = svd.s_diagonal();
        let v = svd.v();
        let rank = s.nrows().min(s.ncols());
        let sigma_max = (0..rank)
            .map(|i| s[i].abs())
            .fold(T::zero(), |acc, x| acc.max(x));
        let threshold = sigma_max * T::from(self.rcond).unwrap();

        // y = U^T b
        let y: Vec<T> = (0..rank)
            .map(|i| (0..u.nrows()).fold(T::zero(), |acc, k| acc + u[(k, i)] * b[k]))
            .collect();

        // z_i = y_i / s_i where s_i is resolvable, else 0 (pseudoinverse).
        let z: Vec<T> = (0..rank)
            .map(|i| {
                let si = s[i];
                if si.abs() > threshold {
                    y[i] / si
                } else {
                    T::zero()
                }
            })
            .collect();

        // x = V z
        let n = v.nrows();
        let x: Vec<T> = (0..n)
            .map(|i| (0..rank).fold(T::zero(), |acc, k| acc + v[(i, k)] * z[k]))
            .collect();
        Ok(x)
    }
}
