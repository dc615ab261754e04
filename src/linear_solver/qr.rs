use std::marker::PhantomData;

use error_stack::Report;
use faer::Mat;

use super::{LinResult, LinearSolverAlgo, LinearSolverError};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;

/// Dense QR, used by `Auto` for rectangular or ill-conditioned-but-
/// well-posed systems, and directly by callers who want a least-squares
/// solve without paying for a full SVD. Mirrors `newtonls-faer`'s sparse
/// `SparseQr`'s `error_stack`-wrapped `solve_lstsq`.
pub struct Qr<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Qr<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Scalar> Default for Qr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Qr<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let matrix = operator.as_matrix();
        if matrix.nrows() < matrix.ncols() {
            return Err(Report::new(LinearSolverError)
                .attach_printable("QR least-squares requires at least as many rows as columns"));
        }
        let qr = matrix.qr();
        let rhs = Mat::from_fn(b.len(), 1, |i, _| b[i]);
        let solution = qr.solve_lstsq(&rhs);
        Ok((0..operator.in_size()).map(|i| solution[(i, 0)]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_operator::{MatrixOperator, Tags};

    #[test]
    fn solves_overdetermined_least_squares() {
        let m = Mat::from_fn(3, 2, |i, j| [[1.0_f64, 0.0], [0.0, 1.0], [1.0, 1.0]][i][j]);
        let op = MatrixOperator::new(m, Tags::empty());
        let x = Qr::new().solve(&op, &[1.0, 1.0, 2.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-6);
        assert!((x[1] - 1.0).abs() < 1e-6);
    }
}
