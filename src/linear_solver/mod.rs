//! Linear-solver dispatch facade (spec §4.8), generalizing
//! `newtonls-faer/src/linalg.rs`'s hand-picked dense/sparse LU/QR split into
//! one trait with a concrete implementation per algorithm, plus an `Auto`
//! dispatcher that reads an operator's [`Tags`](crate::linear_operator::Tags).
//!
//! A genuine factorization failure (non-PD Cholesky input, rank-deficient
//! QR) is reported internally via `error_stack`, the same mechanism
//! `newtonls-faer`'s sparse `FaerLu`/`SparseQr` already use. The facade-level
//! [`linear_solve`] function then collapses that `Result` — and any
//! NaN/non-finite solution a numerically-completed-but-singular dense
//! factorization can still produce — into a plain [`ResultCode`], since a
//! singular system is data this crate's callers branch on, not a panic
//! (spec §7).

mod cg;
mod cholesky;
mod diagonal;
mod lu;
mod qr;
mod svd;
mod tridiagonal;

pub use cg::Cg;
pub use cholesky::Cholesky;
pub use diagonal::Diagonal;
pub use lu::Lu;
pub use qr::Qr;
pub use svd::Svd;
pub use tridiagonal::Tridiagonal;

use std::fmt;
use std::marker::PhantomData;

use error_stack::Report;

use crate::linear_operator::{LinearOperator, Tags};
use crate::result::ResultCode;
use crate::scalar::Scalar;

#[derive(Debug)]
pub struct LinearSolverError;

impl fmt::Display for LinearSolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("linear solve failed")
    }
}

impl std::error::Error for LinearSolverError {}

pub type LinResult<T> = Result<T, Report<LinearSolverError>>;

/// One concrete factorization/solve strategy. Implementors assume the
/// operator already satisfies whatever structural precondition the name
/// promises (`Cholesky` assumes symmetric positive (semi)definite, etc.);
/// `Auto` is responsible for only ever handing them a compatible operator.
pub trait LinearSolverAlgo<T: Scalar> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>>;
}

/// Collapse a concrete algorithm's `Result` into `(solution, ResultCode)`:
/// a hard factorization failure or a non-finite solution both become
/// [`ResultCode::LinearSingular`] rather than propagating as an error.
pub fn linear_solve<T: Scalar>(
    algo: &dyn LinearSolverAlgo<T>,
    operator: &dyn LinearOperator<T>,
    b: &[T],
) -> (Vec<T>, ResultCode) {
    match algo.solve(operator, b) {
        Ok(x) if x.iter().all(|v| v.is_finite()) => (x, ResultCode::Successful),
        Ok(x) => (x, ResultCode::LinearSingular),
        Err(_report) => (vec![T::zero(); operator.in_size()], ResultCode::LinearSingular),
    }
}

/// Default tolerance and iteration cap `Auto` hands `Cg` when it dispatches
/// a symmetric, possibly-singular square operator there. `Cg`'s own
/// constructor takes these explicitly because a caller picking CG directly
/// may want tighter control; `Auto` has no such input, so it picks
/// conservative defaults scaled to system size.
const AUTO_CG_TOL: f64 = 1e-10;

fn auto_cg_max_iter(n: usize) -> usize {
    (n * 10).max(50)
}

/// Dispatch table from spec §4.8: picks Cholesky/CG/LU/SVD/Diagonal/Tridiagonal
/// by inspecting an operator's tags and shape. `well_posed` mirrors the
/// original's tri-state (`Some(true)` forces a well-posed solver,
/// `Some(false)` forces a pseudoinverse-capable one, `None` decides from
/// tags and squareness). Symmetric operators route to `Cholesky` when
/// tagged positive (semi)definite and assumed nonsingular, to `Cg`
/// otherwise (possibly singular, CG tolerates that by returning whatever
/// it reached rather than failing); asymmetric operators split on
/// nonsingularity between `Lu` and `Svd`, exactly as non-square operators
/// always do.
pub struct Auto<T: Scalar> {
    pub well_posed: Option<bool>,
    _marker: PhantomData<T>,
}

impl<T: Scalar> Auto<T> {
    pub fn new() -> Self {
        Self { well_posed: None, _marker: PhantomData }
    }

    pub fn well_posed(mut self, well_posed: bool) -> Self {
        self.well_posed = Some(well_posed);
        self
    }
}

impl<T: Scalar> Default for Auto<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Auto<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let tags = operator.tags();
        let square = operator.in_size() == operator.out_size();
        if !square {
            return Svd::new().solve(operator, b);
        }
        let assume_well_posed = self
            .well_posed
            .unwrap_or(tags.contains(Tags::NONSINGULAR));

        if tags.contains(Tags::DIAGONAL) {
            return Diagonal::new().solve(operator, b);
        }
        if tags.contains(Tags::TRIDIAGONAL) {
            return Tridiagonal::new().solve(operator, b);
        }
        if tags.contains(Tags::SYMMETRIC) {
            if assume_well_posed && tags.contains(Tags::POSITIVE_SEMIDEFINITE) {
                return Cholesky::new().solve(operator, b);
            }
            if !assume_well_posed {
                let max_iter = auto_cg_max_iter(operator.in_size());
                return Cg::new(T::from(AUTO_CG_TOL).unwrap(), max_iter).solve(operator, b);
            }
            // Symmetric, assumed nonsingular, but not tagged positive
            // (semi)definite: Cholesky isn't safe to try, fall through to
            // the plain dense solve below.
        }
        if !assume_well_posed {
            return Svd::new().solve(operator, b);
        }
        Lu::new().solve(operator, b)
    }
}
