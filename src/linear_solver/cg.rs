use error_stack::Report;

use super::{LinResult, LinearSolverAlgo, LinearSolverError};
use crate::linear_operator::LinearOperator;
use crate::scalar::Scalar;
use crate::value::{axpy, dot, sub};

/// Matrix-free conjugate gradient for symmetric positive (semi)definite
/// operators. `tol`/`max_iter` are explicit constructor arguments so a
/// caller asking for CG directly controls them; `Auto` (spec §4.8) also
/// dispatches here for symmetric, possibly-singular square operators,
/// picking its own conservative defaults since its `solve` signature has
/// no room for per-call tuning.
pub struct Cg<T: Scalar> {
    pub tol: T,
    pub max_iter: usize,
}

impl<T: Scalar> Cg<T> {
    pub fn new(tol: T, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }
}

impl<T: Scalar> LinearSolverAlgo<T> for Cg<T> {
    fn solve(&self, operator: &dyn LinearOperator<T>, b: &[T]) -> LinResult<Vec<T>> {
        let n = operator.in_size();
        let mut x = vec![T::zero(); n];
        let mut r = sub(b, &operator.mv(&x));
        let mut p = r.clone();
        let mut rs_old = dot(&r, &r);
        let b_norm = dot(b, b).sqrt().max(T::one());

        for _ in 0..self.max_iter {
            if rs_old.sqrt() / b_norm <= self.tol {
                return Ok(x);
            }
            let ap = operator.mv(&p);
            let denom = dot(&p, &ap);
            if denom == T::zero() {
                return Err(Report::new(LinearSolverError)
                    .attach_printable("conjugate gradient breakdown: p^T A p == 0"));
            }
            let alpha = rs_old / denom;
            x = axpy(&x, alpha, &p);
            r = axpy(&r, -alpha, &ap);
            let rs_new = dot(&r, &r);
            let beta = rs_new / rs_old;
            p = axpy(&r, beta, &p);
            rs_old = rs_new;
        }
        Ok(x)
    }
}
