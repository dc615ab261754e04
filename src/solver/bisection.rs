//! Bracketed bisection root-finder, specified directly against a plain
//! scalar closure rather than [`crate::NonlinearSystem`]: the original
//! treats bisection as a one-dimensional special case with no Jacobian at
//! all, so threading it through the Jacobian-carrying problem trait would
//! only add an unused method every caller has to stub out.

use crate::iterate::{IterativeSolver, Options};
use crate::result::ResultCode;
use crate::scalar::Scalar;

pub struct Bisection<'a, T: Scalar> {
    pub f: &'a dyn Fn(T) -> T,
}

#[derive(Clone, Copy)]
pub struct BisectionState<T> {
    lo: T,
    hi: T,
    f_lo: T,
}

impl<'a, T: Scalar> Bisection<'a, T> {
    /// `y0 = [lo, hi]`; the bracket must have a sign change, checked here
    /// rather than left to silently return garbage.
    pub fn bracket(&self, lo: T, hi: T) -> Result<[T; 2], crate::error::NlsolveError> {
        let f_lo = (self.f)(lo);
        let f_hi = (self.f)(hi);
        if f_lo.signum() == f_hi.signum() && f_lo != T::zero() && f_hi != T::zero() {
            return Err(crate::error::NlsolveError::NoSignChange {
                lo: "f(lo) has the same sign as f(hi)".to_string(),
                hi: "no root is guaranteed to exist in this bracket".to_string(),
            });
        }
        Ok([lo, hi])
    }
}

impl<'a, T: Scalar> IterativeSolver<T> for Bisection<'a, T> {
    type State = BisectionState<T>;
    type Aux = ();

    fn init(&self, y0: &[T], _options: &Options<T>) -> Self::State {
        let lo = y0[0];
        let hi = y0[1];
        BisectionState { lo, hi, f_lo: (self.f)(lo) }
    }

    fn step(&self, _y: &[T], state: &Self::State, _options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux) {
        let mid = (state.lo + state.hi) / T::from(2.0).unwrap();
        let f_mid = (self.f)(mid);
        let new_state = if f_mid.signum() == state.f_lo.signum() {
            BisectionState { lo: mid, hi: state.hi, f_lo: f_mid }
        } else {
            BisectionState { lo: state.lo, hi: mid, f_lo: state.f_lo }
        };
        (vec![mid], new_state, ())
    }

    fn terminate(&self, _y: &[T], _y_new: &[T], state: &Self::State, options: &Options<T>) -> (bool, ResultCode) {
        let width = state.hi - state.lo;
        let done = width.abs() <= options.atol + options.rtol * state.hi.abs();
        (done, ResultCode::Successful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterate::iterative_solve;

    #[test]
    fn bisection_finds_fixed_point_of_cosine() {
        let f = |x: f64| x.cos() - x;
        let bisect = Bisection { f: &f };
        let bracket = bisect.bracket(0.0, 1.0).unwrap();
        let options = Options::new(1e-10, 1e-10).with_max_steps(100);
        let sol = iterative_solve(&bisect, &bracket, &options);
        assert_eq!(sol.result, ResultCode::Successful);
        assert!((sol.value[0].cos() - sol.value[0]).abs() < 1e-6);
    }

    #[test]
    fn bracket_rejects_same_sign_endpoints() {
        let f = |x: f64| x * x + 1.0;
        let bisect = Bisection { f: &f };
        assert!(bisect.bracket(0.0, 1.0).is_err());
    }
}
