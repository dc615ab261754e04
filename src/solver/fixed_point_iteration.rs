//! Plain fixed-point (Picard) iteration: `y_{n+1} = F(y_n)`, the simplest
//! `IterativeSolver` in the crate — no descent, no step-size controller,
//! just `cauchy_termination` on successive iterates
//! (`original_source/optimistix/_fixed_point.py`).

use crate::iterate::{IterativeSolver, Options};
use crate::result::ResultCode;
use crate::scalar::Scalar;
use crate::termination::cauchy_termination;
use crate::FixedPointProblem;

pub struct FixedPointIteration<'a, T: Scalar, P: FixedPointProblem<T>> {
    pub problem: &'a P,
    pub args: &'a P::Args,
    pub rtol: T,
    pub atol: T,
    pub norm: crate::value::NormKind,
}

#[derive(Clone)]
pub struct FixedPointState<T, Aux> {
    f: Vec<T>,
    aux: Aux,
}

impl<'a, T: Scalar, P: FixedPointProblem<T>> IterativeSolver<T> for FixedPointIteration<'a, T, P> {
    type State = FixedPointState<T, P::Aux>;
    type Aux = P::Aux;

    fn init(&self, y0: &[T], _options: &Options<T>) -> Self::State {
        let (f, aux) = self.problem.eval(y0, self.args);
        FixedPointState { f, aux }
    }

    fn step(&self, _y: &[T], state: &Self::State, _options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux) {
        let y_new = state.f.clone();
        let (f_new, aux_new) = self.problem.eval(&y_new, self.args);
        (y_new, FixedPointState { f: f_new, aux: aux_new.clone() }, aux_new)
    }

    fn terminate(&self, y: &[T], y_new: &[T], state: &Self::State, _options: &Options<T>) -> (bool, ResultCode) {
        let done = cauchy_termination(y, y_new, y, &state.f, self.rtol, self.atol, self.norm);
        (done, ResultCode::Successful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterate::iterative_solve;
    use crate::value::NormKind;

    /// Heron's method for `sqrt(c)`, written as a fixed point of
    /// `F(y) = (y + c/y) / 2`.
    struct Heron {
        target: f64,
    }

    impl FixedPointProblem<f64> for Heron {
        type Args = ();
        type Aux = ();

        fn eval(&self, y: &[f64], _args: &()) -> (Vec<f64>, ()) {
            (vec![0.5 * (y[0] + self.target / y[0])], ())
        }
    }

    #[test]
    fn fixed_point_iteration_finds_square_root() {
        let problem = Heron { target: 2.0 };
        let solver = FixedPointIteration {
            problem: &problem,
            args: &(),
            rtol: 1e-12,
            atol: 1e-12,
            norm: NormKind::Rms,
        };
        let options = Options::new(1e-12, 1e-12).with_max_steps(100);
        let sol = iterative_solve(&solver, &[1.0], &options);
        assert_eq!(sol.result, ResultCode::Successful);
        assert!((sol.value[0] - 2.0_f64.sqrt()).abs() < 1e-9);
    }
}
