//! Gauss-Newton and Levenberg-Marquardt for least-squares problems: both
//! reuse [`NonlinearSystem`] directly (it already supports
//! `n_residuals() > n_variables()`, exactly like `newtonls-faer`'s
//! `solves_non_square_system` test), and both reuse the Newton-family
//! termination test (`_solver/levenberg_marquardt_gauss_newton.py`
//! checking only non-finiteness, no `rate > 2` branch — see
//! `termination::small_diverged`'s `newton_style` flag).

use crate::descent::{Descent, IterativeDualDirect};
use crate::iterate::{IterativeSolver, Options};
use crate::linear_operator::MatrixOperator;
use crate::result::ResultCode;
use crate::solver::newton::Newton;
use crate::step_size::{BacktrackingArmijo, StepSizeController};
use crate::termination::{diffsize, small_diverged};
use crate::value::{add, dot, NormKind};
use crate::{NonlinearSystem, Scalar};

/// Gauss-Newton is literally Newton's method with the square-operator
/// assumption dropped: `Auto`'s non-square branch already resolves to the
/// SVD pseudoinverse solve, which *is* the Gauss-Newton step
/// `p = -J^+ f`. Kept as a distinct name (rather than just telling callers
/// to reuse `solver::newton::Newton`) for discoverability from
/// `least_squares.rs`, and because its divergence test is the
/// non-Newton-style (non-finite-only) one.
pub type GaussNewton<'a, T, P> = Newton<'a, T, P>;

pub struct LevenbergMarquardt<'a, T: Scalar, P: NonlinearSystem<T>> {
    pub problem: &'a P,
    pub args: &'a P::Args,
    pub line_search: BacktrackingArmijo<T>,
    pub initial_damping_step_size: T,
    pub rtol: T,
    pub atol: T,
    pub norm: NormKind,
    pub precision_digits: i32,
}

#[derive(Clone)]
pub struct LevenbergMarquardtState<T, Aux> {
    f: Vec<T>,
    aux: Aux,
    damping_step_size: T,
    diffsize: T,
    diffsize_prev: T,
    step_result: ResultCode,
}

impl<'a, T: Scalar, P: NonlinearSystem<T>> IterativeSolver<T> for LevenbergMarquardt<'a, T, P> {
    type State = LevenbergMarquardtState<T, P::Aux>;
    type Aux = P::Aux;

    fn init(&self, y0: &[T], _options: &Options<T>) -> Self::State {
        let (f, aux) = self.problem.residual(y0, self.args);
        LevenbergMarquardtState {
            f,
            aux,
            damping_step_size: self.initial_damping_step_size,
            diffsize: T::infinity(),
            diffsize_prev: T::infinity(),
            step_result: ResultCode::Successful,
        }
    }

    fn step(&self, y: &[T], state: &Self::State, _options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux) {
        let jacobian = self.problem.jacobian_dense(y, self.args);
        let op = MatrixOperator::new(jacobian, self.problem.tags());

        let descent = IterativeDualDirect;
        let descent_state = descent.init(&state.f, &op);

        let merit = |yy: &[T]| -> T {
            let (fv, _) = self.problem.residual(yy, self.args);
            dot(&fv, &fv)
        };
        let f_y = dot(&state.f, &state.f);

        // The damping step-size doubles as `1/mu`: the teacher's own
        // adaptive-damping grow/shrink mechanism
        // (`newtonls-faer/src/solver.rs::NewtonCfg::adaptive`) reused here
        // per SPEC_FULL.md §13 Open Question 2, since the original leaves
        // the damping update rule an explicit `TODO`.
        let mut damping_step_size = state.damping_step_size;
        let (mut step, mut descent_code) = descent.step(damping_step_size, &descent_state);
        let mut result_code = descent_code;

        let (y_new, f_new, aux_new, final_damping) = loop {
            let y_candidate = add(y, &step);
            let f_y_new = merit(&y_candidate);
            let predicted_reduction = -f_y;
            let ls_state = self.line_search.init(damping_step_size);
            let (_next, _state, accepted, ls_code) =
                self.line_search.step(damping_step_size, f_y, f_y_new, predicted_reduction, &ls_state);
            result_code = result_code.merge(ls_code);

            if accepted {
                let grown = damping_step_size * T::from(2.0).unwrap();
                let (f_new, aux_new) = self.problem.residual(&y_candidate, self.args);
                break (y_candidate, f_new, aux_new, grown);
            }
            let shrunk = damping_step_size * T::from(0.25).unwrap();
            if shrunk < T::from(1e-12).unwrap() || ls_code == ResultCode::NonlinearDivergence {
                let (f_new, aux_new) = self.problem.residual(&y_candidate, self.args);
                break (y_candidate, f_new, aux_new, shrunk);
            }
            damping_step_size = shrunk;
            let (next_step, next_code) = descent.step(damping_step_size, &descent_state);
            step = next_step;
            descent_code = next_code;
            result_code = result_code.merge(descent_code);
        };

        let d = diffsize(y, &y_new, self.rtol, self.atol, self.norm);
        let new_state = LevenbergMarquardtState {
            f: f_new,
            aux: aux_new.clone(),
            damping_step_size: final_damping,
            diffsize: d,
            diffsize_prev: state.diffsize,
            step_result: result_code,
        };
        (y_new, new_state, aux_new)
    }

    fn terminate(&self, _y: &[T], _y_new: &[T], state: &Self::State, _options: &Options<T>) -> (bool, ResultCode) {
        // `newton_style = false`: Levenberg-Marquardt's own termination
        // file only checks non-finiteness, it never treats a growing
        // (but finite) rate as divergence the way plain Newton does.
        let (small, diverged, converged) = small_diverged(state.diffsize, state.diffsize_prev, self.precision_digits, false);
        let merged = state.step_result.merge(if diverged { ResultCode::NonlinearDivergence } else { ResultCode::Successful });
        (small || diverged || converged || !merged.is_success(), merged)
    }
}
