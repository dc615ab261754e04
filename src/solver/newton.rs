//! Newton's method for square root-finding problems, generalizing
//! `newtonls-faer/src/solver.rs`'s `newton_iterate` (adaptive damping via
//! backtracking) into an [`IterativeSolver`] built from the shared
//! [`Descent`]/[`StepSizeController`] algebra. `Chord` (reusing the
//! initial Jacobian across steps) is the `reuse_jacobian` flag rather than
//! a separate type, mirroring how little the two differ in the original.

use crate::descent::{Descent, Newton as NewtonDescent};
use crate::iterate::{IterativeSolver, Options};
use crate::linear_operator::MatrixOperator;
use crate::linear_solver::LinearSolverAlgo;
use crate::result::ResultCode;
use crate::step_size::{BacktrackingArmijo, StepSizeController};
use crate::termination::{diffsize, small_diverged};
use crate::value::{add, dot, NormKind};
use crate::{NonlinearSystem, Scalar};

pub struct Newton<'a, T: Scalar, P: NonlinearSystem<T>> {
    pub problem: &'a P,
    pub args: &'a P::Args,
    pub linear_solver: &'a dyn LinearSolverAlgo<T>,
    pub line_search: BacktrackingArmijo<T>,
    /// When true, the Jacobian from the first step is reused for every
    /// subsequent step (the Chord method) instead of being recomputed.
    pub reuse_jacobian: bool,
    pub rtol: T,
    pub atol: T,
    pub norm: NormKind,
    /// Decimal digits of working precision, feeding `small_diverged`'s
    /// `10^(2 - precision)` threshold (15 for `f64`, 6 for `f32`).
    pub precision_digits: i32,
}

#[derive(Clone)]
pub struct NewtonState<T, Aux> {
    f: Vec<T>,
    aux: Aux,
    jacobian: Option<faer::Mat<T>>,
    diffsize: T,
    diffsize_prev: T,
    step_result: ResultCode,
}

impl<'a, T: Scalar, P: NonlinearSystem<T>> IterativeSolver<T> for Newton<'a, T, P> {
    type State = NewtonState<T, P::Aux>;
    type Aux = P::Aux;

    fn init(&self, y0: &[T], _options: &Options<T>) -> Self::State {
        let (f, aux) = self.problem.residual(y0, self.args);
        NewtonState {
            f,
            aux,
            jacobian: None,
            diffsize: T::infinity(),
            diffsize_prev: T::infinity(),
            step_result: ResultCode::Successful,
        }
    }

    fn step(&self, y: &[T], state: &Self::State, _options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux) {
        let jacobian = if self.reuse_jacobian {
            state.jacobian.clone().unwrap_or_else(|| self.problem.jacobian_dense(y, self.args))
        } else {
            self.problem.jacobian_dense(y, self.args)
        };
        let op = MatrixOperator::new(jacobian.clone(), self.problem.tags());

        let descent = NewtonDescent { linear_solver: self.linear_solver };
        let descent_state = descent.init(&state.f, &op);

        let merit = |yy: &[T]| -> T {
            let (fv, _) = self.problem.residual(yy, self.args);
            dot(&fv, &fv)
        };
        let f_y = dot(&state.f, &state.f);

        let mut step_size = T::one();
        let mut ls_state = self.line_search.init(T::one());
        let (mut step, mut descent_code) = descent.step(step_size, &descent_state);
        let mut result_code = descent_code;

        let (y_new, f_new, aux_new) = loop {
            let y_candidate = add(y, &step);
            let f_y_new = merit(&y_candidate);
            let predicted_reduction = -f_y;
            let (next_step_size, next_ls_state, accepted, ls_code) =
                self.line_search.step(step_size, f_y, f_y_new, predicted_reduction, &ls_state);
            result_code = result_code.merge(ls_code);

            if accepted {
                let (f_new, aux_new) = self.problem.residual(&y_candidate, self.args);
                break (y_candidate, f_new, aux_new);
            }
            if ls_code == ResultCode::NonlinearDivergence {
                let (f_new, aux_new) = self.problem.residual(&y_candidate, self.args);
                break (y_candidate, f_new, aux_new);
            }
            step_size = next_step_size;
            ls_state = next_ls_state;
            let (next_step, next_code) = descent.step(step_size, &descent_state);
            step = next_step;
            descent_code = next_code;
            result_code = result_code.merge(descent_code);
        };

        let d = diffsize(y, &y_new, self.rtol, self.atol, self.norm);
        let new_state = NewtonState {
            f: f_new,
            aux: aux_new.clone(),
            jacobian: if self.reuse_jacobian { Some(jacobian) } else { None },
            diffsize: d,
            diffsize_prev: state.diffsize,
            step_result: result_code,
        };
        (y_new, new_state, aux_new)
    }

    fn terminate(&self, _y: &[T], _y_new: &[T], state: &Self::State, _options: &Options<T>) -> (bool, ResultCode) {
        let (small, diverged, converged) = small_diverged(state.diffsize, state.diffsize_prev, self.precision_digits, true);
        let merged = state.step_result.merge(if diverged { ResultCode::NonlinearDivergence } else { ResultCode::Successful });
        // Precedence small > diverged > converged: a shrinking-but-not-yet-
        // `small` step can still fire `converged` off the extrapolated
        // `factor`, but an outright `small`/`diverged` call takes priority.
        (small || diverged || converged || !merged.is_success(), merged)
    }
}
