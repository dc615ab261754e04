//! Gradient descent and nonlinear conjugate gradient minimisers
//! (`_solver/gradient_methods.py`, `solver/nonlinear_cg.py`), both built
//! from [`cauchy_termination`] rather than the Newton-family
//! `diffsize`/`diffsize_prev` ratio, since neither has a natural notion of
//! a normal-equations residual to size that ratio against.

use crate::descent::{polak_ribiere_direction, Descent, Gradient as GradientDescentAlgebra, NonlinearCgDescent};
use crate::iterate::{IterativeSolver, Options};
use crate::linear_operator::MatrixOperator;
use crate::result::ResultCode;
use crate::step_size::{BacktrackingArmijo, LearningRate, StepSizeController};
use crate::termination::cauchy_termination;
use crate::value::{add, scale, NormKind};
use crate::{MinimiseProblem, Scalar};

pub struct GradientDescent<'a, T: Scalar, P: MinimiseProblem<T>> {
    pub problem: &'a P,
    pub args: &'a P::Args,
    pub learning_rate: T,
    pub rtol: T,
    pub atol: T,
    pub norm: NormKind,
}

#[derive(Clone)]
pub struct GradientState<T, Aux> {
    value: T,
    prev_value: T,
    grad: Vec<T>,
    aux: Aux,
}

impl<'a, T: Scalar, P: MinimiseProblem<T>> IterativeSolver<T> for GradientDescent<'a, T, P> {
    type State = GradientState<T, P::Aux>;
    type Aux = P::Aux;

    fn init(&self, y0: &[T], _options: &Options<T>) -> Self::State {
        let (value, aux) = self.problem.value(y0, self.args);
        let grad = self.problem.gradient(y0, self.args);
        GradientState { value, prev_value: T::infinity(), grad, aux }
    }

    fn step(&self, y: &[T], state: &Self::State, _options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux) {
        let identity = MatrixOperator::<T>::square_identity(y.len());
        let descent = GradientDescentAlgebra;
        let descent_state = descent.init(&state.grad, &identity);

        let controller = LearningRate { rate: self.learning_rate };
        let (step_size, _state, _accepted, _code) =
            controller.step(self.learning_rate, T::zero(), T::zero(), T::zero(), &controller.init(self.learning_rate));
        let (step, _code) = descent.step(step_size, &descent_state);

        let y_new = add(y, &step);
        let (value, aux) = self.problem.value(&y_new, self.args);
        let grad = self.problem.gradient(&y_new, self.args);
        (y_new, GradientState { value, prev_value: state.value, grad, aux: aux.clone() }, aux)
    }

    fn terminate(&self, y: &[T], y_new: &[T], state: &Self::State, _options: &Options<T>) -> (bool, ResultCode) {
        // `state` is post-step here, so its own `value`/`prev_value` pair
        // is exactly the f-space before/after this step needs, instead of
        // comparing `state.value` against itself (which was always zero).
        let done = cauchy_termination(y, y_new, &[state.prev_value], &[state.value], self.rtol, self.atol, self.norm);
        (done, ResultCode::Successful)
    }
}

pub struct NonlinearCg<'a, T: Scalar, P: MinimiseProblem<T>> {
    pub problem: &'a P,
    pub args: &'a P::Args,
    pub line_search: BacktrackingArmijo<T>,
    pub rtol: T,
    pub atol: T,
    pub norm: NormKind,
}

#[derive(Clone)]
pub struct NonlinearCgState<T, Aux> {
    value: T,
    prev_value: T,
    grad: Vec<T>,
    direction: Vec<T>,
    aux: Aux,
}

impl<'a, T: Scalar, P: MinimiseProblem<T>> IterativeSolver<T> for NonlinearCg<'a, T, P> {
    type State = NonlinearCgState<T, P::Aux>;
    type Aux = P::Aux;

    fn init(&self, y0: &[T], _options: &Options<T>) -> Self::State {
        let (value, aux) = self.problem.value(y0, self.args);
        let grad = self.problem.gradient(y0, self.args);
        let direction = polak_ribiere_direction(&grad, None, None);
        NonlinearCgState { value, prev_value: T::infinity(), grad, direction, aux }
    }

    fn step(&self, y: &[T], state: &Self::State, _options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux) {
        let descent = NonlinearCgDescent;
        let descent_state = NonlinearCgDescent::init_with_direction(state.direction.clone());

        let merit = |yy: &[T]| -> T { self.problem.value(yy, self.args).0 };
        let f_y = state.value;

        let mut step_size = T::one();
        let mut ls_state = self.line_search.init(T::one());
        let (mut step, _) = descent.step(step_size, &descent_state);

        let y_new = loop {
            let y_candidate = add(y, &step);
            let f_y_new = merit(&y_candidate);
            let predicted_reduction = -crate::value::dot(&state.grad, &scale(&state.direction, -T::one()));
            let (next_step_size, next_ls_state, accepted, ls_code) =
                self.line_search.step(step_size, f_y, f_y_new, predicted_reduction, &ls_state);
            if accepted || ls_code == ResultCode::NonlinearDivergence {
                break y_candidate;
            }
            step_size = next_step_size;
            ls_state = next_ls_state;
            let (next_step, _) = descent.step(step_size, &descent_state);
            step = next_step;
        };

        let (value, aux) = self.problem.value(&y_new, self.args);
        let grad = self.problem.gradient(&y_new, self.args);
        let direction = polak_ribiere_direction(&grad, Some(&state.grad), Some(&state.direction));
        (y_new, NonlinearCgState { value, prev_value: state.value, grad, direction, aux: aux.clone() }, aux)
    }

    fn terminate(&self, y: &[T], y_new: &[T], state: &Self::State, _options: &Options<T>) -> (bool, ResultCode) {
        let done = cauchy_termination(y, y_new, &[state.prev_value], &[state.value], self.rtol, self.atol, self.norm);
        (done, ResultCode::Successful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterate::iterative_solve;

    struct Quadratic;
    impl MinimiseProblem<f64> for Quadratic {
        type Args = ();
        type Aux = ();

        fn value(&self, y: &[f64], _args: &()) -> (f64, ()) {
            (y[0] * y[0] + y[1] * y[1], ())
        }

        fn gradient(&self, y: &[f64], _args: &()) -> Vec<f64> {
            vec![2.0 * y[0], 2.0 * y[1]]
        }
    }

    #[test]
    fn gradient_descent_converges_on_quadratic_bowl() {
        let problem = Quadratic;
        let solver = GradientDescent {
            problem: &problem,
            args: &(),
            learning_rate: 0.1,
            rtol: 1e-8,
            atol: 1e-10,
            norm: NormKind::Rms,
        };
        let options = Options::new(1e-8, 1e-10).with_max_steps(500);
        let sol = iterative_solve(&solver, &[3.0, -4.0], &options);
        assert!(sol.value[0].abs() < 1e-3);
        assert!(sol.value[1].abs() < 1e-3);
    }

    #[test]
    fn nonlinear_cg_converges_on_quadratic_bowl() {
        let problem = Quadratic;
        let solver = NonlinearCg {
            problem: &problem,
            args: &(),
            line_search: BacktrackingArmijo { decrease_factor: 0.5, armijo_slope: 0.1, min_step_size: 1e-12 },
            rtol: 1e-8,
            atol: 1e-10,
            norm: NormKind::Rms,
        };
        let options = Options::new(1e-8, 1e-10).with_max_steps(200);
        let sol = iterative_solve(&solver, &[3.0, -4.0], &options);
        assert!(sol.value[0].abs() < 1e-2);
        assert!(sol.value[1].abs() < 1e-2);
    }
}
