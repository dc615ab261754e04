//! The iteration driver, generalizing `newtonls-faer/src/solver.rs`'s
//! `newton_iterate` loop from "one Newton step with adaptive damping" to
//! "one step of any [`IterativeSolver`]". Every problem-class entry point
//! (`root_find`, `fixed_point`, `least_squares`, `minimise`) bottoms out in
//! [`iterative_solve`].

use crate::result::ResultCode;
use crate::value::NormKind;

/// Convergence tolerances and iteration budget threaded through every
/// solver, the generic analogue of `NewtonCfg<T>`'s `tol`/`max_iter` pair.
#[derive(Clone, Copy, Debug)]
pub struct Options<T> {
    pub rtol: T,
    pub atol: T,
    pub max_steps: usize,
    pub norm: NormKind,
}

impl<T: Copy> Options<T> {
    pub fn new(rtol: T, atol: T) -> Self {
        Self { rtol, atol, max_steps: 256, norm: NormKind::Rms }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_norm(mut self, norm: NormKind) -> Self {
        self.norm = norm;
        self
    }
}

/// Outcome of [`iterative_solve`]: the final point, how the loop ended, how
/// many steps it took, and whatever auxiliary data the last step produced
/// (e.g. the final residual, for diagnostics).
#[derive(Clone, Debug)]
pub struct Solution<T, Aux> {
    pub value: Vec<T>,
    pub result: ResultCode,
    pub steps: usize,
    pub aux: Aux,
}

/// One nonlinear-iteration strategy: how to seed state from an initial
/// guess, how to advance one step, and when to stop. Root-finders,
/// fixed-point iteration, least-squares solvers and minimisers all
/// implement this and differ only in what `step`/`terminate` compute.
pub trait IterativeSolver<T> {
    type State: Clone;
    type Aux: Clone;

    fn init(&self, y0: &[T], options: &Options<T>) -> Self::State;

    /// Advance from `y` to a new point, returning the updated state and
    /// any auxiliary output (e.g. the residual at the new point).
    fn step(&self, y: &[T], state: &Self::State, options: &Options<T>) -> (Vec<T>, Self::State, Self::Aux);

    /// Whether the loop should stop at `y_new`, and with which result code.
    fn terminate(
        &self,
        y: &[T],
        y_new: &[T],
        state: &Self::State,
        options: &Options<T>,
    ) -> (bool, ResultCode);
}

/// Drive `solver` from `y0` until it reports convergence/divergence or the
/// step budget in `options.max_steps` is exhausted. This is the one loop
/// every public entry point in the crate funnels through.
pub fn iterative_solve<T: Copy, S: IterativeSolver<T>>(
    solver: &S,
    y0: &[T],
    options: &Options<T>,
) -> Solution<T, S::Aux> {
    let mut y = y0.to_vec();
    let mut state = solver.init(&y, options);
    let mut steps = 0usize;

    loop {
        let (y_new, new_state, aux) = solver.step(&y, &state, options);
        steps += 1;
        let (done, code) = solver.terminate(&y, &y_new, &new_state, options);

        if done {
            return Solution { value: y_new, result: code, steps, aux };
        }
        if steps >= options.max_steps {
            return Solution {
                value: y_new,
                result: ResultCode::MaxStepsReached.merge(code),
                steps,
                aux,
            };
        }

        y = y_new;
        state = new_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bisection-free fixed-point averaging solver (`y_{n+1} = (y_n + c/y_n)/2`,
    /// Heron's method for `sqrt(c)`) used only to exercise the driver
    /// itself in isolation from any production solver.
    struct Heron {
        target: f64,
    }

    impl IterativeSolver<f64> for Heron {
        type State = ();
        type Aux = ();

        fn init(&self, _y0: &[f64], _options: &Options<f64>) -> Self::State {}

        fn step(&self, y: &[f64], _state: &Self::State, _options: &Options<f64>) -> (Vec<f64>, Self::State, Self::Aux) {
            let y0 = y[0];
            (vec![0.5 * (y0 + self.target / y0)], (), ())
        }

        fn terminate(&self, y: &[f64], y_new: &[f64], _state: &Self::State, options: &Options<f64>) -> (bool, ResultCode) {
            let diff = (y_new[0] - y[0]).abs();
            let small = diff <= options.atol + options.rtol * y_new[0].abs();
            (small, ResultCode::Successful)
        }
    }

    #[test]
    fn drives_heron_iteration_to_convergence() {
        let solver = Heron { target: 2.0 };
        let options = Options::new(1e-12, 1e-12);
        let sol = iterative_solve(&solver, &[1.0], &options);
        assert_eq!(sol.result, ResultCode::Successful);
        assert!((sol.value[0] - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn reports_max_steps_reached_when_budget_exhausted() {
        struct NeverConverges;
        impl IterativeSolver<f64> for NeverConverges {
            type State = ();
            type Aux = ();
            fn init(&self, _y0: &[f64], _options: &Options<f64>) -> Self::State {}
            fn step(&self, y: &[f64], _s: &Self::State, _o: &Options<f64>) -> (Vec<f64>, Self::State, Self::Aux) {
                (vec![y[0] + 1.0], (), ())
            }
            fn terminate(&self, _y: &[f64], _y_new: &[f64], _s: &Self::State, _o: &Options<f64>) -> (bool, ResultCode) {
                (false, ResultCode::Successful)
            }
        }
        let options = Options::new(1e-12, 1e-12).with_max_steps(5);
        let sol = iterative_solve(&NeverConverges, &[0.0], &options);
        assert_eq!(sol.result, ResultCode::MaxStepsReached);
        assert_eq!(sol.steps, 5);
    }
}
