//! Public entry point for root-finding (spec §6): normalises a
//! [`NonlinearSystem`] plus tolerances into a configured
//! [`solver::newton::Newton`] and drives it through [`iterative_solve`].

use crate::error::NlsolveError;
use crate::iterate::{iterative_solve, Options, Solution};
use crate::linear_solver::{Auto, LinearSolverAlgo};
use crate::solver::newton::Newton;
use crate::step_size::BacktrackingArmijo;
use crate::value::NormKind;
use crate::{NonlinearSystem, RowMap, Scalar};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootFindMethod {
    /// Recompute the Jacobian every step.
    Newton,
    /// Reuse the Jacobian from the first step (the Chord method), trading
    /// convergence rate for fewer Jacobian evaluations.
    Chord,
}

pub fn root_find<T: Scalar, P: NonlinearSystem<T>>(
    problem: &P,
    args: &P::Args,
    y0: &[T],
    method: RootFindMethod,
    rtol: T,
    atol: T,
    max_steps: usize,
) -> Result<Solution<T, P::Aux>, NlsolveError> {
    root_find_with_linear_solver(problem, args, y0, method, rtol, atol, max_steps, &Auto::<T>::new())
}

pub fn root_find_with_linear_solver<T: Scalar, P: NonlinearSystem<T>>(
    problem: &P,
    args: &P::Args,
    y0: &[T],
    method: RootFindMethod,
    rtol: T,
    atol: T,
    max_steps: usize,
    linear_solver: &dyn LinearSolverAlgo<T>,
) -> Result<Solution<T, P::Aux>, NlsolveError> {
    let expected = problem.layout().n_variables();
    if y0.len() != expected {
        return Err(NlsolveError::DimensionMismatch { expected, got: y0.len() });
    }
    if problem.layout().n_residuals() != expected {
        return Err(NlsolveError::DimensionMismatch { expected, got: problem.layout().n_residuals() });
    }
    if max_steps == 0 {
        return Err(NlsolveError::InvalidMaxSteps);
    }
    if rtol <= T::zero() {
        return Err(NlsolveError::InvalidTolerance("rtol must be positive".to_string()));
    }

    let solver = Newton {
        problem,
        args,
        linear_solver,
        line_search: BacktrackingArmijo { decrease_factor: T::from(0.5).unwrap(), armijo_slope: T::from(0.1).unwrap(), min_step_size: T::from(1e-12).unwrap() },
        reuse_jacobian: matches!(method, RootFindMethod::Chord),
        rtol,
        atol,
        norm: NormKind::Rms,
        precision_digits: 15,
    };
    let options = Options::new(rtol, atol).with_max_steps(max_steps);
    Ok(iterative_solve(&solver, y0, &options))
}
