//! Public entry point for least squares (spec §6): the same
//! [`NonlinearSystem`] trait as `root_find`, but allowing
//! `n_residuals() > n_variables()`, dispatched to Gauss-Newton or
//! Levenberg-Marquardt.

use crate::error::NlsolveError;
use crate::iterate::{iterative_solve, Options, Solution};
use crate::linear_solver::{Auto, LinearSolverAlgo};
use crate::solver::gauss_newton_lm::{GaussNewton, LevenbergMarquardt};
use crate::step_size::BacktrackingArmijo;
use crate::value::NormKind;
use crate::{NonlinearSystem, RowMap, Scalar};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeastSquaresMethod {
    GaussNewton,
    LevenbergMarquardt,
}

pub fn least_squares<T: Scalar, P: NonlinearSystem<T>>(
    problem: &P,
    args: &P::Args,
    y0: &[T],
    method: LeastSquaresMethod,
    rtol: T,
    atol: T,
    max_steps: usize,
) -> Result<Solution<T, P::Aux>, NlsolveError> {
    let n = problem.layout().n_variables();
    let m = problem.layout().n_residuals();
    if y0.len() != n {
        return Err(NlsolveError::DimensionMismatch { expected: n, got: y0.len() });
    }
    if m < n {
        return Err(NlsolveError::DimensionMismatch { expected: n, got: m });
    }
    if max_steps == 0 {
        return Err(NlsolveError::InvalidMaxSteps);
    }
    if rtol <= T::zero() {
        return Err(NlsolveError::InvalidTolerance("rtol must be positive".to_string()));
    }

    let linear_solver = Auto::<T>::new();
    let options = Options::new(rtol, atol).with_max_steps(max_steps);
    let line_search = BacktrackingArmijo {
        decrease_factor: T::from(0.5).unwrap(),
        armijo_slope: T::from(0.1).unwrap(),
        min_step_size: T::from(1e-12).unwrap(),
    };

    match method {
        LeastSquaresMethod::GaussNewton => {
            let solver = GaussNewton {
                problem,
                args,
                linear_solver: &linear_solver as &dyn LinearSolverAlgo<T>,
                line_search,
                reuse_jacobian: false,
                rtol,
                atol,
                norm: NormKind::Rms,
                precision_digits: 15,
            };
            Ok(iterative_solve(&solver, y0, &options))
        }
        LeastSquaresMethod::LevenbergMarquardt => {
            let solver = LevenbergMarquardt {
                problem,
                args,
                line_search,
                initial_damping_step_size: T::one(),
                rtol,
                atol,
                norm: NormKind::Rms,
                precision_digits: 15,
            };
            Ok(iterative_solve(&solver, y0, &options))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_operator::Tags;
    use faer::Mat;

    struct Layout;
    impl RowMap for Layout {
        fn n_variables(&self) -> usize { 2 }
        fn n_residuals(&self) -> usize { 2 }
    }

    struct Rosenbrock {
        layout: Layout,
    }

    impl NonlinearSystem<f64> for Rosenbrock {
        type Args = ();
        type Aux = ();
        type Layout = Layout;

        fn layout(&self) -> &Self::Layout {
            &self.layout
        }

        fn residual(&self, y: &[f64], _args: &()) -> (Vec<f64>, ()) {
            (vec![10.0 * (y[1] - y[0] * y[0]), 1.0 - y[0]], ())
        }

        fn jacobian_dense(&self, y: &[f64], _args: &()) -> Mat<f64> {
            Mat::from_fn(2, 2, |i, j| match (i, j) {
                (0, 0) => -20.0 * y[0],
                (0, 1) => 10.0,
                (1, 0) => -1.0,
                (1, 1) => 0.0,
                _ => unreachable!(),
            })
        }

        fn tags(&self) -> Tags {
            Tags::empty()
        }
    }

    #[test]
    fn least_squares_solves_rosenbrock_via_levenberg_marquardt() {
        let problem = Rosenbrock { layout: Layout };
        let sol = least_squares(&problem, &(), &[-1.2, 1.0], LeastSquaresMethod::LevenbergMarquardt, 1e-8, 1e-10, 200).unwrap();
        let (f, _) = problem.residual(&sol.value, &());
        assert_eq!(sol.result, crate::result::ResultCode::Successful);
        assert!(crate::value::dot(&f, &f) < 1e-10);
    }
}
