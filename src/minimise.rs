//! Public entry point for unconstrained minimisation (spec §6).

use crate::error::NlsolveError;
use crate::iterate::{iterative_solve, Options, Solution};
use crate::solver::gradient::{GradientDescent, NonlinearCg};
use crate::step_size::BacktrackingArmijo;
use crate::value::NormKind;
use crate::{MinimiseProblem, Scalar};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinimiseMethod {
    GradientDescent,
    NonlinearCg,
}

pub fn minimise<T: Scalar, P: MinimiseProblem<T>>(
    problem: &P,
    args: &P::Args,
    y0: &[T],
    method: MinimiseMethod,
    learning_rate: T,
    rtol: T,
    atol: T,
    max_steps: usize,
) -> Result<Solution<T, P::Aux>, NlsolveError> {
    if max_steps == 0 {
        return Err(NlsolveError::InvalidMaxSteps);
    }
    if rtol <= T::zero() {
        return Err(NlsolveError::InvalidTolerance("rtol must be positive".to_string()));
    }
    let options = Options::new(rtol, atol).with_max_steps(max_steps);

    match method {
        MinimiseMethod::GradientDescent => {
            let solver = GradientDescent { problem, args, learning_rate, rtol, atol, norm: NormKind::Rms };
            Ok(iterative_solve(&solver, y0, &options))
        }
        MinimiseMethod::NonlinearCg => {
            let line_search = BacktrackingArmijo {
                decrease_factor: T::from(0.5).unwrap(),
                armijo_slope: T::from(0.1).unwrap(),
                min_step_size: T::from(1e-12).unwrap(),
            };
            let solver = NonlinearCg { problem, args, line_search, rtol, atol, norm: NormKind::Rms };
            Ok(iterative_solve(&solver, y0, &options))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn minimise_entry_point_finds_bowl_minimum() {
        let problem = Quadratic;
        let sol = minimise(&problem, &(), &[3.0, -4.0], MinimiseMethod::GradientDescent, 0.1, 1e-8, 1e-10, 500).unwrap();
        assert!(sol.value[0].abs() < 1e-3);
        assert!(sol.value[1].abs() < 1e-3);
    }
}
