//! Public entry point for fixed-point iteration (spec §6).

use crate::error::NlsolveError;
use crate::iterate::{iterative_solve, Options, Solution};
use crate::solver::fixed_point_iteration::FixedPointIteration;
use crate::value::NormKind;
use crate::{FixedPointProblem, Scalar};

pub fn fixed_point<T: Scalar, P: FixedPointProblem<T>>(
    problem: &P,
    args: &P::Args,
    y0: &[T],
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
    let solver = FixedPointIteration { problem, args, rtol, atol, norm: NormKind::Rms };
    let options = Options::new(rtol, atol).with_max_steps(max_steps);
    Ok(iterative_solve(&solver, y0, &options))
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn fixed_point_entry_point_finds_square_root() {
        let problem = Heron { target: 2.0 };
        let sol = fixed_point(&problem, &(), &[1.0], 1e-12, 1e-12, 100).unwrap();
        assert!((sol.value[0] - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn fixed_point_rejects_zero_max_steps() {
        let problem = Heron { target: 2.0 };
        assert!(fixed_point(&problem, &(), &[1.0], 1e-12, 1e-12, 0).is_err());
    }
}
