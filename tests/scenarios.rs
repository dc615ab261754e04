//! End-to-end coverage of the crate's six canonical scenarios, each driven
//! entirely through the public entry points in `root_find`/`fixed_point`/
//! `least_squares`/`minimise` rather than any solver internals.

use faer::Mat;
use nlsolve::linear_operator::{MatrixOperator, Tags};
use nlsolve::linear_solver::{linear_solve, Auto};
use nlsolve::{FixedPointProblem, MinimiseProblem, NonlinearSystem, ResultCode, RowMap};

struct UnitLayout(usize, usize);
impl RowMap for UnitLayout {
    fn n_variables(&self) -> usize {
        self.0
    }
    fn n_residuals(&self) -> usize {
        self.1
    }
}

struct SquareRoot {
    layout: UnitLayout,
    target: f64,
}

impl NonlinearSystem<f64> for SquareRoot {
    type Args = ();
    type Aux = ();
    type Layout = UnitLayout;

    fn layout(&self) -> &Self::Layout {
        &self.layout
    }

    fn residual(&self, y: &[f64], _args: &()) -> (Vec<f64>, ()) {
        (vec![y[0] * y[0] - self.target], ())
    }

    fn jacobian_dense(&self, y: &[f64], _args: &()) -> Mat<f64> {
        Mat::from_fn(1, 1, |_, _| 2.0 * y[0])
    }

    fn tags(&self) -> Tags {
        Tags::NONSINGULAR
    }
}

#[test]
fn scenario_newton_finds_root_of_x_squared_minus_two() {
    let problem = SquareRoot { layout: UnitLayout(1, 1), target: 2.0 };
    let sol = nlsolve::root_find::root_find(
        &problem,
        &(),
        &[1.0],
        nlsolve::root_find::RootFindMethod::Newton,
        1e-10,
        1e-10,
        50,
    )
    .unwrap();
    assert_eq!(sol.result, ResultCode::Successful);
    assert!((sol.value[0] - 2.0_f64.sqrt()).abs() < 1e-8);
}

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
fn scenario_heron_fixed_point_finds_square_root() {
    let problem = Heron { target: 2.0 };
    let sol = nlsolve::fixed_point::fixed_point(&problem, &(), &[1.0], 1e-12, 1e-12, 100).unwrap();
    assert_eq!(sol.result, ResultCode::Successful);
    assert!((sol.value[0] - 2.0_f64.sqrt()).abs() < 1e-9);
}

struct Rosenbrock {
    layout: UnitLayout,
}

impl NonlinearSystem<f64> for Rosenbrock {
    type Args = ();
    type Aux = ();
    type Layout = UnitLayout;

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
fn scenario_levenberg_marquardt_solves_rosenbrock() {
    let problem = Rosenbrock { layout: UnitLayout(2, 2) };
    let sol = nlsolve::least_squares::least_squares(
        &problem,
        &(),
        &[-1.2, 1.0],
        nlsolve::least_squares::LeastSquaresMethod::LevenbergMarquardt,
        1e-8,
        1e-10,
        200,
    )
    .unwrap();
    let (f, _) = problem.residual(&sol.value, &());
    assert_eq!(sol.result, ResultCode::Successful);
    assert!(f[0] * f[0] + f[1] * f[1] < 1e-10);
}

#[test]
fn scenario_singular_system_resolved_by_auto_dispatch_svd() {
    // Both rows identical: a singular 2x2 operator. `Auto` is given no
    // `NONSINGULAR` tag, so it must fall through to the SVD pseudoinverse
    // path rather than handing a singular matrix to Cholesky/LU.
    let m = Mat::from_fn(2, 2, |_, j| if j == 0 { 1.0_f64 } else { 1.0 });
    let op = MatrixOperator::new(m, Tags::empty());
    let (x, code) = linear_solve(&Auto::<f64>::new(), &op, &[2.0, 2.0]);
    assert_eq!(code, ResultCode::Successful);
    // The minimum-norm solution of `x0 + x1 = 2` under the all-ones row is
    // `(0.5, 0.5)`, not just any point on the `x0 == x1` line.
    assert!((x[0] - 0.5).abs() < 1e-6);
    assert!((x[1] - 0.5).abs() < 1e-6);
}

#[test]
fn scenario_bisection_finds_fixed_point_of_cosine() {
    let f = |x: f64| x.cos() - x;
    let bisect = nlsolve::solver::bisection::Bisection { f: &f };
    let bracket = bisect.bracket(0.0, 1.0).unwrap();
    let options = nlsolve::Options::new(1e-10, 1e-10).with_max_steps(100);
    let sol = nlsolve::iterate::iterative_solve(&bisect, &bracket, &options);
    assert_eq!(sol.result, ResultCode::Successful);
    assert!((sol.value[0].cos() - sol.value[0]).abs() < 1e-6);
}

struct Arctan {
    layout: UnitLayout,
}

impl NonlinearSystem<f64> for Arctan {
    type Args = ();
    type Aux = ();
    type Layout = UnitLayout;

    fn layout(&self) -> &Self::Layout {
        &self.layout
    }

    fn residual(&self, y: &[f64], _args: &()) -> (Vec<f64>, ()) {
        (vec![y[0].atan()], ())
    }

    fn jacobian_dense(&self, y: &[f64], _args: &()) -> Mat<f64> {
        Mat::from_fn(1, 1, |_, _| 1.0 / (1.0 + y[0] * y[0]))
    }
}

#[test]
fn scenario_newton_reports_divergence_on_arctan() {
    let problem = Arctan { layout: UnitLayout(1, 1) };
    let sol = nlsolve::root_find::root_find(
        &problem,
        &(),
        &[2.0],
        nlsolve::root_find::RootFindMethod::Newton,
        1e-10,
        1e-10,
        30,
    )
    .unwrap();
    // Divergence must be caught as such, not merely as an exhausted step
    // budget: the unstable Newton map on `atan` blows up well before 30
    // steps, so a `NonlinearDivergence` code that arrives within the
    // budget distinguishes real divergence detection from timing out.
    assert_eq!(sol.result, ResultCode::NonlinearDivergence);
    assert!(sol.steps < 30);
}
