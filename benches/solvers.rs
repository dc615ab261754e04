//! Criterion benchmarks for the four public entry points, the generalised
//! analogue of `newtonls-faer`'s own `benches/solver.rs` (same harness, same
//! one-function-per-scenario shape, scaled out to every problem class this
//! crate adds).

use criterion::{criterion_group, criterion_main, Criterion};
use faer::Mat;

use nlsolve::linear_operator::Tags;
use nlsolve::{
    fixed_point::fixed_point,
    least_squares::{least_squares, LeastSquaresMethod},
    minimise::{minimise, MinimiseMethod},
    root_find::{root_find, RootFindMethod},
    FixedPointProblem, MinimiseProblem, NonlinearSystem, RowMap,
};

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

fn bench_root_find(c: &mut Criterion) {
    let problem = SquareRoot { layout: UnitLayout(1, 1), target: 2.0 };
    c.bench_function("root_find/newton_square_root", |b| {
        b.iter(|| root_find(&problem, &(), &[1.0], RootFindMethod::Newton, 1e-10, 1e-10, 50).unwrap())
    });
}

fn bench_fixed_point(c: &mut Criterion) {
    let problem = Heron { target: 2.0 };
    c.bench_function("fixed_point/heron_square_root", |b| {
        b.iter(|| fixed_point(&problem, &(), &[1.0], 1e-12, 1e-12, 100).unwrap())
    });
}

fn bench_least_squares(c: &mut Criterion) {
    let problem = Rosenbrock { layout: UnitLayout(2, 2) };
    c.bench_function("least_squares/levenberg_marquardt_rosenbrock", |b| {
        b.iter(|| {
            least_squares(&problem, &(), &[-1.2, 1.0], LeastSquaresMethod::LevenbergMarquardt, 1e-8, 1e-10, 200)
                .unwrap()
        })
    });
}

fn bench_minimise(c: &mut Criterion) {
    let problem = Quadratic;
    c.bench_function("minimise/gradient_descent_quadratic_bowl", |b| {
        b.iter(|| minimise(&problem, &(), &[3.0, -4.0], MinimiseMethod::GradientDescent, 0.1, 1e-8, 1e-10, 500).unwrap())
    });
}

criterion_group!(benches, bench_root_find, bench_fixed_point, bench_least_squares, bench_minimise);
criterion_main!(benches);
