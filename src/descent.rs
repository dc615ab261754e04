//! Descent algebra (spec §4.2): a `Descent` turns a step-size scalar into a
//! step, decoupled from whoever is choosing that scalar
//! ([`crate::step_size`]). Grounded in
//! `original_source/optimistix/_descent.py` and `solver/descent.py`, with
//! `IterativeDual` additionally grounded in `_solver/iterative_dual.py`.

use faer::Mat;

use crate::linear_operator::{LinearOperator, MatrixOperator, Tags};
use crate::linear_solver::{linear_solve, Auto, LinearSolverAlgo, Qr};
use crate::result::ResultCode;
use crate::scalar::Scalar;
use crate::value::{axpy, dot, norm, scale, sub, NormKind};

/// `vector` is `f(y)` (a residual, for root-finding/least-squares) or
/// `grad(y)` (for minimisation, with `operator` set to the identity so
/// `operator^T * vector == vector`); `operator` is the Jacobian/Hessian
/// approximation at `y`. Every descent reduces to a function of a single
/// step-size scalar once these are fixed, exactly like
/// `_descent.py::AbstractDescent.__call__`.
pub trait Descent<T: Scalar> {
    type State: Clone;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State;

    /// The step for the given step-size (a line-search `t` or a
    /// trust-region radius `delta`, depending on which
    /// `StepSizeController` drives this descent).
    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode);
}

/// Steepest-descent direction `-step_size * operator^T * vector`.
pub struct Gradient;

#[derive(Clone)]
pub struct GradientState<T> {
    neg_grad: Vec<T>,
}

impl<T: Scalar> Descent<T> for Gradient {
    type State = GradientState<T>;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State {
        let grad = operator.transpose().mv(vector);
        GradientState { neg_grad: scale(&grad, -T::one()) }
    }

    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode) {
        (scale(&state.neg_grad, step_size), ResultCode::Successful)
    }
}

/// Like [`Gradient`], but the direction is normalised to unit norm before
/// scaling, so `step_size` reads as a trust-region radius rather than a
/// line-search multiplier.
pub struct NormalisedGradient {
    pub norm: NormKind,
}

impl<T: Scalar> Descent<T> for NormalisedGradient {
    type State = GradientState<T>;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State {
        let grad = operator.transpose().mv(vector);
        let n = norm(&grad, self.norm);
        let unit = if n > T::zero() { scale(&grad, T::one() / n) } else { grad };
        GradientState { neg_grad: scale(&unit, -T::one()) }
    }

    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode) {
        (scale(&state.neg_grad, step_size), ResultCode::Successful)
    }
}

/// Newton direction: solve `operator * p = -vector` once in `init`, then
/// scale `p` by `step_size` (typically a backtracking line-search `t`).
pub struct Newton<'a, T: Scalar> {
    pub linear_solver: &'a dyn LinearSolverAlgo<T>,
}

#[derive(Clone)]
pub struct NewtonState<T> {
    step: Vec<T>,
    result: ResultCode,
}

impl<'a, T: Scalar> Descent<T> for Newton<'a, T> {
    type State = NewtonState<T>;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State {
        let neg_vector = scale(vector, -T::one());
        let (step, result) = linear_solve(self.linear_solver, operator, &neg_vector);
        NewtonState { step, result }
    }

    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode) {
        (scale(&state.step, step_size), state.result)
    }
}

/// Newton direction normalised to unit norm, for trust-region controllers
/// that size steps by radius rather than by a `[0, 1]` line-search `t`.
pub struct NormalisedNewton<'a, T: Scalar> {
    pub linear_solver: &'a dyn LinearSolverAlgo<T>,
    pub norm: NormKind,
}

impl<'a, T: Scalar> Descent<T> for NormalisedNewton<'a, T> {
    type State = NewtonState<T>;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State {
        let neg_vector = scale(vector, -T::one());
        let (raw, result) = linear_solve(self.linear_solver, operator, &neg_vector);
        let n = norm(&raw, self.norm);
        let step = if n > T::zero() { scale(&raw, T::one() / n) } else { raw };
        NewtonState { step, result }
    }

    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode) {
        (scale(&state.step, step_size), state.result)
    }
}

/// Nonlinear conjugate gradient: `direction = -grad + beta * prev_direction`,
/// Polak-Ribiere `beta` clamped to zero (restart to steepest descent when
/// negative), per `solver/nonlinear_cg.py`. The cross-iteration state
/// (`prev_grad`, `prev_direction`) lives in `solver::gradient::NonlinearCg`
/// rather than here, since it outlives any single `Descent::init` call;
/// this type just turns an already-computed direction into a step, via
/// [`polak_ribiere_direction`].
pub struct NonlinearCgDescent;

#[derive(Clone)]
pub struct NonlinearCgState<T> {
    direction: Vec<T>,
}

impl NonlinearCgDescent {
    pub fn init_with_direction<T: Scalar>(direction: Vec<T>) -> NonlinearCgState<T> {
        NonlinearCgState { direction }
    }
}

impl<T: Scalar> Descent<T> for NonlinearCgDescent {
    type State = NonlinearCgState<T>;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State {
        let grad = operator.transpose().mv(vector);
        NonlinearCgState { direction: scale(&grad, -T::one()) }
    }

    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode) {
        (scale(&state.direction, step_size), ResultCode::Successful)
    }
}

/// Polak-Ribiere nonlinear-CG direction update, factored out of
/// `NonlinearCgDescent` so `solver::gradient::NonlinearCg` can carry
/// `prev_grad`/`prev_direction` across outer iterations without threading
/// them through `Descent::init`'s narrower signature.
pub fn polak_ribiere_direction<T: Scalar>(
    grad: &[T],
    prev_grad: Option<&[T]>,
    prev_direction: Option<&[T]>,
) -> Vec<T> {
    let (Some(pg), Some(pd)) = (prev_grad, prev_direction) else {
        return scale(grad, -T::one());
    };
    let denom = dot(pg, pg);
    if denom == T::zero() {
        return scale(grad, -T::one());
    }
    let numer = dot(grad, &sub(grad, pg));
    let beta = (numer / denom).max(T::zero());
    axpy(&scale(grad, -T::one()), beta, pd)
}

/// Stacks `operator` over `sqrt(mu) * I` and `-vector` over a zero block:
/// solving this augmented system by least squares is exactly solving the
/// damped normal equations `(J^T J + mu I) p = -J^T f`, but without ever
/// forming `J^T J` — squaring the operator's condition number the way
/// explicit normal equations would is exactly what the augmented-QR form
/// avoids. Grounded in `_solver/iterative_dual.py`'s direct dual descent,
/// which solves the same augmented least-squares problem.
fn augmented_system<T: Scalar>(vector: &[T], jacobian: &Mat<T>, mu: T) -> (Mat<T>, Vec<T>) {
    let m = jacobian.nrows();
    let n = jacobian.ncols();
    let sqrt_mu = mu.max(T::zero()).sqrt();
    let augmented = Mat::from_fn(m + n, n, |i, col| {
        if i < m {
            jacobian[(i, col)]
        } else if i - m == col {
            sqrt_mu
        } else {
            T::zero()
        }
    });
    let mut rhs = vec![T::zero(); m + n];
    for i in 0..m {
        rhs[i] = -vector[i];
    }
    (augmented, rhs)
}

/// `R^T q = p` by forward substitution: `R^T` is lower triangular with
/// `R^T[i][j] = R[j][i]`, so `q[i]` only depends on already-solved
/// `q[0..i]`. Used to get the exact `d(phi)/d(lambda)` in
/// [`IterativeDualIndirect::solve`] without finite differences.
fn solve_r_transpose<T: Scalar>(r: &Mat<T>, p: &[T]) -> Vec<T> {
    let n = p.len();
    let mut q = vec![T::zero(); n];
    for i in 0..n {
        let mut acc = p[i];
        for j in 0..i {
            acc = acc - r[(j, i)] * q[j];
        }
        q[i] = acc / r[(i, i)];
    }
    q
}

/// Levenberg-Marquardt "iterative dual" descent: regularises the
/// Gauss-Newton system with `mu = 1 / step_size`, solving the damped
/// least-squares problem `[J; sqrt(mu) I] p ~ [-f; 0]` via QR directly on
/// `J` rather than via the normal equations `J^T J`.
pub struct IterativeDualDirect;

#[derive(Clone)]
pub struct IterativeDualState<T> {
    vector: Vec<T>,
    jacobian: Mat<T>,
}

impl<T: Scalar> Descent<T> for IterativeDualDirect {
    type State = IterativeDualState<T>;

    fn init(&self, vector: &[T], operator: &dyn LinearOperator<T>) -> Self::State {
        IterativeDualState { vector: vector.to_vec(), jacobian: operator.as_matrix() }
    }

    fn step(&self, step_size: T, state: &Self::State) -> (Vec<T>, ResultCode) {
        let mu = if step_size > T::zero() { T::one() / step_size } else { T::zero() };
        let (augmented, rhs) = augmented_system(&state.vector, &state.jacobian, mu);
        let op = MatrixOperator::new(augmented, Tags::empty());
        linear_solve(&Qr::new(), &op, &rhs)
    }
}

/// Inner scalar root-find for the *indirect* iterative dual: find `lambda
/// >= 0` such that `||p(lambda)|| == delta`, via the secant-like
/// bracket-update rule of `_solver/iterative_dual.py::_IndirectDualRootFind`.
/// Each trial `lambda` is solved through the same augmented-QR form
/// [`IterativeDualDirect`] uses, and the same QR factorization yields `R`,
/// from which `q = R^-T p` gives the exact
/// `d(phi)/d(lambda) = -||q||^2 / ||p(lambda)||` Newton update — no
/// finite-difference stand-in.
pub struct IterativeDualIndirect<T: Scalar> {
    pub max_inner_steps: usize,
    pub inner_tol: T,
}

impl<T: Scalar> IterativeDualIndirect<T> {
    /// Solve for the `lambda >= 0` that drives `||p(lambda)|| == delta`,
    /// returning `p` and whether the inner root-find converged.
    pub fn solve(&self, vector: &[T], operator: &dyn LinearOperator<T>, delta: T) -> (Vec<T>, ResultCode) {
        let jacobian = operator.as_matrix();
        let n = jacobian.ncols();

        let jt_f = operator.transpose().mv(vector);
        let grad_norm = norm(&jt_f, NormKind::Rms) * T::from(n as f64).unwrap().sqrt();

        let p_and_r = |lambda: T| -> (Vec<T>, Mat<T>) {
            let (augmented, rhs) = augmented_system(vector, &jacobian, lambda);
            let qr = augmented.qr();
            let rhs_mat = Mat::from_fn(rhs.len(), 1, |i, _| rhs[i]);
            let solution = qr.solve_lstsq(&rhs_mat);
            let p: Vec<T> = (0..n).map(|i| solution[(i, 0)]).collect();
            let r = qr.compute_r();
            (p, r)
        };

        let mut lower = T::zero();
        let mut upper = if delta > T::zero() { grad_norm / delta } else { T::one() };
        let mut lambda = upper;

        let mut iterations = 0usize;
        loop {
            let (p, r) = p_and_r(lambda);
            let p_norm = norm(&p, NormKind::Rms) * T::from(n as f64).unwrap().sqrt();
            let phi = p_norm - delta;
            iterations += 1;

            // `_IndirectDualRootFind` never accepts on the very first
            // trial lambda (it's only a bracket endpoint); require at
            // least one secant refinement, and track bracket width
            // alongside |phi| so a stalled-but-not-yet-tight bracket
            // still stops.
            let bracket_width = upper - lower;
            if iterations >= 2 && (phi.abs() <= self.inner_tol || bracket_width <= self.inner_tol) {
                return (p, ResultCode::Successful);
            }
            if iterations >= self.max_inner_steps {
                return (p, ResultCode::MaxStepsReached);
            }

            if phi > T::zero() {
                lower = lambda;
            } else {
                upper = lambda;
            }

            let q = solve_r_transpose(&r, &p);
            let q_norm = norm(&q, NormKind::Rms) * T::from(n as f64).unwrap().sqrt();
            let phi_grad = if p_norm > T::zero() { -(q_norm * q_norm) / p_norm } else { -T::one() };
            let candidate = lambda - phi / phi_grad;
            lambda = if candidate > lower && candidate < upper {
                candidate
            } else {
                (T::from(1e-3).unwrap() * upper).max((lower * upper).sqrt())
            };
        }
    }
}
