//! Iterative solvers for root-finding, fixed-point iteration, least
//! squares, and unconstrained minimisation, built from a shared iteration
//! driver, a descent algebra, pluggable step-size controllers, and a
//! tag-dispatched dense linear-solver facade.
//!
//! The crate is organised the way `newton_faer` is: a handful of flat
//! top-level modules rather than deep nesting. `lib.rs` itself carries the
//! problem-definition traits, generalized from `newton_faer`'s
//! `RowMap`/`NonlinearSystem` (which already supported non-square systems,
//! making them a natural fit for both root-finding and least-squares) plus
//! two new problem traits for the two remaining problem classes this
//! crate adds: fixed-point iteration and minimisation.

pub mod adjoint;
pub mod descent;
pub mod error;
pub mod fixed_point;
pub mod iterate;
pub mod least_squares;
pub mod linear_operator;
pub mod linear_solver;
pub mod minimise;
pub mod result;
pub mod root_find;
pub mod scalar;
pub mod solver;
pub mod step_size;
pub mod termination;
pub mod value;

pub use error::NlsolveError;
pub use iterate::{IterativeSolver, Options, Solution};
pub use linear_operator::{LinearOperator, MatrixOperator, Tags};
pub use result::ResultCode;
pub use scalar::Scalar;

use faer::Mat;

use crate::linear_operator::Tags as OpTags;
use crate::scalar::Scalar as ScalarTrait;

/// Shape/indexing metadata for a system of residual equations: how many
/// unknowns it has, and how many residual rows (equal to `n_variables`
/// for root-finding, possibly larger for least-squares).
pub trait RowMap {
    fn n_variables(&self) -> usize;
    fn n_residuals(&self) -> usize;
}

/// A (possibly rectangular) system `F(y) = 0`. Implementors supply both
/// the residual and its Jacobian directly — this crate has no automatic
/// differentiation (spec Non-goals), so the derivative callback is part
/// of the trait contract rather than derived.
///
/// `n_residuals() == n_variables()` makes this a root-finding problem
/// (`solver::newton`); `n_residuals() > n_variables()` makes it a
/// least-squares problem (`solver::gauss_newton_lm`). Both solver
/// families are written against this one trait, exactly as
/// `newtonls-faer`'s own `solves_non_square_system` test exercises the
/// same `NonlinearSystem` impl both ways.
pub trait NonlinearSystem<T: ScalarTrait> {
    type Args;
    type Aux: Clone;
    type Layout: RowMap;

    fn layout(&self) -> &Self::Layout;

    /// `F(y)`, plus whatever auxiliary output the caller wants threaded
    /// through to the final `Solution`.
    fn residual(&self, y: &[T], args: &Self::Args) -> (Vec<T>, Self::Aux);

    /// Dense Jacobian of `residual` at `y`: `n_residuals x n_variables`.
    fn jacobian_dense(&self, y: &[T], args: &Self::Args) -> Mat<T>;

    /// Structural hints about the Jacobian (symmetric, nonsingular, ...),
    /// forwarded to the linear-solver dispatch facade.
    fn tags(&self) -> OpTags {
        OpTags::empty()
    }
}

/// `y_{n+1} = F(y_n)`, the contract `solver::fixed_point_iteration`
/// drives to a fixed point `y* = F(y*)`.
pub trait FixedPointProblem<T: ScalarTrait> {
    type Args;
    type Aux: Clone;

    fn eval(&self, y: &[T], args: &Self::Args) -> (Vec<T>, Self::Aux);
}

/// A scalar objective plus its gradient, the contract
/// `solver::gradient`'s `GradientDescent`/`NonlinearCg` minimisers drive
/// towards a stationary point.
pub trait MinimiseProblem<T: ScalarTrait> {
    type Args;
    type Aux: Clone;

    fn value(&self, y: &[T], args: &Self::Args) -> (T, Self::Aux);
    fn gradient(&self, y: &[T], args: &Self::Args) -> Vec<T>;
}
