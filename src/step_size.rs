//! Step-size controllers (spec §4.2/§4.3), decoupled from the descent they
//! drive. Grounded in `original_source/optimistix/line_search.py` (backtracking
//! Armijo), `solver/trust_region.py` (classical trust region) and
//! `search/models.py` (the constant-rate "learning rate" controller used by
//! the gradient-family minimisers).

use crate::descent::Descent;
use crate::linear_operator::LinearOperator;
use crate::result::ResultCode;
use crate::scalar::Scalar;
use crate::value::{add, dot};

/// Drives a [`Descent`] by proposing a step-size, inspecting the resulting
/// objective change, and deciding whether to accept, shrink, or grow.
pub trait StepSizeController<T: Scalar> {
    type State: Clone;

    fn init(&self, initial_step_size: T) -> Self::State;

    /// `f_y`/`f_y_new` are objective/merit-function values at the old and
    /// candidate points; `predicted_reduction` is what the descent's local
    /// model predicted (used by trust-region controllers, ignored by
    /// backtracking). Returns the step-size to retry or accept with, the
    /// updated state, whether this call accepted the step, and a result
    /// code (set to `NonlinearDivergence` if backtracking/contraction is
    /// exhausted without acceptance).
    fn step(
        &self,
        step_size: T,
        f_y: T,
        f_y_new: T,
        predicted_reduction: T,
        state: &Self::State,
    ) -> (T, Self::State, bool, ResultCode);
}

/// Constant step-size, always accepted on the first call. Pairs with
/// [`crate::descent::Gradient`]/[`crate::descent::NonlinearCgDescent`] for
/// the plain gradient-descent/nonlinear-CG minimisers.
pub struct LearningRate<T> {
    pub rate: T,
}

impl<T: Scalar> StepSizeController<T> for LearningRate<T> {
    type State = ();

    fn init(&self, _initial_step_size: T) -> Self::State {}

    fn step(&self, _step_size: T, _f_y: T, _f_y_new: T, _predicted_reduction: T, _state: &Self::State) -> (T, Self::State, bool, ResultCode) {
        (self.rate, (), true, ResultCode::Successful)
    }
}

/// Backtracking line search with an Armijo sufficient-decrease condition,
/// the generalisation of `newtonls-faer`'s divergence-guard backtracking
/// in `solver.rs::newton_iterate`.
pub struct BacktrackingArmijo<T> {
    pub decrease_factor: T,
    pub armijo_slope: T,
    pub min_step_size: T,
}

#[derive(Clone, Copy)]
pub struct BacktrackingState<T> {
    backtracks: usize,
}

impl<T: Scalar> StepSizeController<T> for BacktrackingArmijo<T> {
    type State = BacktrackingState<T>;

    fn init(&self, _initial_step_size: T) -> Self::State {
        BacktrackingState { backtracks: 0 }
    }

    fn step(
        &self,
        step_size: T,
        f_y: T,
        f_y_new: T,
        predicted_reduction: T,
        state: &Self::State,
    ) -> (T, Self::State, bool, ResultCode) {
        let sufficient_decrease = f_y_new <= f_y + self.armijo_slope * step_size * predicted_reduction;
        if sufficient_decrease {
            return (step_size, *state, true, ResultCode::Successful);
        }
        if step_size * self.decrease_factor < self.min_step_size {
            return (step_size, *state, true, ResultCode::NonlinearDivergence);
        }
        let next = BacktrackingState { backtracks: state.backtracks + 1 };
        (step_size * self.decrease_factor, next, false, ResultCode::Successful)
    }
}

/// Classical trust region: expand the radius on a good step, contract and
/// reject on a bad one, based on the ratio of actual to predicted
/// reduction (`solver/trust_region.py::ClassicalTrustRegion`).
pub struct ClassicalTrustRegion<T> {
    pub low_cutoff: T,
    pub high_cutoff: T,
    pub low_constant: T,
    pub high_constant: T,
    pub min_radius: T,
}

#[derive(Clone, Copy)]
pub struct TrustRegionState<T> {
    radius: T,
}

impl<T: Scalar> StepSizeController<T> for ClassicalTrustRegion<T> {
    type State = TrustRegionState<T>;

    fn init(&self, initial_step_size: T) -> Self::State {
        TrustRegionState { radius: initial_step_size }
    }

    fn step(
        &self,
        step_size: T,
        f_y: T,
        f_y_new: T,
        predicted_reduction: T,
        state: &Self::State,
    ) -> (T, Self::State, bool, ResultCode) {
        let actual_reduction = f_y - f_y_new;
        let ratio = if predicted_reduction != T::zero() {
            actual_reduction / predicted_reduction
        } else {
            T::zero()
        };

        if ratio < self.low_cutoff {
            let radius = (step_size * self.low_constant).max(self.min_radius);
            return (radius, TrustRegionState { radius }, false, ResultCode::Successful);
        }
        let radius = if ratio > self.high_cutoff {
            step_size * self.high_constant
        } else {
            step_size
        };
        let accept = ratio > T::zero();
        (radius, TrustRegionState { radius: radius.max(self.min_radius) }, accept, ResultCode::Successful)
    }
}

/// Adapts a [`Descent`] + the nonlinear problem's objective into a plain
/// scalar function of step-size, the role `solver/backtracking.py`'s
/// `OneDimensionalFunction` plays for line-search controllers that need to
/// evaluate `f(y + descent(t))` directly rather than through the full
/// iteration state.
pub struct OneDimensionalFunction<'a, T: Scalar, D: Descent<T>> {
    pub descent: &'a D,
    pub descent_state: &'a D::State,
    pub y: &'a [T],
    pub objective: &'a dyn Fn(&[T]) -> T,
}

impl<'a, T: Scalar, D: Descent<T>> OneDimensionalFunction<'a, T, D> {
    /// `f(t) = objective(y + descent.step(t))`.
    pub fn eval(&self, step_size: T) -> (T, ResultCode) {
        let (step, code) = self.descent.step(step_size, self.descent_state);
        let y_new = add(self.y, &step);
        ((self.objective)(&y_new), code)
    }

    /// Linearised predicted reduction `-<vector, operator * step>` used by
    /// trust-region ratio tests, computed without re-evaluating the
    /// (possibly expensive) objective.
    pub fn predicted_reduction(&self, step: &[T], vector: &[T], operator: &dyn LinearOperator<T>) -> T {
        dot(vector, &operator.mv(step)) * (-T::one())
    }
}
