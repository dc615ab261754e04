//! Shared termination predicates, grounded in
//! `original_source/optimistix/_solver/misc.py::cauchy_termination` and
//! `_solver/gauss_newton_levenberg_marquardt.py`'s `small`/`diverged`
//! predicate pair.

use crate::scalar::Scalar;
use crate::value::{norm, small_relative_diff, sub, NormKind};

/// Stop when *both* the step in `y`-space and the change in `f`-space are
/// small relative to `atol + rtol * |value|`. Used by the gradient-family
/// minimisers (`Gradient`, `NonlinearCgDescent`), which have no natural
/// `diffsize`/`diffsize_prev` ratio the way Newton-family solvers do.
pub fn cauchy_termination<T: Scalar>(
    y: &[T],
    y_new: &[T],
    f: &[T],
    f_new: &[T],
    rtol: T,
    atol: T,
    norm_kind: NormKind,
) -> bool {
    small_relative_diff(y, y_new, rtol, atol, norm_kind)
        && small_relative_diff(f, f_new, rtol, atol, norm_kind)
}

/// Extrapolated-convergence tolerance for the `factor` predicate in
/// [`small_diverged`]: `factor` must land in `(0, CONVERGED_KAPPA)` for
/// `converged` to fire. Matches the `kappa = 1e-2` default in
/// `_solver/gauss_newton_levenberg_marquardt.py`.
pub const CONVERGED_KAPPA: f64 = 1e-2;

/// `small`/`diverged`/`converged` triple shared by Newton, Gauss-Newton and
/// Levenberg-Marquardt: `diffsize` is the norm of the last step relative
/// to `atol + rtol * |y|`, `diffsize_prev` the same quantity one step
/// earlier. `rate = diffsize / diffsize_prev`; `small` fires when
/// `diffsize` drops below `10^(2 - precision)` (`precision` in decimal
/// digits of working precision, 15 for `f64`, 6 for `f32`), `diverged`
/// fires when the rate is non-finite or exceeds 2 — matching
/// `_solver/gauss_newton_levenberg_marquardt.py` exactly. Levenberg-
/// Marquardt (`solver/levenberg_marquardt_gauss_newton.py`) only checks
/// non-finiteness, which callers get by passing `newton_style = false`.
///
/// `converged` is the Aitken-style extrapolated estimate the same module
/// computes alongside `small`/`diverged`: assuming the step shrinks
/// geometrically at `rate`, the remaining distance to the fixed point is
/// `factor = diffsize * rate / (1 - rate)`; `converged` fires when that
/// remaining distance is positive but smaller than `CONVERGED_KAPPA`.
/// Precedence among the three (enforced by callers, not here) is
/// `small > diverged > converged`.
pub fn small_diverged<T: Scalar>(
    diffsize: T,
    diffsize_prev: T,
    precision_digits: i32,
    newton_style: bool,
) -> (bool, bool, bool) {
    let threshold = T::from(10f64.powi(2 - precision_digits)).unwrap();
    let small = diffsize < threshold;
    if diffsize_prev == T::zero() {
        return (small, false, false);
    }
    let rate = diffsize / diffsize_prev;
    let diverged = !rate.is_finite() || (newton_style && rate > T::from(2.0).unwrap());
    let factor = diffsize * rate / (T::one() - rate);
    let converged = factor > T::zero() && factor < T::from(CONVERGED_KAPPA).unwrap();
    (small, diverged, converged)
}

/// `diffsize` as used by [`small_diverged`]: the norm of `y_new - y`
/// relative to `atol + rtol * |y_new|`.
pub fn diffsize<T: Scalar>(y: &[T], y_new: &[T], rtol: T, atol: T, norm_kind: NormKind) -> T {
    let diff = sub(y_new, y);
    let scale: Vec<T> = y_new.iter().map(|&v| atol + rtol * v.abs()).collect();
    let ratio: Vec<T> = diff
        .iter()
        .zip(&scale)
        .map(|(&d, &s)| if s > T::zero() { d.abs() / s } else { T::zero() })
        .collect();
    norm(&ratio, norm_kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cauchy_termination_fires_when_both_spaces_stall() {
        let y = [1.0_f64, 1.0];
        let y_new = [1.0 + 1e-14, 1.0 - 1e-14];
        let f = [0.0_f64, 0.0];
        let f_new = [1e-14, -1e-14];
        assert!(cauchy_termination(&y, &y_new, &f, &f_new, 1e-8, 1e-8, NormKind::Rms));
    }

    #[test]
    fn small_diverged_flags_nonfinite_rate_as_divergence() {
        let (_small, diverged, _converged) = small_diverged(f64::NAN, 1.0, 15, true);
        assert!(diverged);
    }

    #[test]
    fn small_diverged_flags_growing_rate_only_in_newton_style() {
        let (_small, diverged_newton, _c) = small_diverged(4.0_f64, 1.0, 15, true);
        let (_small, diverged_lm, _c) = small_diverged(4.0_f64, 1.0, 15, false);
        assert!(diverged_newton);
        assert!(!diverged_lm);
    }

    #[test]
    fn small_diverged_converges_on_shrinking_rate_below_kappa() {
        // rate = 0.01, factor = diffsize * rate / (1 - rate) ~ 0.0101,
        // comfortably below CONVERGED_KAPPA (1e-2) ... actually right at
        // the edge, so pick a rate small enough to land well under it.
        let (small, diverged, converged) = small_diverged(0.1_f64, 100.0, 15, true);
        assert!(!small);
        assert!(!diverged);
        assert!(converged);
    }
}
