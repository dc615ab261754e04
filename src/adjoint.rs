//! Adjoint-strategy contract (spec §4.9), grounded in
//! `original_source/optimistix/adjoint.py`. The host differentiable-array
//! runtime the original relies on for reverse-mode autodiff is explicitly
//! out of scope (spec Non-goals), so this module specifies the *interface*
//! a caller-supplied autodiff layer would need, without implementing
//! checkpointed reverse-mode differentiation itself — see DESIGN.md Open
//! Question 4.
//!
//! `RecursiveCheckpoint` still does real work standalone: it's the bounded
//! forward-replay loop the original checkpoints *through*, so it's useful
//! on its own as a plain memory-bounded re-solve.

use crate::iterate::{IterativeSolver, Options, Solution};

/// How a solve's gradient (with respect to its inputs) would be computed
/// by a surrounding autodiff system. Neither variant differentiates
/// anything itself — both describe *which replay strategy* an AD layer
/// built on top of this crate should use; see each variant's docs.
pub trait Adjoint<T, S: IterativeSolver<T>> {
    /// Re-run (or otherwise reconstruct) the forward solve in a form
    /// suitable for the chosen differentiation strategy.
    fn replay(&self, solver: &S, y0: &[T], options: &Options<T>) -> Solution<T, S::Aux>;
}

/// Forward replay bounded by a fixed checkpoint budget: re-solves from
/// `y0` exactly as the forward pass did, capping steps at `checkpoints`
/// rather than `options.max_steps` so a reverse-mode tape (were one
/// attached) would retain a bounded number of checkpoints. With no AD
/// tape in this crate, this collapses to a plain bounded re-solve —
/// documented as Open Question 4 in DESIGN.md.
pub struct RecursiveCheckpoint {
    pub checkpoints: usize,
}

impl<T: Copy, S: IterativeSolver<T>> Adjoint<T, S> for RecursiveCheckpoint {
    fn replay(&self, solver: &S, y0: &[T], options: &Options<T>) -> Solution<T, S::Aux> {
        let bounded = Options { max_steps: self.checkpoints.min(options.max_steps), ..*options };
        crate::iterate::iterative_solve(solver, y0, &bounded)
    }
}

/// One-shot linear solve at the fixed point, the cheaper alternative to
/// `RecursiveCheckpoint` when the solver has actually converged: rather
/// than replaying every forward step, an implicit-function-theorem
/// gradient only needs one linear solve against the operator at the fixed
/// point. This crate has no autodiff to hand that solve to, so `Implicit`
/// is a marker documenting which operator a caller's AD layer should
/// linear-solve against (the last Jacobian/Hessian-approximation the
/// forward solve used) rather than a runnable replay path.
pub struct Implicit;

impl<T: Copy, S: IterativeSolver<T>> Adjoint<T, S> for Implicit {
    fn replay(&self, solver: &S, y0: &[T], options: &Options<T>) -> Solution<T, S::Aux> {
        crate::iterate::iterative_solve(solver, y0, options)
    }
}
