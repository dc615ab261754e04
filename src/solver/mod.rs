//! Concrete nonlinear solvers, one file per algorithm family, the way
//! `newtonls-faer` keeps `solver.rs` as a single file but scoped up to
//! directory granularity here since this crate has five families instead
//! of one.

pub mod bisection;
pub mod fixed_point_iteration;
pub mod gauss_newton_lm;
pub mod gradient;
pub mod newton;
