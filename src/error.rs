//! Caller-facing precondition-violation errors, in the style of
//! `kcl-ezpz/src/error.rs`'s `NonLinearSystemError`: this is the *other*
//! half of the two-tier error story (`linear_solver`'s `error_stack`
//! reports are internal and never escape a solve), reserved for mistakes a
//! caller made before the iteration even started.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NlsolveError {
    #[error("initial guess has {got} components, problem expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("max_steps must be at least 1")]
    InvalidMaxSteps,

    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(String),

    #[error("trust-region radius must be positive")]
    InvalidTrustRegionRadius,

    #[error("requested linear solver is incompatible with the operator's tags")]
    IncompatibleTags,

    #[error("bisection requires a sign change across the bracket [{lo}, {hi}]")]
    NoSignChange { lo: String, hi: String },
}
