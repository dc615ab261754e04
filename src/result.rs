//! Closed result-code vocabulary shared by every solver in the crate.
//!
//! Mirrors `optimistix.solution.RESULTS`: a result is data, not an error.
//! Solvers never raise on a failed convergence; they report it.

/// Outcome of a solve. Ordered from best to worst so that
/// [`ResultCode::merge`] can pick the more pessimistic of two codes without
/// a match arm per combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResultCode {
    Successful,
    MaxStepsReached,
    LinearSingular,
    NonlinearDivergence,
}

impl ResultCode {
    pub fn is_success(self) -> bool {
        matches!(self, ResultCode::Successful)
    }

    /// Monotonic-pessimistic merge: once a code has been downgraded it is
    /// never upgraded back by a later, more optimistic code.
    pub fn merge(self, other: ResultCode) -> ResultCode {
        self.max(other)
    }
}

impl Default for ResultCode {
    fn default() -> Self {
        ResultCode::Successful
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_pessimistic_and_order_independent() {
        let a = ResultCode::Successful;
        let b = ResultCode::LinearSingular;
        assert_eq!(a.merge(b), ResultCode::LinearSingular);
        assert_eq!(b.merge(a), ResultCode::LinearSingular);
    }

    #[test]
    fn merge_never_upgrades() {
        let worst = ResultCode::NonlinearDivergence;
        assert_eq!(worst.merge(ResultCode::Successful), worst);
        assert_eq!(worst.merge(ResultCode::MaxStepsReached), worst);
    }
}
