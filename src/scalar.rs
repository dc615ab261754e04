use faer_traits::ComplexField;
use num_traits::Float;

/// The real scalar type every solver in this crate is generic over.
///
/// Bundles the handful of bounds (`faer`'s `ComplexField` restricted to
/// real-only, plus `num_traits::Float` for transcendental functions) that
/// show up on almost every public item, the same way `newton_faer`'s
/// `NewtonCfg<T>` does.
pub trait Scalar: ComplexField<Real = Self> + Float {}

impl<T: ComplexField<Real = T> + Float> Scalar for T {}
