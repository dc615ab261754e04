//! Structural tags plus the polymorphic handle every linear solver dispatches
//! on, generalizing `newtonls-faer/src/linalg.rs`'s ad-hoc sparse/dense split
//! into a single trait with tag-driven dispatch (spec §4.1/§4.8).

use faer::Mat;

use crate::scalar::Scalar;

/// Structural hints about a linear operator, packed into a bitset the way
/// the original threads a frozen set of booleans alongside each operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tags(u16);

impl Tags {
    pub const NONE: Tags = Tags(0);
    pub const SYMMETRIC: Tags = Tags(1 << 0);
    pub const POSITIVE_SEMIDEFINITE: Tags = Tags(1 << 1);
    pub const NEGATIVE_SEMIDEFINITE: Tags = Tags(1 << 2);
    pub const DIAGONAL: Tags = Tags(1 << 3);
    pub const UNIT_DIAGONAL: Tags = Tags(1 << 4);
    pub const TRIDIAGONAL: Tags = Tags(1 << 5);
    pub const LOWER_TRIANGULAR: Tags = Tags(1 << 6);
    pub const UPPER_TRIANGULAR: Tags = Tags(1 << 7);
    pub const NONSINGULAR: Tags = Tags(1 << 8);

    pub const fn empty() -> Self {
        Tags(0)
    }

    pub const fn contains(self, other: Tags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Tags) -> Tags {
        Tags(self.0 | other.0)
    }

    /// Tags of the transposed operator: triangularity flips, everything
    /// else (symmetry, definiteness, bandedness, nonsingularity) survives.
    pub const fn transposed(self) -> Tags {
        let mut t = self.0 & !(Tags::LOWER_TRIANGULAR.0 | Tags::UPPER_TRIANGULAR.0);
        if self.contains(Tags::LOWER_TRIANGULAR) {
            t |= Tags::UPPER_TRIANGULAR.0;
        }
        if self.contains(Tags::UPPER_TRIANGULAR) {
            t |= Tags::LOWER_TRIANGULAR.0;
        }
        Tags(t)
    }
}

impl std::ops::BitOr for Tags {
    type Output = Tags;
    fn bitor(self, rhs: Tags) -> Tags {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Tags {
    fn bitor_assign(&mut self, rhs: Tags) {
        *self = self.union(rhs);
    }
}

/// A linear map from `R^in_size` to `R^out_size`, with enough structure
/// exposed (tags, and optionally banded storage) that a dispatcher can pick
/// a cheap factorization without ever densifying when it doesn't have to.
pub trait LinearOperator<T: Scalar> {
    fn in_size(&self) -> usize;
    fn out_size(&self) -> usize;
    fn mv(&self, v: &[T]) -> Vec<T>;
    fn tags(&self) -> Tags;

    /// Dense materialisation. May allocate; operators that are naturally
    /// dense (the common case in this crate, since no sparse backend is in
    /// scope) can return a clone of their storage directly.
    fn as_matrix(&self) -> Mat<T>;

    /// `Some((lower, diag, upper))` for operators that carry tridiagonal
    /// storage natively, letting `linear_solver::Tridiagonal` skip
    /// `as_matrix()` entirely.
    fn tridiagonal_bands(&self) -> Option<(Vec<T>, Vec<T>, Vec<T>)> {
        None
    }

    /// `Some(diag)` for operators that carry diagonal storage natively.
    fn diagonal(&self) -> Option<Vec<T>> {
        None
    }

    fn transpose(&self) -> MatrixOperator<T> {
        if self.tags().contains(Tags::SYMMETRIC) {
            MatrixOperator::new(self.as_matrix(), self.tags())
        } else {
            let m = self.as_matrix();
            let t = Mat::from_fn(m.ncols(), m.nrows(), |i, j| m[(j, i)]);
            MatrixOperator::new(t, self.tags().transposed())
        }
    }
}

/// A plain dense matrix operator: the default shape a Jacobian or Hessian
/// approximation takes once the caller-supplied derivative callback has
/// been evaluated (this crate has no automatic differentiation, see
/// SPEC_FULL.md §12; derivatives always arrive already materialised).
pub struct MatrixOperator<T: Scalar> {
    matrix: Mat<T>,
    tags: Tags,
}

impl<T: Scalar> MatrixOperator<T> {
    pub fn new(matrix: Mat<T>, tags: Tags) -> Self {
        Self { matrix, tags }
    }

    pub fn square_identity(n: usize) -> Self {
        let matrix = Mat::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() });
        Self::new(matrix, Tags::SYMMETRIC | Tags::POSITIVE_SEMIDEFINITE | Tags::NONSINGULAR | Tags::DIAGONAL | Tags::UNIT_DIAGONAL)
    }
}

impl<T: Scalar> LinearOperator<T> for MatrixOperator<T> {
    fn in_size(&self) -> usize {
        self.matrix.ncols()
    }

    fn out_size(&self) -> usize {
        self.matrix.nrows()
    }

    fn mv(&self, v: &[T]) -> Vec<T> {
        (0..self.matrix.nrows())
            .map(|i| {
                (0..self.matrix.ncols())
                    .fold(T::zero(), |acc, j| acc + self.matrix[(i, j)] * v[j])
            })
            .collect()
    }

    fn tags(&self) -> Tags {
        self.tags
    }

    fn as_matrix(&self) -> Mat<T> {
        self.matrix.clone()
    }
}

/// Diagonal operator with native storage, used both as a cheap
/// preconditioner-like building block and as the target of
/// `linear_solver::Diagonal`.
pub struct DiagonalOperator<T: Scalar> {
    diag: Vec<T>,
}

impl<T: Scalar> DiagonalOperator<T> {
    pub fn new(diag: Vec<T>) -> Self {
        Self { diag }
    }
}

impl<T: Scalar> LinearOperator<T> for DiagonalOperator<T> {
    fn in_size(&self) -> usize {
        self.diag.len()
    }

    fn out_size(&self) -> usize {
        self.diag.len()
    }

    fn mv(&self, v: &[T]) -> Vec<T> {
        self.diag.iter().zip(v).map(|(&d, &x)| d * x).collect()
    }

    fn tags(&self) -> Tags {
        let mut tags = Tags::SYMMETRIC | Tags::DIAGONAL;
        if self.diag.iter().all(|&d| d != T::zero()) {
            tags |= Tags::NONSINGULAR;
        }
        tags
    }

    fn as_matrix(&self) -> Mat<T> {
        let n = self.diag.len();
        Mat::from_fn(n, n, |i, j| if i == j { self.diag[i] } else { T::zero() })
    }

    fn diagonal(&self) -> Option<Vec<T>> {
        Some(self.diag.clone())
    }

    fn transpose(&self) -> MatrixOperator<T> {
        MatrixOperator::new(self.as_matrix(), self.tags())
    }
}

/// Tridiagonal operator with native banded storage (`lower[i]` multiplies
/// `x[i-1]`, `upper[i]` multiplies `x[i+1]`; `lower[0]` and `upper[n-1]`
/// are unused padding so all three slices share length `n`).
pub struct TridiagonalOperator<T: Scalar> {
    lower: Vec<T>,
    diag: Vec<T>,
    upper: Vec<T>,
}

impl<T: Scalar> TridiagonalOperator<T> {
    pub fn new(lower: Vec<T>, diag: Vec<T>, upper: Vec<T>) -> Self {
        assert_eq!(lower.len(), diag.len());
        assert_eq!(upper.len(), diag.len());
        Self { lower, diag, upper }
    }
}

impl<T: Scalar> LinearOperator<T> for TridiagonalOperator<T> {
    fn in_size(&self) -> usize {
        self.diag.len()
    }

    fn out_size(&self) -> usize {
        self.diag.len()
    }

    fn mv(&self, v: &[T]) -> Vec<T> {
        let n = self.diag.len();
        (0..n)
            .map(|i| {
                let mut acc = self.diag[i] * v[i];
                if i > 0 {
                    acc = acc + self.lower[i] * v[i - 1];
                }
                if i + 1 < n {
                    acc = acc + self.upper[i] * v[i + 1];
                }
                acc
            })
            .collect()
    }

    fn tags(&self) -> Tags {
        Tags::TRIDIAGONAL
    }

    fn as_matrix(&self) -> Mat<T> {
        let n = self.diag.len();
        Mat::from_fn(n, n, |i, j| {
            if i == j {
                self.diag[i]
            } else if j + 1 == i {
                self.lower[i]
            } else if i + 1 == j {
                self.upper[i]
            } else {
                T::zero()
            }
        })
    }

    fn tridiagonal_bands(&self) -> Option<(Vec<T>, Vec<T>, Vec<T>)> {
        Some((self.lower.clone(), self.diag.clone(), self.upper.clone()))
    }
}
