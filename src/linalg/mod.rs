//! Square-matrix algebra: LU factorisation, determinant, inverse, row
//! reduction and multiplication strategies.
//!
//! Everything here is also reachable as a method on [`Matrix`]; the free
//! functions mirror the usual mathematical notation.
//!
//! ```
//! use kalmat::Matrix;
//! use kalmat::linalg::{det, inv, tr};
//!
//! let c = Matrix::new([[2.0_f64, 0.0, 2.0], [0.0, 4.0, 2.0], [2.0, 2.0, 2.0]]);
//! assert_eq!(det(&c), -8.0);
//! assert_eq!(tr(&c), 8.0);
//! let ci = inv(&c).unwrap();
//! assert!((c * ci).approx_eq(&Matrix::eye()));
//! ```

pub(crate) mod lu;
pub(crate) mod matmul;
pub(crate) mod rre;

pub use lu::LuDecomposition;
pub use matmul::{select_strategy, MatmulPolicy, MatmulStrategy};

use crate::traits::{FloatScalar, Scalar};
use crate::Matrix;

/// Errors from linear algebra operations.
///
/// Returned by [`Matrix::lu`] and [`Matrix::inv`]. There is no
/// tolerance-based singularity test: only an exactly zero pivot is
/// rejected, and anything that slips through is caught as `NonFinite`.
///
/// ```
/// use kalmat::Matrix;
/// use kalmat::linalg::LinalgError;
///
/// let singular = Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]);
/// assert_eq!(singular.inv().unwrap_err(), LinalgError::ZeroPivot { index: 1 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Doolittle elimination met an exactly zero diagonal entry of U.
    ///
    /// Singular matrices end up here, and so do nonsingular matrices
    /// that would need a row exchange (no pivoting is performed).
    ZeroPivot {
        /// Row/column of the zero pivot.
        index: usize,
    },
    /// The result contains NaN or infinity.
    NonFinite,
}

impl core::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinalgError::ZeroPivot { index } => write!(f, "zero pivot at index {index}"),
            LinalgError::NonFinite => write!(f, "result is not finite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LinalgError {}

/// Determinant; see [`Matrix::det`].
pub fn det<T: FloatScalar, const N: usize>(a: &Matrix<T, N, N>) -> T {
    a.det()
}

/// Trace (sum of the diagonal).
pub fn tr<T: Scalar, const N: usize>(a: &Matrix<T, N, N>) -> T {
    a.trace()
}

/// Inverse; see [`Matrix::inv`].
pub fn inv<T: FloatScalar, const N: usize>(
    a: &Matrix<T, N, N>,
) -> Result<Matrix<T, N, N>, LinalgError> {
    a.inv()
}

/// Reduced row echelon form; see [`Matrix::rre`].
pub fn rre<T: FloatScalar, const R: usize, const C: usize>(a: &Matrix<T, R, C>) -> Matrix<T, R, C> {
    a.rre()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            format!("{}", LinalgError::ZeroPivot { index: 2 }),
            "zero pivot at index 2"
        );
        assert_eq!(format!("{}", LinalgError::NonFinite), "result is not finite");
    }

    #[test]
    fn free_functions_match_methods() {
        let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
        assert_eq!(det(&a), a.det());
        assert_eq!(tr(&a), 10.0);
        assert_eq!(inv(&a), a.inv());
        assert_eq!(rre(&a), Matrix::eye());
    }
}
