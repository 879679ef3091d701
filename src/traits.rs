use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as vector and matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point elements.
///
/// Required by operations that divide or take square roots
/// (LU, inverse, row reduction, norms, Kalman filters).
pub trait FloatScalar: Scalar + Float {
    /// Absolute tolerance used by `approx_eq` on vectors and matrices.
    const DEFAULT_TOLERANCE: Self;

    /// Convert an `f64` literal into `Self`, rounding if needed.
    fn constant(value: f64) -> Self;
}

macro_rules! impl_float_scalar {
    ($($t:ty => $tol:expr),*) => {
        $(
            impl FloatScalar for $t {
                const DEFAULT_TOLERANCE: $t = $tol;

                #[inline]
                fn constant(value: f64) -> $t {
                    value as $t
                }
            }
        )*
    };
}

impl_float_scalar!(f32 => 1e-5, f64 => 1e-10);

/// Read-only access to a matrix-like type.
///
/// Lets kernels (naive multiply, Strassen) run over both fixed-size
/// `Matrix` values and internal scratch blocks.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}
