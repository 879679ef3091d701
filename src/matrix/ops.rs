use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::matrix::vector::Vector;
use crate::traits::Scalar;
use crate::Matrix;

// ── Element-wise addition and subtraction (row by row) ─────────────

impl<T: Scalar, const R: usize, const C: usize> AddAssign for Matrix<T, R, C> {
    fn add_assign(&mut self, rhs: Self) {
        for (row, other) in self.rows.iter_mut().zip(rhs.rows.iter()) {
            *row += other;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign for Matrix<T, R, C> {
    fn sub_assign(&mut self, rhs: Self) {
        for (row, other) in self.rows.iter_mut().zip(rhs.rows.iter()) {
            *row -= other;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Add for Matrix<T, R, C> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> Sub for Matrix<T, R, C> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for Matrix<T, R, C> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            rows: self.rows.map(|r| -r),
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Neg for &Matrix<T, R, C> {
    type Output = Matrix<T, R, C>;

    fn neg(self) -> Matrix<T, R, C> {
        (*self).neg()
    }
}

impl<T: Scalar, const R: usize, const C: usize> AddAssign<&Matrix<T, R, C>> for Matrix<T, R, C> {
    fn add_assign(&mut self, rhs: &Matrix<T, R, C>) {
        self.add_assign(*rhs);
    }
}

impl<T: Scalar, const R: usize, const C: usize> SubAssign<&Matrix<T, R, C>> for Matrix<T, R, C> {
    fn sub_assign(&mut self, rhs: &Matrix<T, R, C>) {
        self.sub_assign(*rhs);
    }
}

// ── Matrix multiplication: (R×X) * (X×C) → (R×C) ──────────────────
// The operator always runs the naive kernel; policy-driven dispatch
// lives in `matmul_with`.

impl<T: Scalar, const R: usize, const X: usize, const C: usize> Mul<Matrix<T, X, C>>
    for Matrix<T, R, X>
{
    type Output = Matrix<T, R, C>;

    fn mul(self, rhs: Matrix<T, X, C>) -> Matrix<T, R, C> {
        self.matmul_naive(&rhs)
    }
}

impl<T: Scalar, const R: usize, const X: usize, const C: usize> Mul<Matrix<T, X, C>>
    for &Matrix<T, R, X>
{
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: Matrix<T, X, C>) -> Matrix<T, R, C> {
        self.matmul_naive(&rhs)
    }
}

impl<T: Scalar, const R: usize, const X: usize, const C: usize> Mul<&Matrix<T, X, C>>
    for Matrix<T, R, X>
{
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: &Matrix<T, X, C>) -> Matrix<T, R, C> {
        self.matmul_naive(rhs)
    }
}

impl<T: Scalar, const R: usize, const X: usize, const C: usize> Mul<&Matrix<T, X, C>>
    for &Matrix<T, R, X>
{
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: &Matrix<T, X, C>) -> Matrix<T, R, C> {
        self.matmul_naive(rhs)
    }
}

// ── Matrix-vector product: (R×C) * vec(C) → vec(R) ─────────────────

impl<T: Scalar, const R: usize, const C: usize> Mul<Vector<T, C>> for Matrix<T, R, C> {
    type Output = Vector<T, R>;

    fn mul(self, rhs: Vector<T, C>) -> Vector<T, R> {
        self.transform(&rhs)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Mul<&Vector<T, C>> for &Matrix<T, R, C> {
    type Output = Vector<T, R>;

    fn mul(self, rhs: &Vector<T, C>) -> Vector<T, R> {
        self.transform(rhs)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Mul<&Vector<T, C>> for Matrix<T, R, C> {
    type Output = Vector<T, R>;

    fn mul(self, rhs: &Vector<T, C>) -> Vector<T, R> {
        self.transform(rhs)
    }
}

// ── Scalar multiplication and division ──────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> MulAssign<T> for Matrix<T, R, C> {
    fn mul_assign(&mut self, rhs: T) {
        for row in self.rows.iter_mut() {
            *row *= rhs;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> DivAssign<T> for Matrix<T, R, C> {
    fn div_assign(&mut self, rhs: T) {
        for row in self.rows.iter_mut() {
            *row /= rhs;
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Mul<T> for Matrix<T, R, C> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

impl<T: Scalar, const R: usize, const C: usize> Div<T> for Matrix<T, R, C> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        self /= rhs;
        self
    }
}

// ── Reference variants for same-shape binary ops ────────────────────
// Matrix is Copy, so &Matrix ops just deref and delegate.

macro_rules! forward_ref_binop {
    ($Op:ident, $method:ident) => {
        impl<T: Scalar, const R: usize, const C: usize> $Op<Matrix<T, R, C>>
            for &Matrix<T, R, C>
        {
            type Output = Matrix<T, R, C>;
            fn $method(self, rhs: Matrix<T, R, C>) -> Matrix<T, R, C> {
                (*self).$method(rhs)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $Op<&Matrix<T, R, C>>
            for Matrix<T, R, C>
        {
            type Output = Matrix<T, R, C>;
            fn $method(self, rhs: &Matrix<T, R, C>) -> Matrix<T, R, C> {
                self.$method(*rhs)
            }
        }

        impl<T: Scalar, const R: usize, const C: usize> $Op<&Matrix<T, R, C>>
            for &Matrix<T, R, C>
        {
            type Output = Matrix<T, R, C>;
            fn $method(self, rhs: &Matrix<T, R, C>) -> Matrix<T, R, C> {
                (*self).$method(*rhs)
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);

impl<T: Scalar, const R: usize, const C: usize> Mul<T> for &Matrix<T, R, C> {
    type Output = Matrix<T, R, C>;
    fn mul(self, rhs: T) -> Matrix<T, R, C> {
        (*self).mul(rhs)
    }
}

impl<T: Scalar, const R: usize, const C: usize> Div<T> for &Matrix<T, R, C> {
    type Output = Matrix<T, R, C>;
    fn div(self, rhs: T) -> Matrix<T, R, C> {
        (*self).div(rhs)
    }
}

// ── scalar * matrix (concrete impls to avoid orphan rules) ──────────

macro_rules! impl_scalar_mul {
    ($($t:ty),*) => {
        $(
            impl<const R: usize, const C: usize> Mul<Matrix<$t, R, C>> for $t {
                type Output = Matrix<$t, R, C>;

                fn mul(self, rhs: Matrix<$t, R, C>) -> Matrix<$t, R, C> {
                    rhs * self
                }
            }

            impl<const R: usize, const C: usize> Mul<&Matrix<$t, R, C>> for $t {
                type Output = Matrix<$t, R, C>;

                fn mul(self, rhs: &Matrix<$t, R, C>) -> Matrix<$t, R, C> {
                    *rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul!(f32, f64, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Matrix-vector product: `A * v`, one dot product per row.
    pub fn transform(&self, v: &Vector<T, C>) -> Vector<T, R> {
        let mut out = Vector::<T, R>::zeros();
        for (i, row) in self.rows.iter().enumerate() {
            out[i] = row.dot(v);
        }
        out
    }

    /// Element-wise (Hadamard) product: `c[i][j] = a[i][j] * b[i][j]`.
    pub fn element_mul(&self, rhs: &Self) -> Self {
        let mut out = *self;
        for (row, other) in out.rows.iter_mut().zip(rhs.rows.iter()) {
            *row = row.element_mul(other);
        }
        out
    }

    /// Transpose: (R×C) → (C×R).
    pub fn transpose(&self) -> Matrix<T, C, R> {
        let mut out = Matrix::<T, C, R>::zeros();
        for i in 0..R {
            for j in 0..C {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);

        let c = a + b;
        assert_eq!(c, Matrix::new([[6.0, 8.0], [10.0, 12.0]]));

        let d = b - a;
        assert_eq!(d, Matrix::fill(4.0));
    }

    #[test]
    fn add_assign_sub_assign() {
        let mut a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);

        a += b;
        assert_eq!(a[(0, 0)], 6.0);

        a -= &b;
        assert_eq!(a[(0, 0)], 1.0);
    }

    #[test]
    fn negation() {
        let a = Matrix::new([[1.0, -2.0], [3.0, -4.0]]);
        let b = -a;
        assert_eq!(b, Matrix::new([[-1.0, 2.0], [-3.0, 4.0]]));
        assert_eq!(-&a, b);
    }

    #[test]
    fn matrix_multiply_rectangular() {
        // (3×4) * (4×2) → (3×2)
        let a = Matrix::new([[1, 2, 3, 4], [4, 5, 6, 1], [7, 8, 9, 0]]);
        let b = Matrix::new([[3, 4], [1, -1], [6, 1], [4, 5]]);
        let c = a * b;
        assert_eq!(c, Matrix::new([[39, 25], [57, 22], [83, 29]]));
    }

    #[test]
    fn matrix_vector() {
        let b = Matrix::new([[3.0, 4.0], [1.0, -1.0], [6.0, 1.0], [4.0, 5.0]]);
        let v = Vector::from_array([1.0, 1.0]);
        assert_eq!(b * v, Vector::from_array([7.0, 0.0, 7.0, 9.0]));
        assert_eq!(&b * &v, b.transform(&v));
    }

    #[test]
    fn matrix_vector_matches_column_matrix() {
        let a = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let v = Vector::from_array([7.0, 8.0, 9.0]);
        let as_col = a * v.as_column_matrix();
        assert_eq!(as_col[(0, 0)], 50.0);
        assert_eq!(as_col[(1, 0)], 122.0);
        assert_eq!(a * v, Vector::from_array([50.0, 122.0]));
    }

    #[test]
    fn scalar_multiply_and_divide() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);

        let b = a * 3.0;
        assert_eq!(b[(1, 1)], 12.0);
        assert_eq!(3.0 * a, b);
        assert_eq!(3.0 * &a, b);
        assert_eq!(&a * 3.0, b);

        assert_eq!(b / 3.0, a);
        assert_eq!(&b / 3.0, a);
    }

    #[test]
    fn compound_scalar_assign() {
        let mut a = Matrix::new([[2.0, 4.0], [6.0, 8.0]]);
        a /= 2.0;
        assert_eq!(a, Matrix::new([[1.0, 2.0], [3.0, 4.0]]));
        a *= 2.0;
        assert_eq!(a[(1, 1)], 8.0);
    }

    #[test]
    fn transpose() {
        let a = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let t = a.transpose();

        assert_eq!(t.nrows(), 3);
        assert_eq!(t.ncols(), 2);
        assert_eq!(t[(1, 0)], 2.0);
        assert_eq!(t[(2, 1)], 6.0);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn transpose_of_product() {
        let a = Matrix::new([[1, 2], [3, 4], [5, 6]]);
        let b = Matrix::new([[1, 0, 2], [0, 1, 3]]);
        assert_eq!((a * b).transpose(), b.transpose() * a.transpose());
    }

    #[test]
    fn ref_ops() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);

        assert_eq!(&a + b, a + b);
        assert_eq!(a + &b, a + b);
        assert_eq!(&b - &a, b - a);

        let expected = a * b;
        assert_eq!(&a * b, expected);
        assert_eq!(a * &b, expected);
        assert_eq!(&a * &b, expected);
    }

    #[test]
    fn identity_multiply() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let id: Matrix<f64, 2, 2> = Matrix::eye();
        assert_eq!(a * id, a);
        assert_eq!(id * a, a);
    }

    #[test]
    fn element_mul() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[5.0, 6.0], [7.0, 8.0]]);
        assert_eq!(a.element_mul(&b), Matrix::new([[5.0, 12.0], [21.0, 32.0]]));
    }
}
