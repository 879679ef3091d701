use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::{FloatScalar, Scalar};
use crate::Matrix;

/// Fixed-length numeric vector.
///
/// The length `N` is part of the type, so vector-vector arithmetic with
/// mismatched lengths does not compile. Storage is an inline `[T; N]`.
///
/// # Examples
///
/// ```
/// use kalmat::Vector;
///
/// let v = Vector::from_array([3.0_f64, 4.0]);
/// assert_eq!(v[0], 3.0);
/// assert_eq!(v.dot(&v), 25.0);
/// assert!((v.norm() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize> {
    pub(crate) data: [T; N],
}

impl<T, const N: usize> Vector<T, N> {
    /// Create a vector from a 1D array.
    #[inline]
    pub const fn from_array(data: [T; N]) -> Self {
        Self { data }
    }

    /// Number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// `true` for the zero-length vector.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Borrow the backing array.
    #[inline]
    pub fn as_array(&self) -> &[T; N] {
        &self.data
    }

    /// Borrow the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over the elements.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Bounds-checked element access; `None` when `i >= N`.
    #[inline]
    pub fn get_checked(&self, i: usize) -> Option<&T> {
        self.data.get(i)
    }

    /// Consume the vector, returning the backing array.
    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.data
    }
}

impl<T: Scalar, const N: usize> Vector<T, N> {
    /// Vector of zeros.
    #[inline]
    pub fn zeros() -> Self {
        Self::fill(T::zero())
    }

    /// Vector of ones.
    #[inline]
    pub fn ones() -> Self {
        Self::fill(T::one())
    }

    /// Vector with every element set to `value`.
    #[inline]
    pub fn fill(value: T) -> Self {
        Self { data: [value; N] }
    }

    /// Dot (inner) product.
    ///
    /// ```
    /// use kalmat::Vector;
    /// let a = Vector::from_array([1.0, 2.0, 3.0]);
    /// let b = Vector::from_array([4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self.data[i] * rhs.data[i];
        }
        sum
    }

    /// Squared L2 norm. No sqrt, works with integers.
    #[inline]
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T {
        let mut s = T::zero();
        for x in &self.data {
            s = s + *x;
        }
        s
    }

    /// Outer product: `v.outer(w)` → N×P matrix where `result[(i, j)] = v[i] * w[j]`.
    ///
    /// ```
    /// use kalmat::Vector;
    /// let a = Vector::from_array([1.0, 2.0]);
    /// let b = Vector::from_array([3.0, 4.0, 5.0]);
    /// let m = a.outer(&b);
    /// assert_eq!(m[(0, 0)], 3.0);
    /// assert_eq!(m[(1, 2)], 10.0);
    /// ```
    pub fn outer<const P: usize>(&self, rhs: &Vector<T, P>) -> Matrix<T, N, P> {
        let mut out = Matrix::<T, N, P>::zeros();
        for i in 0..N {
            for j in 0..P {
                out[(i, j)] = self.data[i] * rhs.data[j];
            }
        }
        out
    }

    /// Extract the `P` elements starting at `FROM`.
    ///
    /// The range is checked at compile time.
    ///
    /// ```
    /// use kalmat::Vector;
    /// let v = Vector::from_array([10, 20, 30, 40, 50]);
    /// let s: Vector<i32, 2> = v.slice::<1, 2>();
    /// assert_eq!(s.into_array(), [20, 30]);
    /// ```
    pub fn slice<const FROM: usize, const P: usize>(&self) -> Vector<T, P> {
        const { assert!(FROM + P <= N, "vector slice out of range") };
        let mut out = Vector::<T, P>::zeros();
        for i in 0..P {
            out.data[i] = self.data[FROM + i];
        }
        out
    }

    /// Write `src` into `self` starting at `FROM`, checked at compile time.
    pub fn insert<const FROM: usize, const P: usize>(&mut self, src: &Vector<T, P>) {
        const { assert!(FROM + P <= N, "vector insert out of range") };
        for i in 0..P {
            self.data[FROM + i] = src.data[i];
        }
    }

    /// Extract the first P elements.
    pub fn head<const P: usize>(&self) -> Vector<T, P> {
        self.slice::<0, P>()
    }

    /// Extract the last P elements.
    pub fn tail<const P: usize>(&self) -> Vector<T, P> {
        const { assert!(P <= N, "vector tail out of range") };
        self.segment(N - P)
    }

    /// Extract P elements starting at runtime index `i`.
    ///
    /// Panics if the segment extends beyond the vector.
    pub fn segment<const P: usize>(&self, i: usize) -> Vector<T, P> {
        assert!(i + P <= N, "segment ({i}) length {P} out of bounds for length {N}");
        let mut out = Vector::<T, P>::zeros();
        for k in 0..P {
            out.data[k] = self.data[i + k];
        }
        out
    }

    /// View as a 1×N row matrix.
    pub fn as_row_matrix(&self) -> Matrix<T, 1, N> {
        Matrix::from_rows([*self])
    }

    /// View as an N×1 column matrix.
    pub fn as_column_matrix(&self) -> Matrix<T, N, 1> {
        Matrix::from_fn(|i, _| self.data[i])
    }

    /// Element-wise (Hadamard) product.
    pub fn element_mul(&self, rhs: &Self) -> Self {
        let mut out = *self;
        for i in 0..N {
            out.data[i] = self.data[i] * rhs.data[i];
        }
        out
    }
}

impl<T: FloatScalar, const N: usize> Vector<T, N> {
    /// L2 (Euclidean) norm.
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Return a unit vector in the same direction.
    ///
    /// Not guarded: the zero vector yields non-finite components.
    pub fn normalize(&self) -> Self {
        *self / self.norm()
    }

    /// `true` if every element differs from `other` by at most `tol`.
    ///
    /// ```
    /// use kalmat::Vector;
    /// let a = Vector::from_array([1.0, 2.0]);
    /// let b = Vector::from_array([1.0 + 1e-12, 2.0]);
    /// assert!(a.float_equals(&b, 1e-10));
    /// assert!(a != b);
    /// ```
    pub fn float_equals(&self, other: &Self, tol: T) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (*a - *b).abs() <= tol)
    }

    /// `float_equals` with [`FloatScalar::DEFAULT_TOLERANCE`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.float_equals(other, T::DEFAULT_TOLERANCE)
    }

    /// `true` if no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

impl<T: Scalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(data: [T; N]) -> Self {
        Self { data }
    }
}

// ── Indexing ────────────────────────────────────────────────────────

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Vector<T, N> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

// ── Element-wise arithmetic ─────────────────────────────────────────

impl<T: Scalar, const N: usize> AddAssign for Vector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.data[i] = self.data[i] + rhs.data[i];
        }
    }
}

impl<T: Scalar, const N: usize> SubAssign for Vector<T, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.data[i] = self.data[i] - rhs.data[i];
        }
    }
}

impl<T: Scalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T: Scalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T: Scalar, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        let mut out = self;
        for x in out.data.iter_mut() {
            *x = T::zero() - *x;
        }
        out
    }
}

impl<T: Scalar, const N: usize> MulAssign<T> for Vector<T, N> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar, const N: usize> DivAssign<T> for Vector<T, N> {
    fn div_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x / rhs;
        }
    }
}

impl<T: Scalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

impl<T: Scalar, const N: usize> Div<T> for Vector<T, N> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        self /= rhs;
        self
    }
}

// Vector is Copy, so &Vector ops just deref and delegate.

macro_rules! forward_ref_binop {
    ($Op:ident, $method:ident) => {
        impl<T: Scalar, const N: usize> $Op<Vector<T, N>> for &Vector<T, N> {
            type Output = Vector<T, N>;
            fn $method(self, rhs: Vector<T, N>) -> Vector<T, N> {
                (*self).$method(rhs)
            }
        }

        impl<T: Scalar, const N: usize> $Op<&Vector<T, N>> for Vector<T, N> {
            type Output = Vector<T, N>;
            fn $method(self, rhs: &Vector<T, N>) -> Vector<T, N> {
                self.$method(*rhs)
            }
        }

        impl<T: Scalar, const N: usize> $Op<&Vector<T, N>> for &Vector<T, N> {
            type Output = Vector<T, N>;
            fn $method(self, rhs: &Vector<T, N>) -> Vector<T, N> {
                (*self).$method(*rhs)
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);

impl<T: Scalar, const N: usize> AddAssign<&Vector<T, N>> for Vector<T, N> {
    fn add_assign(&mut self, rhs: &Vector<T, N>) {
        self.add_assign(*rhs);
    }
}

impl<T: Scalar, const N: usize> SubAssign<&Vector<T, N>> for Vector<T, N> {
    fn sub_assign(&mut self, rhs: &Vector<T, N>) {
        self.sub_assign(*rhs);
    }
}

impl<T: Scalar, const N: usize> Neg for &Vector<T, N> {
    type Output = Vector<T, N>;

    fn neg(self) -> Vector<T, N> {
        (*self).neg()
    }
}

impl<T: Scalar, const N: usize> Mul<T> for &Vector<T, N> {
    type Output = Vector<T, N>;

    fn mul(self, rhs: T) -> Vector<T, N> {
        (*self).mul(rhs)
    }
}

impl<T: Scalar, const N: usize> Div<T> for &Vector<T, N> {
    type Output = Vector<T, N>;

    fn div(self, rhs: T) -> Vector<T, N> {
        (*self).div(rhs)
    }
}

// ── scalar * vector (concrete impls to avoid orphan rules) ──────────

macro_rules! impl_scalar_mul {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> Mul<Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                fn mul(self, rhs: Vector<$t, N>) -> Vector<$t, N> {
                    rhs * self
                }
            }

            impl<const N: usize> Mul<&Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                fn mul(self, rhs: &Vector<$t, N>) -> Vector<$t, N> {
                    *rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul!(f32, f64, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_array_and_index() {
        let v = Vector::from_array([1.0, 2.0, 3.0]);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 2.0);
        assert_eq!(v[2], 3.0);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn index_mut() {
        let mut v = Vector::<f64, 3>::zeros();
        v[1] = 5.0;
        assert_eq!(v[1], 5.0);
    }

    #[test]
    fn checked_access() {
        let v = Vector::from_array([1, 2]);
        assert_eq!(v.get_checked(1), Some(&2));
        assert_eq!(v.get_checked(2), None);
    }

    #[test]
    #[should_panic]
    fn unchecked_access_panics() {
        let v = Vector::from_array([1, 2]);
        let i = v.len();
        let _ = v[i];
    }

    #[test]
    fn fill_and_ones() {
        let v = Vector::<f64, 4>::fill(7.0);
        assert!(v.iter().all(|&x| x == 7.0));
        assert_eq!(Vector::<i32, 3>::ones().sum(), 3);
    }

    #[test]
    fn arithmetic() {
        let a = Vector::from_array([1.0, 2.0, 3.0]);
        let b = Vector::from_array([4.0, 5.0, 6.0]);

        assert_eq!(a + b, Vector::from_array([5.0, 7.0, 9.0]));
        assert_eq!(b - a, Vector::from_array([3.0, 3.0, 3.0]));
        assert_eq!(a * 2.0, Vector::from_array([2.0, 4.0, 6.0]));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vector::from_array([2.0, 2.5, 3.0]));
        assert_eq!(-a, Vector::from_array([-1.0, -2.0, -3.0]));
    }

    #[test]
    fn compound_assignment() {
        let mut a = Vector::from_array([1.0, 2.0]);
        let b = Vector::from_array([0.5, 0.5]);
        a += b;
        assert_eq!(a, Vector::from_array([1.5, 2.5]));
        a -= &b;
        assert_eq!(a, Vector::from_array([1.0, 2.0]));
        a *= 4.0;
        a /= 2.0;
        assert_eq!(a, Vector::from_array([2.0, 4.0]));
    }

    #[test]
    fn ref_ops() {
        let a = Vector::from_array([1.0, 2.0]);
        let b = Vector::from_array([3.0, 5.0]);
        assert_eq!(&a + &b, a + b);
        assert_eq!(&b - a, b - a);
        assert_eq!(&a * 3.0, a * 3.0);
        assert_eq!(-&a, -a);
    }

    #[test]
    fn dot_and_norm() {
        let a = Vector::from_array([1.0, 2.0, 3.0]);
        let b = Vector::from_array([4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);

        let v = Vector::from_array([3.0_f64, 4.0]);
        assert_eq!(v.norm_squared(), 25.0);
        assert!((v.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalize() {
        let v = Vector::from_array([3.0_f64, 0.0, 4.0]);
        let u = v.normalize();
        assert!((u.norm() - 1.0).abs() < 1e-12);
        assert!(u.approx_eq(&Vector::from_array([0.6, 0.0, 0.8])));
    }

    #[test]
    fn normalize_zero_is_not_finite() {
        let v = Vector::<f64, 2>::zeros();
        assert!(!v.normalize().is_finite());
    }

    #[test]
    fn outer_product() {
        let a = Vector::from_array([1.0, 2.0, 3.0]);
        let b = Vector::from_array([4.0, 5.0]);
        let m = a.outer(&b);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m[(0, 0)], 4.0);
        assert_eq!(m[(1, 0)], 8.0);
        assert_eq!(m[(2, 1)], 15.0);
    }

    #[test]
    fn outer_product_self_is_symmetric() {
        let v = Vector::from_array([1.0, -2.0, 0.5]);
        assert!(v.outer(&v).is_symmetric());
    }

    #[test]
    fn slicing() {
        let v = Vector::from_array([10, 20, 30, 40, 50]);
        let s: Vector<i32, 3> = v.slice::<2, 3>();
        assert_eq!(s.into_array(), [30, 40, 50]);

        let h: Vector<i32, 2> = v.head();
        assert_eq!(h.into_array(), [10, 20]);

        let t: Vector<i32, 2> = v.tail();
        assert_eq!(t.into_array(), [40, 50]);

        let m: Vector<i32, 3> = v.segment(1);
        assert_eq!(m.into_array(), [20, 30, 40]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn segment_out_of_bounds() {
        let v = Vector::from_array([10, 20, 30]);
        let _: Vector<i32, 2> = v.segment(2);
    }

    #[test]
    fn insert_sub_vector() {
        let mut v = Vector::<i32, 4>::zeros();
        v.insert::<1, 2>(&Vector::from_array([7, 8]));
        assert_eq!(v.into_array(), [0, 7, 8, 0]);
    }

    #[test]
    fn float_equals_threshold() {
        let a = Vector::from_array([1.0, 2.0]);
        let b = Vector::from_array([1.0005, 2.0]);
        assert!(a.float_equals(&b, 1e-3));
        assert!(!a.float_equals(&b, 1e-4));
        assert!(!a.approx_eq(&b));
    }

    #[test]
    fn row_and_column_matrices() {
        let v = Vector::from_array([1.0, 2.0, 3.0]);
        let r = v.as_row_matrix();
        let c = v.as_column_matrix();
        assert_eq!(r.transpose(), c);
        assert_eq!(c[(2, 0)], 3.0);
    }

    #[test]
    fn display() {
        let v = Vector::from_array([1, 2, 3]);
        assert_eq!(format!("{v}"), "[1, 2, 3]");
    }
}
