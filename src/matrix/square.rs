use crate::matrix::vector::Vector;
use crate::traits::Scalar;
use crate::Matrix;

impl<T: Scalar, const N: usize> Matrix<T, N, N> {
    /// Create an identity matrix (square matrices only).
    pub fn eye() -> Self {
        Self::diagonal(T::one())
    }

    /// Alias for [`eye`](Self::eye).
    pub fn identity() -> Self {
        Self::eye()
    }

    /// Square matrix with `value` on the diagonal and zeros elsewhere.
    pub fn diagonal(value: T) -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m[(i, i)] = value;
        }
        m
    }

    /// Create a diagonal matrix from a vector.
    ///
    /// ```
    /// use kalmat::{Matrix, Vector};
    /// let d: Matrix<f64, 3, 3> = Matrix::from_diagonal(&Vector::from_array([1.0, 2.0, 3.0]));
    /// assert_eq!(d[(1, 1)], 2.0);
    /// assert_eq!(d[(0, 2)], 0.0);
    /// ```
    pub fn from_diagonal(v: &Vector<T, N>) -> Self {
        let mut m = Self::zeros();
        for i in 0..N {
            m[(i, i)] = v[i];
        }
        m
    }

    /// Extract the diagonal as a vector.
    pub fn diag(&self) -> Vector<T, N> {
        Vector::from_array(core::array::from_fn(|i| self[(i, i)]))
    }

    /// Sum of diagonal elements.
    pub fn trace(&self) -> T {
        let mut sum = T::zero();
        for i in 0..N {
            sum = sum + self[(i, i)];
        }
        sum
    }

    /// Check if the matrix is symmetric (A == A^T), exactly.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..N {
            for j in (i + 1)..N {
                if self[(i, j)] != self[(j, i)] {
                    return false;
                }
            }
        }
        true
    }

    /// Integer matrix power by recursive squaring.
    ///
    /// `pow(0)` is the identity and `pow(1)` is `self`; larger powers
    /// square the half power and multiply once more by `self` when `n`
    /// is odd, so only O(log n) products are formed.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let f = Matrix::new([[1_u64, 1], [1, 0]]);
    /// assert_eq!(f.pow(10)[(0, 1)], 55);
    /// ```
    pub fn pow(&self, n: u32) -> Self {
        match n {
            0 => Self::eye(),
            1 => *self,
            _ => {
                let half = self.pow(n / 2);
                let sq = half * half;
                if n % 2 == 1 {
                    sq * self
                } else {
                    sq
                }
            }
        }
    }

    /// Matrix power by `n` successive multiplications.
    ///
    /// Reference for [`pow`](Self::pow).
    pub fn pow_naive(&self, n: u32) -> Self {
        let mut result = Self::eye();
        for _ in 0..n {
            result = result * self;
        }
        result
    }
}
