use crate::traits::{MatrixMut, MatrixRef, Scalar};
use crate::Matrix;

/// Multiplication kernel chosen by [`select_strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatmulStrategy {
    /// Triple loop, `O(r·x·c)`.
    Naive,
    /// Strassen's seven-product recursion on power-of-two padded operands.
    DivideAndConquer,
}

/// Settings for [`Matrix::matmul_with`].
///
/// ```
/// use kalmat::linalg::MatmulPolicy;
/// assert_eq!(MatmulPolicy::default().threshold, 1024 * 1024);
/// let eager = MatmulPolicy { threshold: 64 };
/// assert_eq!(eager.threshold, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulPolicy {
    /// Element count at which divide-and-conquer takes over. Compared
    /// against the larger operand's `rows * cols`.
    pub threshold: usize,
}

impl MatmulPolicy {
    /// Default threshold, `1024²` elements.
    pub const DEFAULT_THRESHOLD: usize = 1024 * 1024;
}

impl Default for MatmulPolicy {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

/// Pick a kernel for `(ra × ca) · (rb × cb)`.
///
/// Divide-and-conquer only when no dimension of either operand is 1 and
/// the larger operand has at least `threshold` elements.
///
/// ```
/// use kalmat::linalg::{select_strategy, MatmulStrategy};
/// assert_eq!(select_strategy((4, 4), (4, 4), 16), MatmulStrategy::DivideAndConquer);
/// assert_eq!(select_strategy((4, 4), (4, 4), 17), MatmulStrategy::Naive);
/// assert_eq!(select_strategy((64, 64), (64, 1), 16), MatmulStrategy::Naive);
/// ```
pub fn select_strategy(
    (ra, ca): (usize, usize),
    (rb, cb): (usize, usize),
    threshold: usize,
) -> MatmulStrategy {
    let has_unit_dim = ra == 1 || ca == 1 || rb == 1 || cb == 1;
    let strategy = if !has_unit_dim && (ra * ca).max(rb * cb) >= threshold {
        MatmulStrategy::DivideAndConquer
    } else {
        MatmulStrategy::Naive
    };
    log::trace!("matmul {ra}x{ca} * {rb}x{cb} (threshold {threshold}): {strategy:?}");
    strategy
}

/// `out = a * b` with the triple loop. `out` must already have the
/// product's shape.
fn naive_into<T: Scalar>(a: &impl MatrixRef<T>, b: &impl MatrixRef<T>, out: &mut impl MatrixMut<T>) {
    for i in 0..a.nrows() {
        for j in 0..b.ncols() {
            let mut sum = T::zero();
            for k in 0..a.ncols() {
                sum = sum + *a.get(i, k) * *b.get(k, j);
            }
            *out.get_mut(i, j) = sum;
        }
    }
}

impl<T: Scalar, const R: usize, const X: usize> Matrix<T, R, X> {
    /// Reference product `self * rhs`; the kernel behind the `*` operator.
    pub fn matmul_naive<const C: usize>(&self, rhs: &Matrix<T, X, C>) -> Matrix<T, R, C> {
        let mut out = Matrix::<T, R, C>::zeros();
        naive_into(self, rhs, &mut out);
        out
    }

    /// Product `self * rhs` with the kernel chosen by `policy`.
    ///
    /// Without the `alloc` feature the divide-and-conquer kernel is not
    /// available and the naive kernel is used instead.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// use kalmat::linalg::MatmulPolicy;
    ///
    /// let a: Matrix<i64, 6, 5> = Matrix::from_fn(|i, j| (i * 5 + j) as i64 - 7);
    /// let b: Matrix<i64, 5, 7> = Matrix::from_fn(|i, j| (i as i64 - j as i64) * 3);
    /// let policy = MatmulPolicy { threshold: 4 };
    /// assert_eq!(a.matmul_with(&b, &policy), a * b);
    /// ```
    pub fn matmul_with<const C: usize>(
        &self,
        rhs: &Matrix<T, X, C>,
        policy: &MatmulPolicy,
    ) -> Matrix<T, R, C> {
        match select_strategy((R, X), (X, C), policy.threshold) {
            MatmulStrategy::Naive => self.matmul_naive(rhs),
            MatmulStrategy::DivideAndConquer => divide_and_conquer(self, rhs, policy.threshold),
        }
    }
}

#[cfg(feature = "alloc")]
fn divide_and_conquer<T: Scalar, const R: usize, const X: usize, const C: usize>(
    a: &Matrix<T, R, X>,
    b: &Matrix<T, X, C>,
    threshold: usize,
) -> Matrix<T, R, C> {
    let product = strassen::multiply(&strassen::Block::copy_of(a), &strassen::Block::copy_of(b), threshold);
    Matrix::from_fn(|i, j| *product.get(i, j))
}

#[cfg(not(feature = "alloc"))]
fn divide_and_conquer<T: Scalar, const R: usize, const X: usize, const C: usize>(
    a: &Matrix<T, R, X>,
    b: &Matrix<T, X, C>,
    _threshold: usize,
) -> Matrix<T, R, C> {
    a.matmul_naive(b)
}

#[cfg(feature = "alloc")]
mod strassen {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{naive_into, select_strategy, MatmulStrategy};
    use crate::traits::{MatrixMut, MatrixRef, Scalar};

    /// Row-major heap scratch matrix for the recursion.
    #[derive(Debug, Clone, PartialEq)]
    pub(super) struct Block<T> {
        rows: usize,
        cols: usize,
        data: Vec<T>,
    }

    impl<T: Scalar> Block<T> {
        fn zeros(rows: usize, cols: usize) -> Self {
            Self {
                rows,
                cols,
                data: vec![T::zero(); rows * cols],
            }
        }

        pub(super) fn copy_of(m: &impl MatrixRef<T>) -> Self {
            Self::padded(m, m.nrows(), m.ncols())
        }

        /// Copy of `m` zero-extended to `rows × cols`.
        fn padded(m: &impl MatrixRef<T>, rows: usize, cols: usize) -> Self {
            let mut out = Self::zeros(rows, cols);
            for i in 0..m.nrows() {
                for j in 0..m.ncols() {
                    *out.get_mut(i, j) = *m.get(i, j);
                }
            }
            out
        }

        /// Copy of the `rows × cols` region starting at `(r0, c0)`.
        fn region(&self, r0: usize, c0: usize, rows: usize, cols: usize) -> Self {
            let mut out = Self::zeros(rows, cols);
            for i in 0..rows {
                for j in 0..cols {
                    *out.get_mut(i, j) = *self.get(r0 + i, c0 + j);
                }
            }
            out
        }

        fn set_region(&mut self, r0: usize, c0: usize, src: &Self) {
            for i in 0..src.rows {
                for j in 0..src.cols {
                    *self.get_mut(r0 + i, c0 + j) = *src.get(i, j);
                }
            }
        }

        fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Self {
            debug_assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols));
            Self {
                rows: self.rows,
                cols: self.cols,
                data: self
                    .data
                    .iter()
                    .zip(rhs.data.iter())
                    .map(|(&x, &y)| f(x, y))
                    .collect(),
            }
        }

        fn add(&self, rhs: &Self) -> Self {
            self.zip_with(rhs, |x, y| x + y)
        }

        fn sub(&self, rhs: &Self) -> Self {
            self.zip_with(rhs, |x, y| x - y)
        }

        /// The four equal quadrants `(11, 12, 21, 22)` of an even-sized block.
        fn quadrants(&self) -> [Self; 4] {
            let (h, w) = (self.rows / 2, self.cols / 2);
            [
                self.region(0, 0, h, w),
                self.region(0, w, h, w),
                self.region(h, 0, h, w),
                self.region(h, w, h, w),
            ]
        }
    }

    impl<T> MatrixRef<T> for Block<T> {
        fn nrows(&self) -> usize {
            self.rows
        }

        fn ncols(&self) -> usize {
            self.cols
        }

        fn get(&self, row: usize, col: usize) -> &T {
            &self.data[row * self.cols + col]
        }
    }

    impl<T> MatrixMut<T> for Block<T> {
        fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
            &mut self.data[row * self.cols + col]
        }
    }

    /// Product of two blocks, each sub-product dispatched again through
    /// [`select_strategy`].
    fn dispatch<T: Scalar>(a: &Block<T>, b: &Block<T>, threshold: usize) -> Block<T> {
        match select_strategy((a.rows, a.cols), (b.rows, b.cols), threshold) {
            MatmulStrategy::Naive => {
                let mut out = Block::zeros(a.rows, b.cols);
                naive_into(a, b, &mut out);
                out
            }
            MatmulStrategy::DivideAndConquer => multiply(a, b, threshold),
        }
    }

    /// One Strassen level: pad to powers of two, seven half-size
    /// products, recombine, crop.
    pub(super) fn multiply<T: Scalar>(a: &Block<T>, b: &Block<T>, threshold: usize) -> Block<T> {
        debug_assert_eq!(a.cols, b.rows);
        let rows = a.rows.next_power_of_two();
        let inner = a.cols.next_power_of_two();
        let cols = b.cols.next_power_of_two();

        let [a11, a12, a21, a22] = Block::padded(a, rows, inner).quadrants();
        let [b11, b12, b21, b22] = Block::padded(b, inner, cols).quadrants();

        let m1 = dispatch(&a11.add(&a22), &b11.add(&b22), threshold);
        let m2 = dispatch(&a21.add(&a22), &b11, threshold);
        let m3 = dispatch(&a11, &b12.sub(&b22), threshold);
        let m4 = dispatch(&a22, &b21.sub(&b11), threshold);
        let m5 = dispatch(&a11.add(&a12), &b22, threshold);
        let m6 = dispatch(&a21.sub(&a11), &b11.add(&b12), threshold);
        let m7 = dispatch(&a12.sub(&a22), &b21.add(&b22), threshold);

        let c11 = m1.add(&m4).sub(&m5).add(&m7);
        let c12 = m3.add(&m5);
        let c21 = m2.add(&m4);
        let c22 = m1.sub(&m2).add(&m3).add(&m6);

        let (h, w) = (rows / 2, cols / 2);
        let mut full = Block::zeros(rows, cols);
        full.set_region(0, 0, &c11);
        full.set_region(0, w, &c12);
        full.set_region(h, 0, &c21);
        full.set_region(h, w, &c22);

        full.region(0, 0, a.rows, b.cols)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold() {
        assert_eq!(MatmulPolicy::default().threshold, 1_048_576);
    }

    #[test]
    fn strategy_boundary_is_inclusive() {
        assert_eq!(
            select_strategy((32, 32), (32, 32), 1024),
            MatmulStrategy::DivideAndConquer
        );
        assert_eq!(select_strategy((32, 32), (32, 32), 1025), MatmulStrategy::Naive);
    }

    #[test]
    fn strategy_uses_larger_operand() {
        assert_eq!(
            select_strategy((2, 4), (4, 64), 256),
            MatmulStrategy::DivideAndConquer
        );
        assert_eq!(select_strategy((2, 4), (4, 63), 256), MatmulStrategy::Naive);
    }

    #[test]
    fn strategy_rejects_unit_dimensions() {
        assert_eq!(select_strategy((1, 100), (100, 100), 0), MatmulStrategy::Naive);
        assert_eq!(select_strategy((100, 1), (1, 100), 0), MatmulStrategy::Naive);
        assert_eq!(select_strategy((100, 100), (100, 1), 0), MatmulStrategy::Naive);
    }

    #[test]
    fn operator_is_naive() {
        let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::new([[0.5, -1.0], [2.0, 0.25]]);
        assert_eq!(a * b, a.matmul_naive(&b));
    }

    #[test]
    fn divide_and_conquer_exact_on_integers() {
        let a: Matrix<i64, 9, 6> = Matrix::from_fn(|i, j| (i as i64 * 7 - j as i64 * 3) % 11);
        let b: Matrix<i64, 6, 5> = Matrix::from_fn(|i, j| (i as i64 + 2 * j as i64) % 5 - 2);
        for threshold in [0, 4, 16, 54] {
            let policy = MatmulPolicy { threshold };
            assert_eq!(a.matmul_with(&b, &policy), a * b, "threshold {threshold}");
        }
    }

    #[test]
    fn divide_and_conquer_floats_within_tolerance() {
        let a: Matrix<f64, 12, 10> = Matrix::from_fn(|i, j| ((i * 13 + j * 7) % 17) as f64 / 3.0 - 2.5);
        let b: Matrix<f64, 10, 11> = Matrix::from_fn(|i, j| ((i * 5 + j * 11) % 19) as f64 / 7.0 - 1.0);
        let policy = MatmulPolicy { threshold: 8 };
        assert!(a.matmul_with(&b, &policy).float_equals(&(a * b), 1e-9));
    }

    #[test]
    fn default_policy_stays_naive_for_small() {
        let a: Matrix<f64, 3, 3> = Matrix::from_fn(|i, j| (i + j) as f64);
        assert_eq!(a.matmul_with(&a, &MatmulPolicy::default()), a * a);
    }
}
