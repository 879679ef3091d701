use crate::linalg::LinalgError;
use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

/// Doolittle LU factorisation without pivoting, `A = L·U`.
///
/// `L` is unit lower triangular, `U` upper triangular. The factors are
/// kept as two separate matrices and recomputed on every call to
/// [`Matrix::lu`]; nothing is cached on the source matrix.
///
/// # Example
///
/// ```
/// use kalmat::{Matrix, Vector};
///
/// let a = Matrix::new([[2.0_f64, 1.0], [5.0, 3.0]]);
/// let lu = a.lu().unwrap();
/// assert!((lu.l() * lu.u()).approx_eq(&a));
///
/// let x = lu.solve(&Vector::from_array([4.0, 11.0]));
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuDecomposition<T, const N: usize> {
    l: Matrix<T, N, N>,
    u: Matrix<T, N, N>,
}

impl<T: FloatScalar, const N: usize> LuDecomposition<T, N> {
    /// Factor `a`. Fails with [`LinalgError::ZeroPivot`] as soon as a
    /// diagonal entry of `U` is exactly zero.
    pub fn new(a: &Matrix<T, N, N>) -> Result<Self, LinalgError> {
        let mut l = Matrix::<T, N, N>::zeros();
        let mut u = Matrix::<T, N, N>::zeros();

        for i in 0..N {
            // Row i of U
            for k in i..N {
                let mut sum = T::zero();
                for j in 0..i {
                    sum = sum + l[(i, j)] * u[(j, k)];
                }
                u[(i, k)] = a[(i, k)] - sum;
            }

            let pivot = u[(i, i)];
            if pivot == T::zero() {
                return Err(LinalgError::ZeroPivot { index: i });
            }

            // Column i of L
            l[(i, i)] = T::one();
            for k in (i + 1)..N {
                let mut sum = T::zero();
                for j in 0..i {
                    sum = sum + l[(k, j)] * u[(j, i)];
                }
                l[(k, i)] = (a[(k, i)] - sum) / pivot;
            }
        }

        Ok(Self { l, u })
    }

    /// Unit lower-triangular factor.
    pub fn l(&self) -> Matrix<T, N, N> {
        self.l
    }

    /// Upper-triangular factor.
    pub fn u(&self) -> Matrix<T, N, N> {
        self.u
    }

    /// Consume the decomposition, returning `(L, U)`.
    pub fn into_parts(self) -> (Matrix<T, N, N>, Matrix<T, N, N>) {
        (self.l, self.u)
    }

    /// Determinant as the product of `U`'s diagonal.
    ///
    /// The sign is flipped when an odd number of `L`'s diagonal entries
    /// differ from one. Doolittle always produces a unit diagonal, so this
    /// never fires; it stands in for a permutation parity that does not
    /// exist without pivoting.
    pub fn det(&self) -> T {
        let mut d = T::one();
        let mut flips = 0usize;
        for i in 0..N {
            d = d * self.u[(i, i)];
            if self.l[(i, i)] != T::one() {
                flips += 1;
            }
        }
        if flips % 2 == 1 {
            -d
        } else {
            d
        }
    }

    /// Solve `Ax = b` by forward then back substitution.
    pub fn solve(&self, b: &Vector<T, N>) -> Vector<T, N> {
        let mut y = Vector::<T, N>::zeros();
        for i in 0..N {
            let mut sum = b[i];
            for j in 0..i {
                sum = sum - self.l[(i, j)] * y[j];
            }
            y[i] = sum;
        }

        let mut x = Vector::<T, N>::zeros();
        for i in (0..N).rev() {
            let mut sum = y[i];
            for j in (i + 1)..N {
                sum = sum - self.u[(i, j)] * x[j];
            }
            x[i] = sum / self.u[(i, i)];
        }
        x
    }

    /// `A⁻¹ = U⁻¹ · L⁻¹`.
    ///
    /// `U⁻¹` is obtained by inverting `Uᵀ` (lower triangular) and
    /// transposing back.
    pub fn inverse(&self) -> Result<Matrix<T, N, N>, LinalgError> {
        let u_inv = invert_lower(&self.u.transpose()).transpose();
        let l_inv = invert_lower(&self.l);
        let inv = u_inv * l_inv;
        if inv.is_finite() {
            Ok(inv)
        } else {
            Err(LinalgError::NonFinite)
        }
    }
}

/// Inverse of a lower-triangular matrix by forward substitution,
/// one column at a time. Diagonal entries must be nonzero.
fn invert_lower<T: FloatScalar, const N: usize>(l: &Matrix<T, N, N>) -> Matrix<T, N, N> {
    let mut x = Matrix::<T, N, N>::zeros();
    for k in 0..N {
        x[(k, k)] = T::one() / l[(k, k)];
        for i in (k + 1)..N {
            let mut sum = T::zero();
            for j in k..i {
                sum = sum + l[(i, j)] * x[(j, k)];
            }
            x[(i, k)] = -sum / l[(i, i)];
        }
    }
    x
}

/// Convenience methods on square matrices.
impl<T: FloatScalar, const N: usize> Matrix<T, N, N> {
    /// Doolittle LU decomposition (no pivoting).
    pub fn lu(&self) -> Result<LuDecomposition<T, N>, LinalgError> {
        LuDecomposition::new(self)
    }

    /// Determinant via LU.
    ///
    /// Total: returns zero when the factorisation meets a zero pivot,
    /// which includes nonsingular matrices that need a row exchange.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let c = Matrix::new([[2.0_f64, 0.0, 2.0], [0.0, 4.0, 2.0], [2.0, 2.0, 2.0]]);
    /// assert_eq!(c.det(), -8.0);
    /// assert_eq!(Matrix::new([[1.0_f64, 2.0], [2.0, 4.0]]).det(), 0.0);
    /// ```
    pub fn det(&self) -> T {
        match self.lu() {
            Ok(lu) => lu.det(),
            Err(_) => T::zero(),
        }
    }

    /// Matrix inverse via LU.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let a = Matrix::new([[4.0_f64, 7.0], [2.0, 6.0]]);
    /// let a_inv = a.inv().unwrap();
    /// assert!((a * a_inv).approx_eq(&Matrix::eye()));
    /// ```
    pub fn inv(&self) -> Result<Self, LinalgError> {
        self.lu()?.inverse()
    }

    /// Solve `Ax = b` for `x` via LU.
    pub fn solve(&self, b: &Vector<T, N>) -> Result<Vector<T, N>, LinalgError> {
        Ok(self.lu()?.solve(b))
    }
}
