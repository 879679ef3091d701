use core::fmt::{self, Write as _};

use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, Scalar};
use crate::Matrix;

// ── Constructors ────────────────────────────────────────────────────

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m: Matrix<f64, 3, 3> = Matrix::from_fn(|i, j| {
    ///     if i == j { 1.0 } else { 0.0 }
    /// });
    /// assert_eq!(m, Matrix::eye());
    /// ```
    pub fn from_fn(f: impl Fn(usize, usize) -> T) -> Self {
        Self {
            rows: core::array::from_fn(|i| Vector::from_array(core::array::from_fn(|j| f(i, j)))),
        }
    }

    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m = Matrix::new([[1.0_f64, 4.0], [9.0, 16.0]]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r, Matrix::new([[1.0, 2.0], [3.0, 4.0]]));
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Matrix<U, R, C>
    where
        T: Copy,
    {
        Matrix::from_fn(|i, j| f(self.rows[i].data[j]))
    }

    /// Swap two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
    }
}

// ── Aggregation and row / column access ─────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Sum of all elements.
    pub fn sum(&self) -> T {
        self.rows.iter().fold(T::zero(), |acc, r| acc + r.sum())
    }

    /// Copy of row `i`.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
    /// assert_eq!(m.row(1).into_array(), [3.0, 4.0]);
    /// ```
    pub fn row(&self, i: usize) -> Vector<T, C> {
        self.rows[i]
    }

    /// Replace row `i`.
    pub fn set_row(&mut self, i: usize, v: &Vector<T, C>) {
        self.rows[i] = *v;
    }

    /// Copy of column `j`.
    pub fn col(&self, j: usize) -> Vector<T, R> {
        Vector::from_array(core::array::from_fn(|i| self[(i, j)]))
    }

    /// Replace column `j`.
    pub fn set_col(&mut self, j: usize, v: &Vector<T, R>) {
        for i in 0..R {
            self[(i, j)] = v[i];
        }
    }
}

// ── Tolerance comparison ────────────────────────────────────────────

impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// `true` if every element differs from `other` by at most `tol`.
    pub fn float_equals(&self, other: &Self, tol: T) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.float_equals(b, tol))
    }

    /// `float_equals` with [`FloatScalar::DEFAULT_TOLERANCE`].
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let a = Matrix::new([[0.1 + 0.2, 1.0]]);
    /// let b = Matrix::new([[0.3, 1.0]]);
    /// assert!(a != b);
    /// assert!(a.approx_eq(&b));
    /// ```
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.float_equals(other, T::DEFAULT_TOLERANCE)
    }

    /// `true` if no element is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.rows.iter().all(|r| r.is_finite())
    }

    /// Element-wise absolute value.
    pub fn abs(&self) -> Self {
        self.map(|x| x.abs())
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display, const R: usize, const C: usize> fmt::Display for Matrix<T, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Right-align each column to its widest entry
        let mut widths = [0usize; C];
        for row in &self.rows {
            for (j, x) in row.iter().enumerate() {
                let w = WriteCounting::count(|wc| write!(wc, "{x}"));
                widths[j] = widths[j].max(w);
            }
        }

        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "│")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:>width$}", x, width = widths[j])?;
            }
            write!(f, "│")?;
        }
        Ok(())
    }
}

/// Counts characters written, without allocating.
struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}
