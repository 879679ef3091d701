pub mod aliases;
mod block;
mod ops;
mod square;
mod util;
pub mod vector;

use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, MatrixRef, Scalar};
use vector::Vector;

/// Fixed-size matrix with `R` rows and `C` columns.
///
/// Storage is row-major: `R` rows, each a [`Vector<T, C>`].
/// Stack-allocated, no-std compatible, `Copy` when `T` is.
///
/// # Examples
///
/// ```
/// use kalmat::Matrix;
///
/// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a[1][0], 3.0);
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
///
/// let b: Matrix<f64, 3, 3> = Matrix::eye();
/// assert_eq!(b[(0, 0)], 1.0);
/// assert_eq!(b[(0, 1)], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const R: usize, const C: usize> {
    pub(crate) rows: [Vector<T, C>; R],
}

impl<T, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Smaller of the two dimensions; length of the main diagonal.
    pub const ORDER: usize = if R < C { R } else { C };

    /// Create a matrix from a row-major nested array literal.
    ///
    /// The input is `[[row0], [row1], ...]` (R arrays of C elements each).
    #[inline]
    pub fn new(rows: [[T; C]; R]) -> Self {
        Self {
            rows: rows.map(Vector::from_array),
        }
    }

    /// Create a matrix from an array of row vectors.
    #[inline]
    pub const fn from_rows(rows: [Vector<T, C>; R]) -> Self {
        Self { rows }
    }

    /// Number of rows.
    #[inline]
    pub const fn nrows(&self) -> usize {
        R
    }

    /// Number of columns.
    #[inline]
    pub const fn ncols(&self) -> usize {
        C
    }

    /// Borrow the rows.
    #[inline]
    pub fn rows(&self) -> &[Vector<T, C>; R] {
        &self.rows
    }

    /// Bounds-checked element access; `None` outside the matrix.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m = Matrix::new([[1, 2], [3, 4]]);
    /// assert_eq!(m.get_checked(1, 0), Some(&3));
    /// assert_eq!(m.get_checked(2, 0), None);
    /// ```
    #[inline]
    pub fn get_checked(&self, row: usize, col: usize) -> Option<&T> {
        self.rows.get(row).and_then(|r| r.get_checked(col))
    }

    /// Mutable bounds-checked element access.
    #[inline]
    pub fn get_checked_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.rows.get_mut(row).and_then(|r| r.data.get_mut(col))
    }
}

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Create a matrix filled with zeros.
    pub fn zeros() -> Self {
        Self::fill(T::zero())
    }

    /// Create a matrix filled with ones.
    pub fn ones() -> Self {
        Self::fill(T::one())
    }

    /// Create a matrix with every element set to `value`.
    pub fn fill(value: T) -> Self {
        Self {
            rows: [Vector::fill(value); R],
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Default for Matrix<T, R, C> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T, const R: usize, const C: usize> From<[[T; C]; R]> for Matrix<T, R, C> {
    fn from(rows: [[T; C]; R]) -> Self {
        Self::new(rows)
    }
}

impl<T, const R: usize, const C: usize> MatrixRef<T> for Matrix<T, R, C> {
    #[inline]
    fn nrows(&self) -> usize {
        R
    }

    #[inline]
    fn ncols(&self) -> usize {
        C
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.rows[row].data[col]
    }
}

impl<T, const R: usize, const C: usize> MatrixMut<T> for Matrix<T, R, C> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.rows[row].data[col]
    }
}

// Index by (row, col) tuple
impl<T, const R: usize, const C: usize> Index<(usize, usize)> for Matrix<T, R, C> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.rows[row].data[col]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.rows[row].data[col]
    }
}

// Index by row
impl<T, const R: usize, const C: usize> Index<usize> for Matrix<T, R, C> {
    type Output = Vector<T, C>;

    #[inline]
    fn index(&self, row: usize) -> &Vector<T, C> {
        &self.rows[row]
    }
}

impl<T, const R: usize, const C: usize> IndexMut<usize> for Matrix<T, R, C> {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut Vector<T, C> {
        &mut self.rows[row]
    }
}

pub use aliases::*;
