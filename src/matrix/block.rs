use crate::traits::Scalar;
use crate::Matrix;

// ── Compile-time positioned blocks ──────────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Extract the P×Q sub-matrix whose top-left corner is `(ROW, COL)`.
    ///
    /// Offsets are const generics, so an out-of-range block fails to
    /// compile.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m = Matrix::new([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
    /// let s: Matrix<i32, 2, 2> = m.slice::<1, 1, 2, 2>();
    /// assert_eq!(s, Matrix::new([[5, 6], [8, 9]]));
    /// ```
    pub fn slice<const ROW: usize, const COL: usize, const P: usize, const Q: usize>(
        &self,
    ) -> Matrix<T, P, Q> {
        const { assert!(ROW + P <= R && COL + Q <= C, "matrix slice out of range") };
        let mut out = Matrix::<T, P, Q>::zeros();
        for r in 0..P {
            for c in 0..Q {
                out[(r, c)] = self[(ROW + r, COL + c)];
            }
        }
        out
    }

    /// Overwrite the P×Q region at `(ROW, COL)` with `src`.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let mut m: Matrix<i32, 3, 3> = Matrix::zeros();
    /// m.insert::<1, 0, 1, 2>(&Matrix::new([[7, 8]]));
    /// assert_eq!(m[(1, 0)], 7);
    /// assert_eq!(m[(1, 1)], 8);
    /// ```
    pub fn insert<const ROW: usize, const COL: usize, const P: usize, const Q: usize>(
        &mut self,
        src: &Matrix<T, P, Q>,
    ) {
        const { assert!(ROW + P <= R && COL + Q <= C, "matrix insert out of range") };
        for r in 0..P {
            for c in 0..Q {
                self[(ROW + r, COL + c)] = src[(r, c)];
            }
        }
    }
}

// ── Runtime positioned blocks ───────────────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Extract a P×Q sub-matrix starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m = Matrix::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
    /// let b: Matrix<f64, 2, 2> = m.block(1, 1);
    /// assert_eq!(b[(0, 0)], 5.0);
    /// assert_eq!(b[(1, 1)], 9.0);
    /// ```
    pub fn block<const P: usize, const Q: usize>(&self, i: usize, j: usize) -> Matrix<T, P, Q> {
        assert!(
            i + P <= R && j + Q <= C,
            "block ({i},{j}) size {P}×{Q} out of bounds for {R}×{C} matrix"
        );
        Matrix::from_fn(|r, c| self[(i + r, j + c)])
    }

    /// Write a P×Q sub-matrix into self starting at position `(i, j)`.
    ///
    /// Panics if the block extends beyond the matrix bounds.
    pub fn set_block<const P: usize, const Q: usize>(
        &mut self,
        i: usize,
        j: usize,
        src: &Matrix<T, P, Q>,
    ) {
        assert!(
            i + P <= R && j + Q <= C,
            "set_block ({i},{j}) size {P}×{Q} out of bounds for {R}×{C} matrix"
        );
        for r in 0..P {
            for c in 0..Q {
                self[(i + r, j + c)] = src[(r, c)];
            }
        }
    }
}

// ── Assembly from parts ─────────────────────────────────────────────

impl<T: Scalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Assemble a matrix from four quadrants:
    ///
    /// ```text
    /// ┌ M11  M12 ┐
    /// └ M21  M22 ┘
    /// ```
    ///
    /// The quadrant shapes must tile the output exactly; this is checked
    /// at compile time.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let i2: Matrix<i32, 2, 2> = Matrix::eye();
    /// let z: Matrix<i32, 2, 1> = Matrix::zeros();
    /// let m: Matrix<i32, 3, 3> = Matrix::from_quadrants(
    ///     &i2,
    ///     &z,
    ///     &Matrix::new([[5, 6]]),
    ///     &Matrix::new([[9]]),
    /// );
    /// assert_eq!(m, Matrix::new([[1, 0, 0], [0, 1, 0], [5, 6, 9]]));
    /// ```
    pub fn from_quadrants<const R1: usize, const C1: usize, const R2: usize, const C2: usize>(
        m11: &Matrix<T, R1, C1>,
        m12: &Matrix<T, R1, C2>,
        m21: &Matrix<T, R2, C1>,
        m22: &Matrix<T, R2, C2>,
    ) -> Self {
        const { assert!(R1 + R2 == R && C1 + C2 == C, "quadrants do not tile the matrix") };
        let mut out = Self::zeros();
        out.set_block(0, 0, m11);
        out.set_block(0, C1, m12);
        out.set_block(R1, 0, m21);
        out.set_block(R1, C1, m22);
        out
    }

    /// Augmented matrix `[A | B]`, placing `b` to the right of `a`.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let a = Matrix::new([[1, 2], [3, 4]]);
    /// let b = Matrix::new([[5], [6]]);
    /// let ab: Matrix<i32, 2, 3> = Matrix::augment(&a, &b);
    /// assert_eq!(ab, Matrix::new([[1, 2, 5], [3, 4, 6]]));
    /// ```
    pub fn augment<const C1: usize, const C2: usize>(
        a: &Matrix<T, R, C1>,
        b: &Matrix<T, R, C2>,
    ) -> Self {
        const { assert!(C1 + C2 == C, "augmented widths do not sum to the output width") };
        let mut out = Self::zeros();
        out.set_block(0, 0, a);
        out.set_block(0, C1, b);
        out
    }
}
