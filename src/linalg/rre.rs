use crate::traits::FloatScalar;
use crate::Matrix;

impl<T: FloatScalar, const R: usize, const C: usize> Matrix<T, R, C> {
    /// Reduced row echelon form by Gauss–Jordan elimination.
    ///
    /// For each row the pivot is the first nonzero entry found scanning
    /// down the current lead column; if the column is zero from this row
    /// on, the lead moves right. The pivot row is swapped into place,
    /// scaled to a leading one, and eliminated from every other row.
    /// Elimination stops when rows or columns run out, so zero rows are
    /// fine. Negative zeros are normalised to `+0` in the result.
    ///
    /// Pivots are compared against exact zero, not a tolerance.
    ///
    /// ```
    /// use kalmat::Matrix;
    /// let m = Matrix::new([[1.0_f64, 2.0, 3.0], [2.0, 4.0, 7.0]]);
    /// assert_eq!(m.rre(), Matrix::new([[1.0, 2.0, 0.0], [0.0, 0.0, 1.0]]));
    /// ```
    pub fn rre(&self) -> Self {
        let mut m = *self;
        let mut lead = 0;

        'rows: for r in 0..R {
            if lead >= C {
                break;
            }

            let mut i = r;
            while m[(i, lead)] == T::zero() {
                i += 1;
                if i == R {
                    i = r;
                    lead += 1;
                    if lead == C {
                        break 'rows;
                    }
                }
            }

            m.swap_rows(i, r);
            let pivot = m[(r, lead)];
            m.rows[r] /= pivot;

            let pivot_row = m.rows[r];
            for k in 0..R {
                if k != r {
                    let factor = m[(k, lead)];
                    m.rows[k] -= pivot_row * factor;
                }
            }
            lead += 1;
        }

        m.fix_negative_zero();
        m
    }

    /// Replace every `-0.0` with `+0.0`.
    fn fix_negative_zero(&mut self) {
        for row in self.rows.iter_mut() {
            for x in row.iter_mut() {
                if *x == T::zero() {
                    *x = T::zero();
                }
            }
        }
    }
}
