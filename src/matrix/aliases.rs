//! Type aliases for common matrix and vector sizes.

use crate::matrix::vector::Vector;
use crate::Matrix;

// ── Square matrix aliases ──────────────────────────────────────────

/// 1×1 matrix.
pub type Matrix1<T> = Matrix<T, 1, 1>;
/// 2×2 matrix.
pub type Matrix2<T> = Matrix<T, 2, 2>;
/// 3×3 matrix.
pub type Matrix3<T> = Matrix<T, 3, 3>;
/// 4×4 matrix.
pub type Matrix4<T> = Matrix<T, 4, 4>;
/// 6×6 matrix.
pub type Matrix6<T> = Matrix<T, 6, 6>;

// ── Measurement-row aliases (1×N observation matrices) ─────────────

/// 1×2 matrix.
pub type Matrix1x2<T> = Matrix<T, 1, 2>;
/// 1×3 matrix.
pub type Matrix1x3<T> = Matrix<T, 1, 3>;
/// 2×3 matrix.
pub type Matrix2x3<T> = Matrix<T, 2, 3>;
/// 2×4 matrix.
pub type Matrix2x4<T> = Matrix<T, 2, 4>;

// ── Vector aliases ─────────────────────────────────────────────────

/// 1-element vector.
pub type Vector1<T> = Vector<T, 1>;
/// 2-element vector.
pub type Vector2<T> = Vector<T, 2>;
/// 3-element vector.
pub type Vector3<T> = Vector<T, 3>;
/// 4-element vector.
pub type Vector4<T> = Vector<T, 4>;
/// 6-element vector.
pub type Vector6<T> = Vector<T, 6>;
