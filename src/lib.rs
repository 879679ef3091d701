//! # kalmat
//!
//! Fixed-size, const-generic matrices and Kalman-family state estimators,
//! no-std compatible. Every dimension is a type parameter, so shape
//! mismatches are compile errors and nothing touches the heap on the
//! filtering path.
//!
//! ## Quick start
//!
//! ```
//! use kalmat::{Matrix, Vector};
//!
//! // Solve a linear system Ax = b
//! let a = Matrix::new([
//!     [2.0_f64, 1.0, -1.0],
//!     [-3.0, -1.0, 2.0],
//!     [-2.0, 1.0, 2.0],
//! ]);
//! let b = Vector::from_array([8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[0] - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: Fixed-size `Matrix<T, R, C>` with const-generic dimensions.
//!   Stack-allocated row-major storage: an array of `R` row [`Vector`]s.
//!   Arithmetic, indexing, block extraction and insertion, transpose,
//!   identity, trace and integer powers.
//!
//! - [`linalg`]: Doolittle LU (no pivoting), determinant, inverse,
//!   reduced row echelon form, and the naive / divide-and-conquer
//!   multiplication strategies with their size-threshold policy.
//!
//! - [`estimate`]: Linear Kalman filter, adaptive Kalman filter with
//!   online `Q`/`R` re-estimation, extended Kalman filter over a
//!   [`NonlinearModel`](estimate::NonlinearModel), its adaptive variant,
//!   and a variable-step kinematic tracker.
//!
//! - [`traits`]: Element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats (`Scalar + Float`), used by every
//!     algorithm that divides or compares against a tolerance
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade:
//! rejected measurement updates at `warn`, tracker step changes at
//! `debug`, multiplication strategy choices at `trace`. Nothing is
//! printed unless the application installs a logger.
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Implies `alloc`. Hardware FPU via system libm, `std::error::Error` impls |
//! | `alloc`   | via std  | Heap scratch space for divide-and-conquer multiplication |
//! | `libm`    | baseline | Pure-Rust software float fallback |

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod estimate;
pub mod linalg;
pub mod matrix;
pub mod traits;

pub use matrix::aliases::{
    Matrix1, Matrix1x2, Matrix1x3, Matrix2, Matrix2x3, Matrix2x4, Matrix3, Matrix4, Matrix6,
    Vector1, Vector2, Vector3, Vector4, Vector6,
};
pub use matrix::vector::Vector;
pub use matrix::Matrix;
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
