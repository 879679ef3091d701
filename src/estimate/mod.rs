//! State estimation: linear, adaptive and extended Kalman filters.
//!
//! Every filter has const-generic state (`N`), measurement (`M`) and
//! control (`L`) dimensions, owns its model and state by value, and runs
//! entirely on the stack. A tick is `predict(&u)` followed by
//! `update(&z)`, or [`step`](Kalman::step) for both.
//!
//! # Linear Kalman filter
//!
//! ```
//! use kalmat::estimate::{Kalman, LinearModel};
//! use kalmat::{Matrix, Vector};
//!
//! // 1-D constant velocity, position measured, no control input.
//! let model = LinearModel::new(
//!     Matrix::new([[1.0_f64, 1.0], [0.0, 1.0]]),
//!     Matrix::<f64, 2, 1>::zeros(),
//!     Matrix::new([[1.0, 0.0]]),
//!     Matrix::diagonal(0.001),
//!     Matrix::new([[0.01]]),
//! );
//! let mut kf = Kalman::new(model, Vector::zeros());
//!
//! for z in [1.0, 2.0, 3.0] {
//!     kf.step(&Vector::zeros(), &Vector::from_array([z])).unwrap();
//! }
//! assert!(kf.state_vector()[0] > 2.0);
//! ```
//!
//! # Extended Kalman filter
//!
//! ```
//! use kalmat::estimate::{Ekf, FnModel};
//! use kalmat::{Matrix, Vector};
//!
//! // Constant position, range measured through z = x².
//! let model = FnModel::new(
//!     |x: &Vector<f64, 1>, _u: &Vector<f64, 1>| *x,
//!     |_x: &Vector<f64, 1>, _u: &Vector<f64, 1>| Matrix::eye(),
//!     |x: &Vector<f64, 1>| Vector::from_array([x[0] * x[0]]),
//!     |x: &Vector<f64, 1>| Matrix::new([[2.0 * x[0]]]),
//! );
//! let mut ekf = Ekf::new(
//!     model,
//!     Matrix::new([[0.01]]),
//!     Matrix::new([[0.1]]),
//!     Vector::from_array([1.0]),
//! );
//! for _ in 0..20 {
//!     ekf.predict(&Vector::zeros());
//!     ekf.update(&Vector::from_array([4.0])).unwrap();
//! }
//! assert!((ekf.state_vector()[0] - 2.0).abs() < 0.05);
//! ```

mod adaptive;
mod adaptive_ekf;
mod ekf;
mod kalman;
mod kinematic;

#[cfg(test)]
mod tests;

pub use adaptive::AdaptiveKalman;
pub use adaptive_ekf::AdaptiveEkf;
pub use ekf::{Ekf, FnModel, NonlinearModel};
pub use kalman::Kalman;
pub use kinematic::{taylor_transition, KinematicTracker};

use crate::linalg::LinalgError;
use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

/// Errors from state estimation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    /// The innovation covariance `S` could not be inverted, or the
    /// resulting gain was not finite. The filter state is unchanged.
    SingularInnovation(LinalgError),
}

impl core::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EstimateError::SingularInnovation(e) => {
                write!(f, "innovation covariance is singular ({e})")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EstimateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EstimateError::SingularInnovation(e) => Some(e),
        }
    }
}

impl From<LinalgError> for EstimateError {
    fn from(e: LinalgError) -> Self {
        EstimateError::SingularInnovation(e)
    }
}

/// Linear state-space model `x' = F x + B u`, `z = H x`, with process
/// noise `Q` and measurement noise `R`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel<T, const N: usize, const M: usize, const L: usize> {
    /// State transition (N×N).
    pub f: Matrix<T, N, N>,
    /// Control input (N×L).
    pub b: Matrix<T, N, L>,
    /// Observation (M×N).
    pub h: Matrix<T, M, N>,
    /// Process noise covariance (N×N).
    pub q: Matrix<T, N, N>,
    /// Measurement noise covariance (M×M).
    pub r: Matrix<T, M, M>,
}

impl<T, const N: usize, const M: usize, const L: usize> LinearModel<T, N, M, L> {
    pub fn new(
        f: Matrix<T, N, N>,
        b: Matrix<T, N, L>,
        h: Matrix<T, M, N>,
        q: Matrix<T, N, N>,
        r: Matrix<T, M, M>,
    ) -> Self {
        Self { f, b, h, q, r }
    }
}

/// Exponential forgetting factors for the adaptive filters.
///
/// After each update, `R ← (1−α) R + α (y yᵀ + S)` and
/// `Q ← (1−β) Q + β (K y yᵀ Kᵀ)`. Values are expected in `[0, 1]`;
/// zero disables adaptation of that matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptation<T> {
    /// Measurement-noise forgetting factor α.
    pub alpha: T,
    /// Process-noise forgetting factor β.
    pub beta: T,
}

impl<T: FloatScalar> Default for Adaptation<T> {
    fn default() -> Self {
        Self {
            alpha: T::constant(0.1),
            beta: T::constant(0.1),
        }
    }
}

/// How the state covariance is corrected in `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovarianceForm {
    /// `P ← (I − K H) P`.
    #[default]
    Simple,
    /// `P ← (I − K H) P (I − K H)ᵀ + K R Kᵀ`; stays symmetric and PSD
    /// under round-off at roughly twice the cost.
    Joseph,
}

/// Innovation terms of one update: residual `y`, its covariance `S`,
/// and the gain `K`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Innovation<T, const N: usize, const M: usize> {
    pub y: Vector<T, M>,
    pub s: Matrix<T, M, M>,
    pub k: Matrix<T, N, M>,
}

/// Compute `S = H P Hᵀ + R` and `K = P Hᵀ S⁻¹` for residual `y`.
pub(crate) fn innovation<T: FloatScalar, const N: usize, const M: usize>(
    p: &Matrix<T, N, N>,
    h: &Matrix<T, M, N>,
    r: &Matrix<T, M, M>,
    y: Vector<T, M>,
) -> Result<Innovation<T, N, M>, EstimateError> {
    let ht = h.transpose();
    let s = h * p * ht + r;
    let s_inv = s.inv().map_err(|e| {
        log::warn!("rejecting measurement update: {e}");
        EstimateError::from(e)
    })?;
    let k = p * ht * s_inv;
    if !k.is_finite() {
        log::warn!("rejecting measurement update: gain is not finite");
        return Err(LinalgError::NonFinite.into());
    }
    Ok(Innovation { y, s, k })
}

/// Corrected covariance after applying gain `k` with observation `h`.
pub(crate) fn corrected_covariance<T: FloatScalar, const N: usize, const M: usize>(
    form: CovarianceForm,
    p: &Matrix<T, N, N>,
    k: &Matrix<T, N, M>,
    h: &Matrix<T, M, N>,
    r: &Matrix<T, M, M>,
) -> Matrix<T, N, N> {
    let i_kh = Matrix::<T, N, N>::eye() - k * h;
    match form {
        CovarianceForm::Simple => i_kh * p,
        CovarianceForm::Joseph => i_kh * p * i_kh.transpose() + k * r * k.transpose(),
    }
}

/// Blend `q` and `r` toward the statistics of the latest innovation.
pub(crate) fn adapt_noise<T: FloatScalar, const N: usize, const M: usize>(
    q: &mut Matrix<T, N, N>,
    r: &mut Matrix<T, M, M>,
    inn: &Innovation<T, N, M>,
    adaptation: &Adaptation<T>,
) {
    let Adaptation { alpha, beta } = *adaptation;
    let yyt = inn.y.outer(&inn.y);
    *r = *r * (T::one() - alpha) + (yyt + inn.s) * alpha;
    *q = *q * (T::one() - beta) + (inn.k * yyt * inn.k.transpose()) * beta;
}
