use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{corrected_covariance, innovation, CovarianceForm, EstimateError, Innovation, LinearModel};

/// Linear Kalman filter with const-generic state (`N`), measurement (`M`)
/// and control (`L`) dimensions.
///
/// The filter owns its [`LinearModel`], the state estimate `x` and the
/// covariance `P`. `P` starts out equal to the process noise `Q`.
///
/// All operations are stack-allocated, no heap, fully no-std compatible.
///
/// # Example
///
/// ```
/// use kalmat::estimate::{Kalman, LinearModel};
/// use kalmat::{Matrix, Vector};
///
/// let dt = 0.1;
/// let model = LinearModel::new(
///     Matrix::new([[1.0_f64, dt], [0.0, 1.0]]),
///     Matrix::new([[0.5 * dt * dt], [dt]]), // acceleration input
///     Matrix::new([[1.0, 0.0]]),
///     Matrix::diagonal(0.01),
///     Matrix::new([[0.5]]),
/// );
/// let mut kf = Kalman::new(model, Vector::from_array([0.0, 1.0]));
///
/// kf.predict(&Vector::from_array([0.2]))
///     .update(&Vector::from_array([0.12]))
///     .unwrap();
/// assert!(kf.covariance()[(0, 0)] < 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kalman<T, const N: usize, const M: usize, const L: usize> {
    pub(crate) model: LinearModel<T, N, M, L>,
    x: Vector<T, N>,
    p: Matrix<T, N, N>,
    form: CovarianceForm,
}

impl<T: FloatScalar, const N: usize, const M: usize, const L: usize> Kalman<T, N, M, L> {
    /// Create a filter at state `x0` with covariance `P = Q`.
    pub fn new(model: LinearModel<T, N, M, L>, x0: Vector<T, N>) -> Self {
        Self {
            p: model.q,
            model,
            x: x0,
            form: CovarianceForm::default(),
        }
    }

    /// Choose how `update` corrects the covariance.
    pub fn with_covariance_form(mut self, form: CovarianceForm) -> Self {
        self.form = form;
        self
    }

    /// Current state estimate.
    #[inline]
    pub fn state_vector(&self) -> &Vector<T, N> {
        &self.x
    }

    /// Current state covariance.
    #[inline]
    pub fn covariance(&self) -> &Matrix<T, N, N> {
        &self.p
    }

    #[inline]
    pub fn model(&self) -> &LinearModel<T, N, M, L> {
        &self.model
    }

    #[inline]
    pub fn covariance_form(&self) -> CovarianceForm {
        self.form
    }

    /// Overwrite the state estimate and covariance.
    pub fn reset(&mut self, x: Vector<T, N>, p: Matrix<T, N, N>) {
        self.x = x;
        self.p = p;
    }

    /// Predict step with control input `u`.
    ///
    /// Updates: `x = F x + B u`, `P = F P Fᵀ + Q`.
    pub fn predict(&mut self, u: &Vector<T, L>) -> &mut Self {
        let LinearModel { f, b, q, .. } = &self.model;
        self.x = f * &self.x + b * u;
        self.p = f * self.p * f.transpose() + q;
        self
    }

    /// Predict step with a zero control input.
    pub fn predict_free(&mut self) -> &mut Self {
        self.predict(&Vector::zeros())
    }

    /// Update step with measurement `z`.
    ///
    /// - `y = z − H x`
    /// - `S = H P Hᵀ + R`
    /// - `K = P Hᵀ S⁻¹`
    /// - `x = x + K y`, and `P` corrected per [`CovarianceForm`]
    ///
    /// If `S` cannot be inverted the state is left untouched and
    /// [`EstimateError::SingularInnovation`] is returned.
    pub fn update(&mut self, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        self.correct(z)?;
        Ok(self)
    }

    /// `predict(u)` followed by `update(z)`.
    pub fn step(&mut self, u: &Vector<T, L>, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        self.predict(u).update(z)
    }

    /// The update proper; returns the innovation for the adaptive wrapper.
    pub(crate) fn correct(&mut self, z: &Vector<T, M>) -> Result<Innovation<T, N, M>, EstimateError> {
        let LinearModel { h, r, .. } = &self.model;
        let y = *z - h * &self.x;
        let inn = innovation(&self.p, h, r, y)?;
        self.x += inn.k * y;
        self.p = corrected_covariance(self.form, &self.p, &inn.k, h, r);
        Ok(inn)
    }
}
