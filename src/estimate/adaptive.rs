use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{adapt_noise, Adaptation, CovarianceForm, EstimateError, Kalman, LinearModel};

/// Linear Kalman filter that re-estimates its own noise covariances.
///
/// Predict is identical to [`Kalman`]. After each successful update the
/// measurement noise `R` and process noise `Q` are blended toward the
/// innovation statistics of that step (see [`Adaptation`]).
///
/// ```
/// use kalmat::estimate::{Adaptation, AdaptiveKalman, LinearModel};
/// use kalmat::{Matrix, Vector};
///
/// let model = LinearModel::new(
///     Matrix::new([[1.0_f64]]),
///     Matrix::new([[0.0]]),
///     Matrix::new([[1.0]]),
///     Matrix::new([[0.01]]),
///     Matrix::new([[0.01]]),
/// );
/// let mut kf = AdaptiveKalman::new(model, Vector::zeros(), Adaptation::default());
/// kf.step(&Vector::zeros(), &Vector::from_array([3.0])).unwrap();
///
/// // A large residual inflates the measurement noise estimate.
/// assert!(kf.measurement_noise()[(0, 0)] > 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveKalman<T, const N: usize, const M: usize, const L: usize> {
    filter: Kalman<T, N, M, L>,
    adaptation: Adaptation<T>,
}

impl<T: FloatScalar, const N: usize, const M: usize, const L: usize> AdaptiveKalman<T, N, M, L> {
    /// Create a filter at state `x0` with covariance `P = Q`.
    pub fn new(model: LinearModel<T, N, M, L>, x0: Vector<T, N>, adaptation: Adaptation<T>) -> Self {
        Self {
            filter: Kalman::new(model, x0),
            adaptation,
        }
    }

    /// Choose how `update` corrects the covariance.
    pub fn with_covariance_form(mut self, form: CovarianceForm) -> Self {
        self.filter = self.filter.with_covariance_form(form);
        self
    }

    #[inline]
    pub fn state_vector(&self) -> &Vector<T, N> {
        self.filter.state_vector()
    }

    #[inline]
    pub fn covariance(&self) -> &Matrix<T, N, N> {
        self.filter.covariance()
    }

    /// Current model, including the adapted `Q` and `R`.
    #[inline]
    pub fn model(&self) -> &LinearModel<T, N, M, L> {
        self.filter.model()
    }

    /// Current process noise estimate `Q`.
    #[inline]
    pub fn process_noise(&self) -> &Matrix<T, N, N> {
        &self.filter.model.q
    }

    /// Current measurement noise estimate `R`.
    #[inline]
    pub fn measurement_noise(&self) -> &Matrix<T, M, M> {
        &self.filter.model.r
    }

    #[inline]
    pub fn adaptation(&self) -> &Adaptation<T> {
        &self.adaptation
    }

    /// Replace the transition matrix `F`, keeping state and noise estimates.
    pub fn set_transition(&mut self, f: Matrix<T, N, N>) {
        self.filter.model.f = f;
    }

    pub fn predict(&mut self, u: &Vector<T, L>) -> &mut Self {
        self.filter.predict(u);
        self
    }

    pub fn predict_free(&mut self) -> &mut Self {
        self.filter.predict_free();
        self
    }

    /// Kalman update, then
    /// `R ← (1−α) R + α (y yᵀ + S)` and `Q ← (1−β) Q + β (K y yᵀ Kᵀ)`.
    ///
    /// On a singular innovation nothing changes, `Q` and `R` included.
    pub fn update(&mut self, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        let inn = self.filter.correct(z)?;
        let model = &mut self.filter.model;
        adapt_noise(&mut model.q, &mut model.r, &inn, &self.adaptation);
        Ok(self)
    }

    pub fn step(&mut self, u: &Vector<T, L>, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        self.predict(u).update(z)
    }
}
