use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{adapt_noise, Adaptation, CovarianceForm, Ekf, EstimateError, NonlinearModel};

/// Extended Kalman filter with online re-estimation of `Q` and `R`.
///
/// Runs the [`Ekf`] recursion and then applies the same noise blending
/// as [`AdaptiveKalman`](super::AdaptiveKalman), using the linearized
/// innovation of the step.
#[derive(Debug, Clone)]
pub struct AdaptiveEkf<T, const N: usize, const M: usize, const L: usize, Mdl> {
    filter: Ekf<T, N, M, L, Mdl>,
    adaptation: Adaptation<T>,
}

impl<T, const N: usize, const M: usize, const L: usize, Mdl> AdaptiveEkf<T, N, M, L, Mdl>
where
    T: FloatScalar,
    Mdl: NonlinearModel<T, N, M, L>,
{
    /// Create a filter at state `x0` with covariance `P = Q`.
    pub fn new(
        model: Mdl,
        q: Matrix<T, N, N>,
        r: Matrix<T, M, M>,
        x0: Vector<T, N>,
        adaptation: Adaptation<T>,
    ) -> Self {
        Self {
            filter: Ekf::new(model, q, r, x0),
            adaptation,
        }
    }

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

    #[inline]
    pub fn model(&self) -> &Mdl {
        self.filter.model()
    }

    /// Current process noise estimate `Q`.
    #[inline]
    pub fn process_noise(&self) -> &Matrix<T, N, N> {
        self.filter.process_noise()
    }

    /// Current measurement noise estimate `R`.
    #[inline]
    pub fn measurement_noise(&self) -> &Matrix<T, M, M> {
        self.filter.measurement_noise()
    }

    #[inline]
    pub fn adaptation(&self) -> &Adaptation<T> {
        &self.adaptation
    }

    pub fn predict(&mut self, u: &Vector<T, L>) -> &mut Self {
        self.filter.predict(u);
        self
    }

    pub fn predict_free(&mut self) -> &mut Self {
        self.filter.predict_free();
        self
    }

    /// EKF update followed by noise adaptation. A rejected update leaves
    /// everything, `Q` and `R` included, unchanged.
    pub fn update(&mut self, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        let inn = self.filter.correct(z)?;
        adapt_noise(&mut self.filter.q, &mut self.filter.r, &inn, &self.adaptation);
        Ok(self)
    }

    pub fn step(&mut self, u: &Vector<T, L>, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        self.predict(u).update(z)
    }
}
