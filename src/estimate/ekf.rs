use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{corrected_covariance, innovation, CovarianceForm, EstimateError, Innovation};

/// Nonlinear dynamics and measurement model for [`Ekf`] and
/// [`AdaptiveEkf`](super::AdaptiveEkf).
///
/// `N` is the state dimension, `M` the measurement dimension and `L`
/// the control dimension. Jacobians are supplied analytically.
pub trait NonlinearModel<T, const N: usize, const M: usize, const L: usize> {
    /// State transition `x' = f(x, u)`.
    fn transition(&self, x: &Vector<T, N>, u: &Vector<T, L>) -> Vector<T, N>;

    /// `∂f/∂x` evaluated at `(x, u)`.
    fn transition_jacobian(&self, x: &Vector<T, N>, u: &Vector<T, L>) -> Matrix<T, N, N>;

    /// Measurement model `z = h(x)`.
    fn observe(&self, x: &Vector<T, N>) -> Vector<T, M>;

    /// `∂h/∂x` evaluated at `x`.
    fn observe_jacobian(&self, x: &Vector<T, N>) -> Matrix<T, M, N>;
}

/// [`NonlinearModel`] assembled from four functions or closures.
///
/// ```
/// use kalmat::estimate::{FnModel, NonlinearModel};
/// use kalmat::{Matrix, Vector};
///
/// let dt = 0.1;
/// let model = FnModel::new(
///     move |x: &Vector<f64, 2>, _u: &Vector<f64, 1>| Vector::from_array([x[0] + dt * x[1], x[1]]),
///     move |_x: &Vector<f64, 2>, _u: &Vector<f64, 1>| Matrix::new([[1.0, dt], [0.0, 1.0]]),
///     |x: &Vector<f64, 2>| Vector::from_array([x[0]]),
///     |_x: &Vector<f64, 2>| Matrix::new([[1.0, 0.0]]),
/// );
/// let x = Vector::from_array([1.0, 2.0]);
/// assert!((model.transition(&x, &Vector::zeros())[0] - 1.2).abs() < 1e-12);
/// ```
#[derive(Clone, Copy)]
pub struct FnModel<F, FJ, H, HJ> {
    f: F,
    fj: FJ,
    h: H,
    hj: HJ,
}

// Closures are not `Debug`, so the functions are left out.
impl<F, FJ, H, HJ> core::fmt::Debug for FnModel<F, FJ, H, HJ> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnModel").finish_non_exhaustive()
    }
}

impl<F, FJ, H, HJ> FnModel<F, FJ, H, HJ> {
    /// `f` and `fj` take `(x, u)`; `h` and `hj` take `x`.
    pub fn new<T, const N: usize, const M: usize, const L: usize>(f: F, fj: FJ, h: H, hj: HJ) -> Self
    where
        F: Fn(&Vector<T, N>, &Vector<T, L>) -> Vector<T, N>,
        FJ: Fn(&Vector<T, N>, &Vector<T, L>) -> Matrix<T, N, N>,
        H: Fn(&Vector<T, N>) -> Vector<T, M>,
        HJ: Fn(&Vector<T, N>) -> Matrix<T, M, N>,
    {
        Self { f, fj, h, hj }
    }
}

impl<T, const N: usize, const M: usize, const L: usize, F, FJ, H, HJ> NonlinearModel<T, N, M, L>
    for FnModel<F, FJ, H, HJ>
where
    F: Fn(&Vector<T, N>, &Vector<T, L>) -> Vector<T, N>,
    FJ: Fn(&Vector<T, N>, &Vector<T, L>) -> Matrix<T, N, N>,
    H: Fn(&Vector<T, N>) -> Vector<T, M>,
    HJ: Fn(&Vector<T, N>) -> Matrix<T, M, N>,
{
    fn transition(&self, x: &Vector<T, N>, u: &Vector<T, L>) -> Vector<T, N> {
        (self.f)(x, u)
    }

    fn transition_jacobian(&self, x: &Vector<T, N>, u: &Vector<T, L>) -> Matrix<T, N, N> {
        (self.fj)(x, u)
    }

    fn observe(&self, x: &Vector<T, N>) -> Vector<T, M> {
        (self.h)(x)
    }

    fn observe_jacobian(&self, x: &Vector<T, N>) -> Matrix<T, M, N> {
        (self.hj)(x)
    }
}

/// Extended Kalman Filter with const-generic state, measurement and
/// control dimensions.
///
/// The EKF linearizes the model's dynamics and measurement functions
/// through their Jacobians. It owns the model, the noise covariances
/// `Q` and `R`, the state `x` and the covariance `P` (initially `Q`).
///
/// All operations are stack-allocated, no heap, fully no-std compatible.
#[derive(Debug, Clone)]
pub struct Ekf<T, const N: usize, const M: usize, const L: usize, Mdl> {
    model: Mdl,
    pub(crate) q: Matrix<T, N, N>,
    pub(crate) r: Matrix<T, M, M>,
    x: Vector<T, N>,
    p: Matrix<T, N, N>,
    form: CovarianceForm,
}

impl<T, const N: usize, const M: usize, const L: usize, Mdl> Ekf<T, N, M, L, Mdl>
where
    T: FloatScalar,
    Mdl: NonlinearModel<T, N, M, L>,
{
    /// Create a filter at state `x0` with covariance `P = Q`.
    pub fn new(model: Mdl, q: Matrix<T, N, N>, r: Matrix<T, M, M>, x0: Vector<T, N>) -> Self {
        Self {
            model,
            q,
            r,
            x: x0,
            p: q,
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
    pub fn model(&self) -> &Mdl {
        &self.model
    }

    #[inline]
    pub fn process_noise(&self) -> &Matrix<T, N, N> {
        &self.q
    }

    #[inline]
    pub fn measurement_noise(&self) -> &Matrix<T, M, M> {
        &self.r
    }

    /// Overwrite the state estimate and covariance.
    pub fn reset(&mut self, x: Vector<T, N>, p: Matrix<T, N, N>) {
        self.x = x;
        self.p = p;
    }

    /// Predict step with control input `u`.
    ///
    /// Updates: `x = f(x, u)`, then `F = ∂f/∂x` at the *new* state and
    /// `P = F P Fᵀ + Q`.
    pub fn predict(&mut self, u: &Vector<T, L>) -> &mut Self {
        self.x = self.model.transition(&self.x, u);
        let big_f = self.model.transition_jacobian(&self.x, u);
        self.p = big_f * self.p * big_f.transpose() + self.q;
        self
    }

    /// Predict step with a zero control input.
    pub fn predict_free(&mut self) -> &mut Self {
        self.predict(&Vector::zeros())
    }

    /// Update step with measurement `z`.
    ///
    /// `y = z − h(x)`, `H = ∂h/∂x` at the prior state, `S = H P Hᵀ + R`,
    /// `K = P Hᵀ S⁻¹`, `x = x + K y`. In the simple covariance form the
    /// measurement Jacobian is evaluated again at the corrected state for
    /// `P = (I − K H(x⁺)) P`; the Joseph form keeps the prior `H`.
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

    pub(crate) fn correct(&mut self, z: &Vector<T, M>) -> Result<Innovation<T, N, M>, EstimateError> {
        let big_h = self.model.observe_jacobian(&self.x);
        let y = *z - self.model.observe(&self.x);
        let inn = innovation(&self.p, &big_h, &self.r, y)?;

        self.x += inn.k * y;
        let h_cov = match self.form {
            CovarianceForm::Simple => self.model.observe_jacobian(&self.x),
            CovarianceForm::Joseph => big_h,
        };
        self.p = corrected_covariance(self.form, &self.p, &inn.k, &h_cov, &self.r);
        Ok(inn)
    }
}
