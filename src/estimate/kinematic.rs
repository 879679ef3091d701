use crate::matrix::vector::Vector;
use crate::traits::FloatScalar;
use crate::Matrix;

use super::{Adaptation, AdaptiveKalman, EstimateError, LinearModel};

/// Transition matrix of an `N`-state derivative chain
/// `[p, p', p'', …]` over a step `dt`.
///
/// Upper triangular with `F[i][j] = dt^(j−i) / (j−i)!` for `j ≥ i`
/// (the truncated Taylor expansion of each derivative).
///
/// ```
/// use kalmat::estimate::taylor_transition;
/// use kalmat::Matrix;
///
/// let f = taylor_transition::<f64, 3>(2.0);
/// assert_eq!(f, Matrix::new([[1.0, 2.0, 2.0], [0.0, 1.0, 2.0], [0.0, 0.0, 1.0]]));
/// ```
pub fn taylor_transition<T: FloatScalar, const N: usize>(dt: T) -> Matrix<T, N, N> {
    let mut coef = [T::one(); N];
    let mut k_t = T::zero();
    for k in 1..N {
        k_t = k_t + T::one();
        coef[k] = coef[k - 1] * dt / k_t;
    }
    Matrix::from_fn(|i, j| if j >= i { coef[j - i] } else { T::zero() })
}

/// Adaptive Kalman tracker for a derivative-chain state with a variable
/// time step.
///
/// The state is `N` successive derivatives of one quantity (position,
/// velocity, acceleration, …) starting at zero. There is no control
/// input, `Q` and `R` start as `covariance · I`, and the transition is
/// [`taylor_transition`] for the current step, rebuilt by
/// [`update_dt`](Self::update_dt).
///
/// ```
/// use kalmat::estimate::{Adaptation, KinematicTracker};
/// use kalmat::Vector;
///
/// let mut t = KinematicTracker::<f64, 3, 1>::position(0.1, 0.01, Adaptation::default());
/// for k in 1..=200 {
///     t.step(&Vector::from_array([0.2 * k as f64])).unwrap();
/// }
/// // Velocity converges toward 2.
/// assert!((t.state_vector()[1] - 2.0).abs() < 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicTracker<T, const N: usize, const M: usize> {
    filter: AdaptiveKalman<T, N, M, 1>,
    dt: T,
}

impl<T: FloatScalar, const N: usize, const M: usize> KinematicTracker<T, N, M> {
    /// Tracker observing `h · x`.
    pub fn with_observation(dt: T, covariance: T, h: Matrix<T, M, N>, adaptation: Adaptation<T>) -> Self {
        let model = LinearModel::new(
            taylor_transition(dt),
            Matrix::zeros(),
            h,
            Matrix::diagonal(covariance),
            Matrix::diagonal(covariance),
        );
        Self {
            filter: AdaptiveKalman::new(model, Vector::zeros(), adaptation),
            dt,
        }
    }

    /// Current time step.
    pub fn dt(&self) -> T {
        self.dt
    }

    /// Change the time step and rebuild the transition matrix.
    ///
    /// State, covariance and the adapted noise estimates carry over.
    pub fn update_dt(&mut self, dt: T) {
        log::debug!("kinematic tracker step {:?} -> {:?}", self.dt, dt);
        self.dt = dt;
        self.filter.set_transition(taylor_transition(dt));
    }

    /// The wrapped adaptive filter.
    pub fn filter(&self) -> &AdaptiveKalman<T, N, M, 1> {
        &self.filter
    }

    #[inline]
    pub fn state_vector(&self) -> &Vector<T, N> {
        self.filter.state_vector()
    }

    #[inline]
    pub fn covariance(&self) -> &Matrix<T, N, N> {
        self.filter.covariance()
    }

    pub fn predict(&mut self) -> &mut Self {
        self.filter.predict_free();
        self
    }

    pub fn update(&mut self, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        self.filter.update(z)?;
        Ok(self)
    }

    /// `predict()` followed by `update(z)`.
    pub fn step(&mut self, z: &Vector<T, M>) -> Result<&mut Self, EstimateError> {
        self.predict().update(z)
    }
}

impl<T: FloatScalar, const N: usize> KinematicTracker<T, N, 1> {
    /// Observes the zeroth derivative (position).
    pub fn position(dt: T, covariance: T, adaptation: Adaptation<T>) -> Self {
        const { assert!(N >= 1, "position tracking needs at least one state") };
        let mut h = Matrix::zeros();
        h[(0, 0)] = T::one();
        Self::with_observation(dt, covariance, h, adaptation)
    }

    /// Observes the second derivative (acceleration).
    pub fn acceleration(dt: T, covariance: T, adaptation: Adaptation<T>) -> Self {
        const { assert!(N >= 3, "acceleration tracking needs at least three states") };
        let mut h = Matrix::zeros();
        h[(0, 2)] = T::one();
        Self::with_observation(dt, covariance, h, adaptation)
    }
}

impl<T: FloatScalar, const N: usize> KinematicTracker<T, N, 2> {
    /// Observes position and acceleration, `z = [p, p'']`.
    pub fn position_acceleration(dt: T, covariance: T, adaptation: Adaptation<T>) -> Self {
        const { assert!(N >= 3, "acceleration tracking needs at least three states") };
        let mut h = Matrix::zeros();
        h[(0, 0)] = T::one();
        h[(1, 2)] = T::one();
        Self::with_observation(dt, covariance, h, adaptation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taylor_coefficients() {
        let f = taylor_transition::<f64, 5>(0.5);
        assert_eq!(f[(0, 0)], 1.0);
        assert_eq!(f[(0, 1)], 0.5);
        assert_eq!(f[(0, 2)], 0.125);
        assert!((f[(0, 3)] - 0.5_f64.powi(3) / 6.0).abs() < 1e-15);
        assert!((f[(0, 4)] - 0.5_f64.powi(4) / 24.0).abs() < 1e-15);
        assert_eq!(f[(1, 3)], f[(0, 2)]);
        assert_eq!(f[(4, 0)], 0.0);
    }

    #[test]
    fn taylor_composes() {
        // Shifting by dt twice equals shifting by 2 dt.
        let a = taylor_transition::<f64, 4>(0.3);
        let b = taylor_transition::<f64, 4>(0.6);
        assert!((a * a).float_equals(&b, 1e-12));
    }

    #[test]
    fn observation_matrices() {
        let a = Adaptation::default();
        let p = KinematicTracker::<f64, 3, 1>::position(0.1, 1.0, a);
        assert_eq!(p.filter().model().h, Matrix::new([[1.0, 0.0, 0.0]]));

        let acc = KinematicTracker::<f64, 4, 1>::acceleration(0.1, 1.0, a);
        assert_eq!(acc.filter().model().h, Matrix::new([[0.0, 0.0, 1.0, 0.0]]));

        let both = KinematicTracker::<f64, 3, 2>::position_acceleration(0.1, 1.0, a);
        assert_eq!(
            both.filter().model().h,
            Matrix::new([[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
        );
        assert_eq!(both.filter().model().r, Matrix::eye());
        assert_eq!(both.filter().model().b, Matrix::zeros());
    }

    #[test]
    fn update_dt_rebuilds_transition() {
        let mut t = KinematicTracker::<f64, 3, 1>::position(0.1, 0.5, Adaptation::default());
        t.step(&Vector::from_array([1.0])).unwrap();
        let x = *t.state_vector();

        t.update_dt(0.2);
        assert_eq!(t.dt(), 0.2);
        assert_eq!(t.filter().model().f, taylor_transition(0.2));
        assert_eq!(*t.state_vector(), x);
    }
}
