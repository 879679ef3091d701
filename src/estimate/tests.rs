use super::*;
use crate::linalg::LinalgError;
use crate::Matrix;
use core::cell::Cell;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!(
        (a - b).abs() < tol,
        "expected {} ≈ {} (diff = {}, tol = {})",
        a,
        b,
        (a - b).abs(),
        tol
    );
}

/// 1-D constant velocity with an acceleration input, position measured.
fn cv_model(dt: f64) -> LinearModel<f64, 2, 1, 1> {
    LinearModel::new(
        Matrix::new([[1.0, dt], [0.0, 1.0]]),
        Matrix::new([[0.5 * dt * dt], [dt]]),
        Matrix::new([[1.0, 0.0]]),
        Matrix::diagonal(0.01),
        Matrix::new([[0.5]]),
    )
}

/// Scalar random walk observed directly.
fn scalar_model(q: f64, r: f64) -> LinearModel<f64, 1, 1, 1> {
    LinearModel::new(
        Matrix::new([[1.0]]),
        Matrix::new([[0.0]]),
        Matrix::new([[1.0]]),
        Matrix::new([[q]]),
        Matrix::new([[r]]),
    )
}

/// A model whose measurement carries no information and no noise, so
/// `S = 0`.
fn blind_model() -> LinearModel<f64, 2, 1, 1> {
    LinearModel::new(
        Matrix::eye(),
        Matrix::zeros(),
        Matrix::zeros(),
        Matrix::diagonal(0.1),
        Matrix::zeros(),
    )
}

const MEASUREMENTS: [f64; 8] = [0.11, 0.18, 0.33, 0.39, 0.52, 0.58, 0.71, 0.80];

// ── Kalman tests ────────────────────────────────────────────────────

#[test]
fn kalman_initial_covariance_is_q() {
    let kf = Kalman::new(cv_model(0.1), Vector::from_array([1.0, 2.0]));
    assert_eq!(*kf.covariance(), Matrix::diagonal(0.01));
    assert_eq!(*kf.state_vector(), Vector::from_array([1.0, 2.0]));
    assert_eq!(kf.covariance_form(), CovarianceForm::Simple);
}

#[test]
fn kalman_predict() {
    let mut kf = Kalman::new(cv_model(1.0), Vector::from_array([0.0, 1.0]));
    kf.predict(&Vector::from_array([2.0]));

    // x = F x + B u = [0 + 1 + 1, 1 + 2]
    approx_eq(kf.state_vector()[0], 2.0, 1e-14);
    approx_eq(kf.state_vector()[1], 3.0, 1e-14);

    // P = F Q Fᵀ + Q
    let expected = Matrix::new([[0.03, 0.01], [0.01, 0.02]]);
    assert!(kf.covariance().float_equals(&expected, 1e-14));
}

#[test]
fn kalman_predict_free_uses_zero_input() {
    let mut a = Kalman::new(cv_model(0.1), Vector::from_array([0.0, 1.0]));
    let mut b = a;
    a.predict_free();
    b.predict(&Vector::zeros());
    assert_eq!(a, b);
}

#[test]
fn kalman_scalar_update() {
    let mut kf = Kalman::new(scalar_model(1.0, 1.0), Vector::zeros());
    kf.update(&Vector::from_array([2.0])).unwrap();

    // S = 2, K = 0.5
    approx_eq(kf.state_vector()[0], 1.0, 1e-14);
    approx_eq(kf.covariance()[(0, 0)], 0.5, 1e-14);
}

#[test]
fn kalman_update_shrinks_covariance() {
    let mut kf = Kalman::new(cv_model(0.1), Vector::zeros());
    for z in MEASUREMENTS {
        kf.predict(&Vector::zeros());
        let before = kf.covariance().trace();
        kf.update(&Vector::from_array([z])).unwrap();
        assert!(kf.covariance().trace() < before);
    }
}

#[test]
fn kalman_step_matches_predict_then_update() {
    let u = Vector::from_array([0.3]);
    let mut a = Kalman::new(cv_model(0.1), Vector::zeros());
    let mut b = a;
    for z in MEASUREMENTS {
        let z = Vector::from_array([z]);
        a.step(&u, &z).unwrap();
        b.predict(&u);
        b.update(&z).unwrap();
    }
    assert_eq!(a, b);
}

#[test]
fn kalman_tracks_constant_velocity() {
    let dt = 0.1;
    let mut kf = Kalman::new(cv_model(dt), Vector::zeros());

    // True motion: p = 5 + t, v = 1
    for k in 1..=200 {
        let t = k as f64 * dt;
        kf.step(&Vector::zeros(), &Vector::from_array([5.0 + t])).unwrap();
    }
    approx_eq(kf.state_vector()[0], 25.0, 0.05);
    approx_eq(kf.state_vector()[1], 1.0, 0.05);
}

#[test]
fn kalman_joseph_matches_simple() {
    let mut simple = Kalman::new(cv_model(0.1), Vector::zeros());
    let mut joseph = simple.with_covariance_form(CovarianceForm::Joseph);
    assert_eq!(joseph.covariance_form(), CovarianceForm::Joseph);

    for z in MEASUREMENTS {
        let z = Vector::from_array([z]);
        simple.step(&Vector::zeros(), &z).unwrap();
        joseph.step(&Vector::zeros(), &z).unwrap();
    }
    assert!(simple.state_vector().float_equals(joseph.state_vector(), 1e-12));
    assert!(simple.covariance().float_equals(joseph.covariance(), 1e-12));
}

#[test]
fn kalman_joseph_stays_symmetric() {
    let mut kf = Kalman::new(cv_model(0.1), Vector::zeros()).with_covariance_form(CovarianceForm::Joseph);
    for z in MEASUREMENTS {
        kf.step(&Vector::zeros(), &Vector::from_array([z])).unwrap();
    }
    let p = kf.covariance();
    approx_eq(p[(0, 1)], p[(1, 0)], 1e-14);
}

#[test]
fn kalman_reset() {
    let mut kf = Kalman::new(cv_model(0.1), Vector::zeros());
    kf.step(&Vector::zeros(), &Vector::from_array([1.0])).unwrap();
    kf.reset(Vector::from_array([3.0, 4.0]), Matrix::eye());
    assert_eq!(*kf.state_vector(), Vector::from_array([3.0, 4.0]));
    assert_eq!(*kf.covariance(), Matrix::eye());
}

#[test]
fn kalman_singular_innovation_leaves_state() {
    let mut kf = Kalman::new(blind_model(), Vector::from_array([1.0, -1.0]));
    kf.predict_free();
    let before = kf;

    let err = kf.update(&Vector::from_array([5.0])).unwrap_err();
    assert_eq!(err, EstimateError::SingularInnovation(LinalgError::ZeroPivot { index: 0 }));
    assert_eq!(kf, before);
}

#[test]
fn kalman_non_finite_gain_rejected() {
    // S = R is subnormal, so S⁻¹ overflows.
    let model = LinearModel::new(
        Matrix::new([[1.0_f64]]),
        Matrix::new([[0.0]]),
        Matrix::new([[0.0]]),
        Matrix::new([[1.0]]),
        Matrix::new([[1e-310]]),
    );
    let mut kf = Kalman::new(model, Vector::from_array([2.0]));
    let before = kf;
    let err = kf.update(&Vector::from_array([1.0])).unwrap_err();
    assert_eq!(err, EstimateError::SingularInnovation(LinalgError::NonFinite));
    assert_eq!(kf, before);
}

#[test]
fn kalman_f32() {
    let model = LinearModel::new(
        Matrix::new([[1.0_f32]]),
        Matrix::new([[0.0]]),
        Matrix::new([[1.0]]),
        Matrix::new([[1.0]]),
        Matrix::new([[1.0]]),
    );
    let mut kf = Kalman::new(model, Vector::zeros());
    kf.update(&Vector::from_array([2.0])).unwrap();
    assert!((kf.state_vector()[0] - 1.0).abs() < 1e-6);
}

// ── Adaptive Kalman tests ───────────────────────────────────────────

#[test]
fn adaptation_defaults() {
    let a = Adaptation::<f64>::default();
    assert_eq!(a.alpha, 0.1);
    assert_eq!(a.beta, 0.1);
}

#[test]
fn adaptive_noise_update() {
    let mut kf = AdaptiveKalman::new(scalar_model(0.01, 0.01), Vector::zeros(), Adaptation::default());
    kf.update(&Vector::from_array([3.0])).unwrap();

    // P = 0.01, S = 0.02, K = 0.5, y = 3
    approx_eq(kf.state_vector()[0], 1.5, 1e-12);
    // R = 0.9·0.01 + 0.1·(9 + 0.02)
    approx_eq(kf.measurement_noise()[(0, 0)], 0.911, 1e-12);
    // Q = 0.9·0.01 + 0.1·(0.5·9·0.5)
    approx_eq(kf.process_noise()[(0, 0)], 0.234, 1e-12);
    assert_eq!(kf.model().r, *kf.measurement_noise());
}

#[test]
fn adaptive_perfect_measurements() {
    let q0 = 0.5;
    let mut kf = AdaptiveKalman::new(scalar_model(q0, 0.1), Vector::from_array([5.0]), Adaptation::default());

    let mut r_prev = kf.measurement_noise()[(0, 0)];
    for k in 1..=20 {
        kf.step(&Vector::zeros(), &Vector::from_array([5.0])).unwrap();

        // Zero residual: Q only decays, R drifts toward S.
        let expected_q = q0 * 0.9_f64.powi(k);
        approx_eq(kf.process_noise()[(0, 0)], expected_q, 1e-12 * expected_q.max(1.0));
        let r = kf.measurement_noise()[(0, 0)];
        assert!(r >= r_prev);
        r_prev = r;
        approx_eq(kf.state_vector()[0], 5.0, 1e-12);
    }
}

#[test]
fn adaptive_zero_factors_match_plain_filter() {
    let off = Adaptation { alpha: 0.0, beta: 0.0 };
    let mut adaptive = AdaptiveKalman::new(cv_model(0.1), Vector::zeros(), off);
    let mut plain = Kalman::new(cv_model(0.1), Vector::zeros());
    for z in MEASUREMENTS {
        let z = Vector::from_array([z]);
        adaptive.step(&Vector::zeros(), &z).unwrap();
        plain.step(&Vector::zeros(), &z).unwrap();
    }
    assert!(adaptive.state_vector().float_equals(plain.state_vector(), 1e-14));
    assert!(adaptive.covariance().float_equals(plain.covariance(), 1e-14));
    assert_eq!(adaptive.model(), plain.model());
}

#[test]
fn adaptive_singular_leaves_noise() {
    let mut kf = AdaptiveKalman::new(blind_model(), Vector::from_array([1.0, 2.0]), Adaptation::default());
    kf.predict_free();
    let before = kf;
    assert!(kf.update(&Vector::from_array([7.0])).is_err());
    assert_eq!(kf, before);
    assert_eq!(*kf.process_noise(), Matrix::diagonal(0.1));
    assert_eq!(*kf.measurement_noise(), Matrix::zeros());
}

#[test]
fn adaptive_set_transition() {
    let mut kf = AdaptiveKalman::new(cv_model(0.1), Vector::from_array([0.0, 1.0]), Adaptation::default());
    kf.step(&Vector::zeros(), &Vector::from_array([0.1])).unwrap();
    let q = *kf.process_noise();

    kf.set_transition(Matrix::new([[1.0, 0.5], [0.0, 1.0]]));
    assert_eq!(kf.model().f, Matrix::new([[1.0, 0.5], [0.0, 1.0]]));
    assert_eq!(*kf.process_noise(), q);
}

// ── EKF tests ───────────────────────────────────────────────────────

/// Scalar identity model that counts measurement-Jacobian evaluations.
struct CountingModel {
    jacobian_calls: Cell<usize>,
}

impl NonlinearModel<f64, 1, 1, 1> for CountingModel {
    fn transition(&self, x: &Vector<f64, 1>, _u: &Vector<f64, 1>) -> Vector<f64, 1> {
        *x
    }

    fn transition_jacobian(&self, _x: &Vector<f64, 1>, _u: &Vector<f64, 1>) -> Matrix<f64, 1, 1> {
        Matrix::eye()
    }

    fn observe(&self, x: &Vector<f64, 1>) -> Vector<f64, 1> {
        *x
    }

    fn observe_jacobian(&self, _x: &Vector<f64, 1>) -> Matrix<f64, 1, 1> {
        self.jacobian_calls.set(self.jacobian_calls.get() + 1);
        Matrix::eye()
    }
}

fn counting() -> CountingModel {
    CountingModel {
        jacobian_calls: Cell::new(0),
    }
}

#[test]
fn ekf_linear_model_matches_kalman() {
    let dt = 0.1;
    let lin = cv_model(dt);
    let model = FnModel::new(
        move |x: &Vector<f64, 2>, u: &Vector<f64, 1>| lin.f * x + lin.b * u,
        move |_x: &Vector<f64, 2>, _u: &Vector<f64, 1>| lin.f,
        move |x: &Vector<f64, 2>| lin.h * x,
        move |_x: &Vector<f64, 2>| lin.h,
    );
    let mut ekf = Ekf::new(model, lin.q, lin.r, Vector::zeros());
    let mut kf = Kalman::new(lin, Vector::zeros());

    let u = Vector::from_array([0.2]);
    for z in MEASUREMENTS {
        let z = Vector::from_array([z]);
        ekf.step(&u, &z).unwrap();
        kf.step(&u, &z).unwrap();
    }
    assert!(ekf.state_vector().float_equals(kf.state_vector(), 1e-12));
    assert!(ekf.covariance().float_equals(kf.covariance(), 1e-12));
}

#[test]
fn ekf_predict_linearizes_at_new_state() {
    // x' = x², so F = 2x'. Evaluated at the prior state F would be 2.
    let model = FnModel::new(
        |x: &Vector<f64, 1>, _u: &Vector<f64, 1>| Vector::from_array([x[0] * x[0]]),
        |x: &Vector<f64, 1>, _u: &Vector<f64, 1>| Matrix::new([[2.0 * x[0]]]),
        |x: &Vector<f64, 1>| *x,
        |_x: &Vector<f64, 1>| Matrix::eye(),
    );
    let mut ekf = Ekf::new(model, Matrix::new([[1.0]]), Matrix::new([[1.0]]), Vector::from_array([2.0]));
    ekf.predict_free();

    approx_eq(ekf.state_vector()[0], 4.0, 1e-14);
    // P = 8·1·8 + 1
    approx_eq(ekf.covariance()[(0, 0)], 65.0, 1e-12);
}

#[test]
fn ekf_simple_form_reevaluates_jacobian() {
    let mut ekf = Ekf::new(counting(), Matrix::new([[1.0]]), Matrix::new([[1.0]]), Vector::zeros());
    ekf.update(&Vector::from_array([1.0])).unwrap();
    assert_eq!(ekf.model().jacobian_calls.get(), 2);
    ekf.step(&Vector::zeros(), &Vector::from_array([1.0])).unwrap();
    assert_eq!(ekf.model().jacobian_calls.get(), 4);
}

#[test]
fn ekf_joseph_form_reuses_jacobian() {
    let mut ekf = Ekf::new(counting(), Matrix::new([[1.0]]), Matrix::new([[1.0]]), Vector::zeros())
        .with_covariance_form(CovarianceForm::Joseph);
    ekf.update(&Vector::from_array([1.0])).unwrap();
    assert_eq!(ekf.model().jacobian_calls.get(), 1);
}

#[test]
fn ekf_nonlinear_measurement() {
    // Range to the origin, state = [px, py].
    let model = FnModel::new(
        |x: &Vector<f64, 2>, _u: &Vector<f64, 1>| *x,
        |_x: &Vector<f64, 2>, _u: &Vector<f64, 1>| Matrix::eye(),
        |x: &Vector<f64, 2>| Vector::from_array([x.norm()]),
        |x: &Vector<f64, 2>| {
            let r = x.norm();
            Matrix::new([[x[0] / r, x[1] / r]])
        },
    );
    let mut ekf = Ekf::new(
        model,
        Matrix::diagonal(1e-4),
        Matrix::new([[0.01]]),
        Vector::from_array([3.0, 3.0]),
    );
    for _ in 0..50 {
        ekf.step(&Vector::zeros(), &Vector::from_array([5.0])).unwrap();
    }
    approx_eq(ekf.state_vector().norm(), 5.0, 0.02);
    assert_eq!(*ekf.process_noise(), Matrix::diagonal(1e-4));
    assert_eq!(*ekf.measurement_noise(), Matrix::new([[0.01]]));
}

#[test]
fn ekf_singular_innovation() {
    let model = FnModel::new(
        |x: &Vector<f64, 1>, _u: &Vector<f64, 1>| *x,
        |_x: &Vector<f64, 1>, _u: &Vector<f64, 1>| Matrix::eye(),
        |_x: &Vector<f64, 1>| Vector::zeros(),
        |_x: &Vector<f64, 1>| Matrix::zeros(),
    );
    let mut ekf = Ekf::new(model, Matrix::new([[1.0]]), Matrix::new([[0.0]]), Vector::from_array([3.0]));
    let err = ekf.update(&Vector::from_array([1.0])).unwrap_err();
    assert!(matches!(err, EstimateError::SingularInnovation(_)));
    assert_eq!(ekf.state_vector()[0], 3.0);
    assert_eq!(ekf.covariance()[(0, 0)], 1.0);
}

#[test]
fn ekf_closure_model_is_debug() {
    let model = FnModel::new(
        |x: &Vector<f64, 1>, _u: &Vector<f64, 1>| *x,
        |_x: &Vector<f64, 1>, _u: &Vector<f64, 1>| Matrix::eye(),
        |x: &Vector<f64, 1>| *x,
        |_x: &Vector<f64, 1>| Matrix::eye(),
    );
    assert_eq!(format!("{:?}", model), "FnModel { .. }");

    let ekf = Ekf::new(model, Matrix::new([[1.0]]), Matrix::new([[1.0]]), Vector::from_array([2.0]));
    let printed = format!("{:?}", ekf);
    assert!(printed.starts_with("Ekf {"));
    assert!(printed.contains("FnModel { .. }"));
}

#[test]
fn ekf_reset() {
    let mut ekf = Ekf::new(counting(), Matrix::new([[1.0]]), Matrix::new([[1.0]]), Vector::zeros());
    ekf.reset(Vector::from_array([4.0]), Matrix::new([[2.0]]));
    assert_eq!(ekf.state_vector()[0], 4.0);
    assert_eq!(ekf.covariance()[(0, 0)], 2.0);
}

// ── Adaptive EKF tests ──────────────────────────────────────────────

#[test]
fn adaptive_ekf_matches_adaptive_kalman() {
    let lin = cv_model(0.1);
    let model = FnModel::new(
        move |x: &Vector<f64, 2>, u: &Vector<f64, 1>| lin.f * x + lin.b * u,
        move |_x: &Vector<f64, 2>, _u: &Vector<f64, 1>| lin.f,
        move |x: &Vector<f64, 2>| lin.h * x,
        move |_x: &Vector<f64, 2>| lin.h,
    );
    let a = Adaptation { alpha: 0.2, beta: 0.05 };
    let mut ekf = AdaptiveEkf::new(model, lin.q, lin.r, Vector::zeros(), a);
    let mut kf = AdaptiveKalman::new(lin, Vector::zeros(), a);
    assert_eq!(*ekf.adaptation(), a);

    for z in MEASUREMENTS {
        let z = Vector::from_array([z]);
        ekf.step(&Vector::zeros(), &z).unwrap();
        kf.step(&Vector::zeros(), &z).unwrap();
    }
    assert!(ekf.state_vector().float_equals(kf.state_vector(), 1e-12));
    assert!(ekf.covariance().float_equals(kf.covariance(), 1e-12));
    assert!(ekf.process_noise().float_equals(kf.process_noise(), 1e-12));
    assert!(ekf.measurement_noise().float_equals(kf.measurement_noise(), 1e-12));
}

#[test]
fn adaptive_ekf_singular_leaves_noise() {
    let model = FnModel::new(
        |x: &Vector<f64, 1>, _u: &Vector<f64, 1>| *x,
        |_x: &Vector<f64, 1>, _u: &Vector<f64, 1>| Matrix::eye(),
        |_x: &Vector<f64, 1>| Vector::zeros(),
        |_x: &Vector<f64, 1>| Matrix::zeros(),
    );
    let mut ekf = AdaptiveEkf::new(
        model,
        Matrix::new([[0.3]]),
        Matrix::new([[0.0]]),
        Vector::from_array([1.0]),
        Adaptation::default(),
    );
    ekf.predict_free();
    assert!(ekf.update(&Vector::from_array([2.0])).is_err());
    assert_eq!(ekf.process_noise()[(0, 0)], 0.3);
    assert_eq!(ekf.measurement_noise()[(0, 0)], 0.0);
    assert_eq!(ekf.state_vector()[0], 1.0);
}

// ── Error tests ─────────────────────────────────────────────────────

#[test]
fn error_display() {
    let e = EstimateError::SingularInnovation(LinalgError::ZeroPivot { index: 0 });
    assert_eq!(
        format!("{}", e),
        "innovation covariance is singular (zero pivot at index 0)"
    );
    let e: EstimateError = LinalgError::NonFinite.into();
    assert_eq!(
        format!("{}", e),
        "innovation covariance is singular (result is not finite)"
    );
}

#[cfg(feature = "std")]
#[test]
fn error_source() {
    use std::error::Error;
    let e = EstimateError::SingularInnovation(LinalgError::NonFinite);
    let source = e.source().unwrap();
    assert_eq!(source.to_string(), "result is not finite");
}
