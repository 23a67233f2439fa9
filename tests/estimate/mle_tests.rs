//! Integration tests for maximum-likelihood estimation

use crate::test_helpers::{normal_family, rng};
use approx::assert_relative_eq;
use distr_family::estimate::{Estimator, EstimatorConfig, NegLogLikelihood};
use distr_family::optimize::{NelderMead, NelderMeadConfig};
use distr_family::parameters::ParamSource;
use distr_family::{Distr, DistrError, DistrFamily, Loss};
use ndarray::Array1;

fn scale_family() -> DistrFamily {
    DistrFamily::new(["sigma"], |p: &dyn ParamSource| {
        Distr::normal(0.0, p.value("sigma")?)
    })
}

#[test]
fn test_recovers_normal_scale() {
    let samples = Distr::normal(0.0, 1.5).unwrap().rand(500, &mut rng(2024));
    let fitted = scale_family()
        .estimate(&samples, &[1.0], &[(0.1, 5.0)])
        .unwrap();

    assert_eq!(fitted.len(), 1);
    assert!(
        (fitted["sigma"] - 1.5).abs() < 0.2,
        "sigma = {}",
        fitted["sigma"]
    );
}

#[test]
fn test_estimate_matches_closed_form() {
    let samples = Distr::normal(0.0, 1.5).unwrap().rand(500, &mut rng(7));
    let rms = (samples.mapv(|x| x * x).sum() / samples.len() as f64).sqrt();

    let estimate = Estimator::new(&scale_family())
        .with_bounds(&[(0.1, 5.0)])
        .fit(&samples, &[1.0])
        .unwrap();
    assert!(estimate.converged, "{}", estimate.message);
    assert_relative_eq!(estimate.params["sigma"], rms, epsilon = 1e-4);
}

#[test]
fn test_guess_outside_bounds_is_clamped() {
    let samples = Distr::normal(0.0, 1.0).unwrap().rand(200, &mut rng(3));
    let estimate = Estimator::new(&scale_family())
        .with_bounds(&[(0.1, 5.0)])
        .fit(&samples, &[50.0])
        .unwrap();
    let sigma = estimate.params["sigma"];
    assert!((0.1..=5.0).contains(&sigma));
    assert!((sigma - 1.0).abs() < 0.2);
}

#[test]
fn test_trimmed_names_define_the_search_order() {
    // "unused" is never read, so only two values are expected.
    let family = DistrFamily::new(["unused", "sigma", "mu"], |p: &dyn ParamSource| {
        Distr::normal(p.value("mu")?, p.value("sigma")?)
    });
    let samples = Distr::normal(3.0, 0.5).unwrap().rand(300, &mut rng(9));

    let err = family
        .estimate(&samples, &[0.0, 1.0, 1.0], &[])
        .unwrap_err();
    assert!(matches!(err, DistrError::DimensionMismatch(_)));

    let fitted = family
        .estimate(&samples, &[0.0, 1.0], &[(-10.0, 10.0), (0.05, 5.0)])
        .unwrap();
    assert!((fitted["mu"] - 3.0).abs() < 0.1);
    assert!((fitted["sigma"] - 0.5).abs() < 0.1);
}

#[test]
fn test_custom_loss_and_minimizer() {
    let samples = Distr::normal(1.0, 1.0).unwrap().rand(200, &mut rng(31));
    let mean = samples.mean().unwrap();

    // Squared distance between the fitted median and the sample mean.
    let loss = move |d: &Distr, _: &Array1<f64>| -> distr_family::Result<f64> {
        Ok((d.quantile(0.5) - mean).powi(2))
    };
    let minimizer = NelderMead::new(NelderMeadConfig {
        max_iterations: 500,
        ..NelderMeadConfig::default()
    });

    let estimate = Estimator::new(&normal_family())
        .with_bounds(&[(-5.0, 5.0), (0.5, 2.0)])
        .with_loss(loss)
        .with_minimizer(minimizer)
        .fit(&samples, &[0.0, 1.0])
        .unwrap();
    assert!((estimate.params["mu"] - mean).abs() < 1e-3);
}

#[test]
fn test_density_floor_is_configurable() {
    let family = DistrFamily::new(["b"], |p: &dyn ParamSource| Distr::uniform(0.0, p.value("b")?));
    let samples = Array1::from_vec(vec![0.5, 1.0, 3.0]);

    let strict = Estimator::new(&family)
        .with_bounds(&[(1.0, 1.0)])
        .fit(&samples, &[1.0])
        .unwrap();
    let lenient = Estimator::new(&family)
        .with_bounds(&[(1.0, 1.0)])
        .with_config(EstimatorConfig { density_floor: 1e-3 })
        .fit(&samples, &[1.0])
        .unwrap();

    let d = Distr::uniform(0.0, 1.0).unwrap();
    assert_relative_eq!(
        strict.loss,
        NegLogLikelihood::default().evaluate(&d, &samples).unwrap(),
        epsilon = 1e-9
    );
    assert!(lenient.loss < strict.loss);
}

#[test]
fn test_loss_error_aborts_fit() {
    let loss = |_: &Distr, _: &Array1<f64>| -> distr_family::Result<f64> {
        Err(DistrError::Other("custom loss refused".to_string()))
    };
    let err = Estimator::new(&scale_family())
        .with_bounds(&[(0.1, 5.0)])
        .with_loss(loss)
        .fit(&Array1::from_vec(vec![1.0]), &[1.0])
        .unwrap_err();
    assert!(matches!(err, DistrError::Other(msg) if msg == "custom loss refused"));
}
