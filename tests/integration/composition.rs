//! End-to-end scenarios

use crate::test_helpers::{normal_family, rng};
use distr_family::parameters::{params, ParamSource};
use distr_family::{Distr, DistrFamily, Estimator};

fn signal_plus_noise() -> DistrFamily {
    let signal = DistrFamily::new(["mu"], |p: &dyn ParamSource| Distr::normal(p.value("mu")?, 1.0));
    let noise = DistrFamily::new(["sigma"], |p: &dyn ParamSource| {
        Distr::normal(0.0, p.value("sigma")?)
    });
    signal + noise
}

#[test]
fn test_fit_location_of_convolved_family() {
    let truth = (Distr::normal(2.0, 1.0).unwrap() + Distr::normal(0.0, 0.5).unwrap()).unwrap();
    let samples = truth.rand(300, &mut rng(41));

    let family = signal_plus_noise()
        .refine(&params(&[("sigma", 0.5)]))
        .unwrap()
        .into_family();
    assert_eq!(family.param_names(), ["mu"]);

    let estimate = Estimator::new(&family)
        .with_bounds(&[(-5.0, 5.0)])
        .fit(&samples, &[0.0])
        .unwrap();
    assert!(
        (estimate.params["mu"] - 2.0).abs() < 0.25,
        "{}",
        estimate
    );
}

#[test]
fn test_fit_location_of_truncated_family() {
    let samples = Distr::normal(0.5, 1.0)
        .unwrap()
        .trunc(-1.0, 2.0)
        .unwrap()
        .rand(1_000, &mut rng(5));
    assert!(samples.iter().all(|&x| (-1.0..=2.0).contains(&x)));

    let family = normal_family()
        .trunc(-1.0, 2.0)
        .refine(&params(&[("sigma", 1.0)]))
        .unwrap()
        .into_family();

    let fitted = family.estimate(&samples, &[0.0], &[(-3.0, 3.0)]).unwrap();
    assert!((fitted["mu"] - 0.5).abs() < 0.2, "mu = {}", fitted["mu"]);
}

#[test]
fn test_shared_family_across_threads() {
    let family = signal_plus_noise();
    let p = params(&[("mu", 1.0), ("sigma", 2.0)]);
    let expected = family.instantiate(&p).unwrap().cdf(1.0);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| family.instantiate(&p).map(|d| d.cdf(1.0))))
            .collect();
        for handle in handles {
            let value = handle.join().unwrap().unwrap();
            assert_eq!(value, expected);
        }
    });
}

#[test]
fn test_weighted_mixture_parameter() {
    // The weight itself is a parameter of the expression.
    let family = DistrFamily::new(["w"], |p: &dyn ParamSource| {
        let w = p.value("w")?;
        Distr::mixture(
            &[w, 1.0 - w],
            vec![Distr::uniform(0.0, 1.0)?, Distr::uniform(2.0, 3.0)?],
        )
    });
    assert_eq!(family.param_names(), ["w"]);

    let samples = Distr::mixture(
        &[0.3, 0.7],
        vec![
            Distr::uniform(0.0, 1.0).unwrap(),
            Distr::uniform(2.0, 3.0).unwrap(),
        ],
    )
    .unwrap()
    .rand(1_000, &mut rng(13));
    let share = samples.iter().filter(|&&x| x < 1.5).count() as f64 / 1_000.0;

    let fitted = family
        .estimate(&samples, &[0.5], &[(0.01, 0.99)])
        .unwrap();
    assert!((fitted["w"] - share).abs() < 1e-3);
}
