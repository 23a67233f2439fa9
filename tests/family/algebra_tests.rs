//! Integration tests for family construction and combinators

use crate::test_helpers::{grid, normal_family, rng, same_pdf, uniform_family};
use approx::assert_relative_eq;
use distr_family::parameters::{params, ParamSource};
use distr_family::{Combinator, Distr, DistrError, DistrFamily};

#[test]
fn test_constant_operand_matches_literal() {
    let family = normal_family();
    let p = params(&[("mu", 1.0), ("sigma", 0.5)]);
    let xs = grid(-2.0, 6.0, 33);

    let via_family = (&family + DistrFamily::from(3.0)).instantiate(&p).unwrap();
    let via_literal = (&family + 3.0).instantiate(&p).unwrap();
    let via_distr = (&family + Distr::constant(3.0)).instantiate(&p).unwrap();

    assert!(same_pdf(&via_family, &via_literal, &xs, 1e-12));
    assert!(same_pdf(&via_family, &via_distr, &xs, 1e-12));
    assert_relative_eq!(via_literal.cdf(4.0), 0.5, epsilon = 1e-12);
}

#[test]
fn test_scaling_by_constant() {
    let p = params(&[("mu", 0.0), ("sigma", 1.0)]);
    let doubled = (2.0 * normal_family()).instantiate(&p).unwrap();
    let wide = Distr::normal(0.0, 2.0).unwrap();
    assert!(same_pdf(&doubled, &wide, &grid(-5.0, 5.0, 21), 1e-12));
}

#[test]
fn test_division_is_not_multiplication() {
    let f = DistrFamily::new(["a"], |p: &dyn ParamSource| {
        Distr::uniform(p.value("a")?, p.value("a")? + 1.0)
    });
    let g = DistrFamily::new(["b"], |p: &dyn ParamSource| {
        Distr::uniform(p.value("b")?, p.value("b")? + 1.0)
    });
    let p = params(&[("a", 1.0), ("b", 3.0)]);

    let ratio = (&f / &g).instantiate(&p).unwrap();
    let product = (&f * &g).instantiate(&p).unwrap();

    assert_eq!(ratio.range(), (0.25, 2.0 / 3.0));
    assert_eq!(product.range(), (3.0, 8.0));
    assert!(ratio.pdf(0.5) > 0.0);
    assert_eq!(product.pdf(0.5), 0.0);
}

#[test]
fn test_shared_names_bind_to_one_value() {
    let a = DistrFamily::new(["s"], |p: &dyn ParamSource| Distr::normal(0.0, p.value("s")?));
    let b = DistrFamily::new(["s"], |p: &dyn ParamSource| Distr::normal(0.0, p.value("s")?));
    let sum = &a + &b;
    assert_eq!(sum.param_names(), ["s"]);

    let d = sum.instantiate(&params(&[("s", 3.0)])).unwrap();
    let expected = Distr::normal(0.0, 18.0f64.sqrt()).unwrap();
    assert!(same_pdf(&d, &expected, &grid(-8.0, 8.0, 17), 1e-6));
}

#[test]
fn test_trunc_range_is_the_interval() {
    let truncated = normal_family().trunc(-1.5, 2.5);
    let d = truncated
        .instantiate(&params(&[("mu", 0.0), ("sigma", 3.0)]))
        .unwrap();
    assert_eq!(d.range(), (-1.5, 2.5));
    assert_eq!(d.pdf(-2.0), 0.0);
    assert_relative_eq!(d.cdf(2.5), 1.0);
}

#[test]
fn test_trunc_range_wider_than_support() {
    let truncated = uniform_family().trunc(-3.0, 3.0);
    for b in [0.5, 1.0, 2.0] {
        let d = truncated
            .instantiate(&params(&[("a", 0.0), ("b", b)]))
            .unwrap();
        assert_eq!(d.range(), (-3.0, 3.0));
        assert_eq!(d.pdf(-1.0), 0.0);
        assert_relative_eq!(d.cdf(b), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_censor_keeps_base_range() {
    let censored = uniform_family().censor(2.0, 8.0);
    let d = censored
        .instantiate(&params(&[("a", 0.0), ("b", 10.0)]))
        .unwrap();
    assert_eq!(d.range(), (0.0, 10.0));
    assert_relative_eq!(d.pdf(1.0), 0.2, epsilon = 1e-12);
    assert_relative_eq!(d.pdf(9.0), 0.2, epsilon = 1e-12);
    assert_relative_eq!(d.pdf(5.0), 0.1, epsilon = 1e-12);
}

#[test]
fn test_two_component_mixture() {
    let mix = DistrFamily::merge(
        Combinator::Mix(vec![0.5, 0.5]),
        vec![normal_family(), uniform_family()],
    )
    .unwrap();
    assert_eq!(mix.param_names(), ["a", "b", "mu", "sigma"]);

    let d = mix
        .instantiate(&params(&[("a", 4.0), ("b", 6.0), ("mu", 0.0), ("sigma", 1.0)]))
        .unwrap();
    let normal = Distr::normal(0.0, 1.0).unwrap();
    assert_relative_eq!(d.pdf(0.0), 0.5 * normal.pdf(0.0), epsilon = 1e-12);
    assert_relative_eq!(d.pdf(5.0), 0.5 * normal.pdf(5.0) + 0.25, epsilon = 1e-12);

    let samples = d.rand(1_000, &mut rng(17));
    assert_eq!(samples.len(), 1_000);
    assert!(samples.iter().any(|&x| x > 4.0));
    assert!(samples.iter().any(|&x| x < 3.0));
}

#[test]
fn test_merge_sums_many_operands() {
    let parts: Vec<DistrFamily> = ["x", "y", "z"]
        .iter()
        .map(|name| {
            let name = name.to_string();
            DistrFamily::new([name.clone()], move |p: &dyn ParamSource| {
                Ok(Distr::constant(p.value(&name)?))
            })
        })
        .collect();

    let total = DistrFamily::merge(Combinator::Add, parts).unwrap();
    assert_eq!(total.param_names(), ["x", "y", "z"]);
    let d = total
        .instantiate(&params(&[("x", 1.0), ("y", 2.0), ("z", 4.0)]))
        .unwrap();
    assert_eq!(d.point_mass(), Some(7.0));
}

#[test]
fn test_instantiation_errors_surface() {
    let family = normal_family() + uniform_family();
    let err = family
        .instantiate(&params(&[("mu", 0.0), ("sigma", 1.0), ("a", 0.0)]))
        .unwrap_err();
    assert!(matches!(err, DistrError::MissingParameter(name) if name == "b"));

    let err = (normal_family() / 0.0)
        .instantiate(&params(&[("mu", 0.0), ("sigma", 1.0)]))
        .unwrap_err();
    assert!(matches!(err, DistrError::InvalidInput(_)));
}

#[test]
fn test_families_are_immutable() {
    let base = normal_family();
    let _shifted = &base + 10.0;
    let _truncated = base.trunc(0.0, 1.0);

    let d = base
        .instantiate(&params(&[("mu", 0.0), ("sigma", 1.0)]))
        .unwrap();
    assert_eq!(d.range(), (f64::NEG_INFINITY, f64::INFINITY));
    assert_eq!(base.param_names(), ["mu", "sigma"]);
}
