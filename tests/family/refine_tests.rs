//! Integration tests for refinement

use crate::test_helpers::{grid, normal_family, same_pdf, uniform_family};
use distr_family::parameters::{params, ParamSource, Params};
use distr_family::{Distr, DistrFamily, Refinement};

fn three_params() -> DistrFamily {
    // N(mu, sigma) shifted by an exponential with rate lambda.
    let shift = DistrFamily::new(["lambda"], |p: &dyn ParamSource| {
        Distr::exponential(p.value("lambda")?)
    });
    normal_family() + shift
}

#[test]
fn test_refine_all_equals_instantiate() {
    let family = normal_family();
    let all = params(&[("mu", -1.0), ("sigma", 0.7)]);

    let refined = match family.refine(&all).unwrap() {
        Refinement::Distr(d) => d,
        Refinement::Family(f) => panic!("expected a distribution, got {}", f),
    };
    let direct = family.instantiate(&all).unwrap();

    assert_eq!(refined.range(), direct.range());
    assert!(same_pdf(&refined, &direct, &grid(-4.0, 2.0, 25), 1e-15));
}

#[test]
fn test_refine_with_superset_then_instantiate() {
    let family = uniform_family();
    let superset = params(&[("a", 1.0), ("b", 4.0), ("c", 100.0)]);

    let collapsed = family.refine(&superset).unwrap();
    assert!(collapsed.is_distr());
    let d = collapsed.into_distr().unwrap();
    assert_eq!(d.range(), (1.0, 4.0));
}

#[test]
fn test_disjoint_refinements_compose() {
    let family = three_params();
    assert_eq!(family.param_names(), ["lambda", "mu", "sigma"]);

    let full = params(&[("lambda", 2.0), ("mu", 0.5), ("sigma", 1.0)]);
    let direct = family.instantiate(&full).unwrap();

    let step1 = family
        .refine(&params(&[("mu", 0.5)]))
        .unwrap()
        .into_family();
    assert_eq!(step1.param_names(), ["lambda", "sigma"]);

    let step2 = step1
        .refine(&params(&[("sigma", 1.0)]))
        .unwrap()
        .into_family();
    assert_eq!(step2.param_names(), ["lambda"]);

    let last = step2
        .refine(&params(&[("lambda", 2.0)]))
        .unwrap()
        .into_distr()
        .unwrap();

    let xs = grid(-2.0, 5.0, 15);
    assert!(same_pdf(&last, &direct, &xs, 1e-9));

    // Binding in a different order reaches the same distribution.
    let other = family
        .refine(&params(&[("lambda", 2.0), ("sigma", 1.0)]))
        .unwrap()
        .into_family()
        .instantiate(&params(&[("mu", 0.5)]))
        .unwrap();
    assert!(same_pdf(&other, &direct, &xs, 1e-9));
}

#[test]
fn test_refined_family_combines_further() {
    let family = normal_family()
        .refine(&params(&[("mu", 2.0)]))
        .unwrap()
        .into_family();
    let truncated = family.trunc(0.0, 4.0);
    assert_eq!(truncated.param_names(), ["sigma"]);

    let d = truncated.instantiate(&params(&[("sigma", 1.0)])).unwrap();
    assert_eq!(d.range(), (0.0, 4.0));
    assert!((d.cdf(2.0) - 0.5).abs() < 1e-12);
}

#[test]
fn test_refine_with_empty_mapping_keeps_everything() {
    let family = normal_family();
    let refined = family.refine(&Params::new()).unwrap().into_family();
    assert_eq!(refined.param_names(), family.param_names());
    assert_eq!(refined.to_string(), "<DistributionFamily(mu, sigma)>");
}
