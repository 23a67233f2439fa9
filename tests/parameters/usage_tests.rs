//! Integration tests for parameter-usage detection

use distr_family::parameters::{detect_used_params, params, ParamSource, UsageTracker};
use distr_family::{Distr, DistrError, DistrFamily};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_declared_superset_is_trimmed() {
    let family = DistrFamily::new(["mu", "sigma", "unused"], |p: &dyn ParamSource| {
        Distr::normal(p.value("mu")?, p.value("sigma")?)
    });
    assert_eq!(family.param_names(), ["mu", "sigma"]);
}

#[test]
fn test_detection_is_sorted_and_deduplicated() {
    let used = detect_used_params(&names(&["z", "a", "m"]), |p| {
        Ok(p.value("z")? + p.value("a")? + p.value("z")? + p.value("m")?)
    });
    assert_eq!(used, names(&["a", "m", "z"]));
}

#[test]
fn test_undeclared_reads_are_reported() {
    let used = detect_used_params(&names(&["a"]), |p| Ok(p.value("a")? * p.value("b")?));
    assert_eq!(used, names(&["a", "b"]));
}

#[test]
fn test_failing_expression_yields_partial_set() {
    // Uniform(1, 1) is rejected, after both names have been read.
    let family = DistrFamily::new(["lo", "hi", "spare"], |p: &dyn ParamSource| {
        Distr::uniform(p.value("lo")?, p.value("hi")?)
    });
    assert_eq!(family.param_names(), ["hi", "lo"]);

    let early = DistrFamily::new(["x"], |_: &dyn ParamSource| {
        Err(DistrError::InvalidInput("not ready".to_string()))
    });
    assert!(early.param_names().is_empty());
}

#[test]
fn test_tracker_answers_every_key() {
    let tracker = UsageTracker::new(["known"], 1.0);
    assert_eq!(tracker.lookup("known"), Some(1.0));
    assert_eq!(tracker.lookup("other"), Some(1.0));
    assert_eq!(tracker.requests(), vec!["known", "other"]);
}

#[test]
fn test_hash_map_source() {
    let mut map = std::collections::HashMap::new();
    map.insert("sigma".to_string(), 2.0);
    map.insert("mu".to_string(), 1.0);

    let family = DistrFamily::new(["mu", "sigma"], |p: &dyn ParamSource| {
        Distr::normal(p.value("mu")?, p.value("sigma")?)
    });
    let from_hash = family.instantiate(&map).unwrap();
    let from_tree = family
        .instantiate(&params(&[("mu", 1.0), ("sigma", 2.0)]))
        .unwrap();
    assert_eq!(from_hash.pdf(0.3), from_tree.pdf(0.3));
}
