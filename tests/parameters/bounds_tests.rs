//! Integration tests for Bounds and BoundsTransform

use approx::assert_relative_eq;
use distr_family::parameters::{Bounds, BoundsError, BoundsTransform};

#[test]
fn test_transform_round_trip_inside_box() {
    let transform = BoundsTransform::new(Bounds::new(0.1, 5.0).unwrap());
    for value in [0.1, 0.5, 1.5, 4.99, 5.0] {
        let internal = transform.to_internal(value).unwrap();
        assert_relative_eq!(transform.to_external(internal), value, epsilon = 1e-9);
    }
}

#[test]
fn test_external_values_never_leave_the_box() {
    let lower = BoundsTransform::new(Bounds::min_only(2.0));
    let upper = BoundsTransform::new(Bounds::max_only(-1.0));
    let both = BoundsTransform::new(Bounds::new(-3.0, 3.0).unwrap());
    for internal in [-1e6, -10.0, -0.5, 0.0, 0.5, 10.0, 1e6] {
        assert!(lower.to_external(internal) >= 2.0);
        assert!(upper.to_external(internal) <= -1.0);
        let v = both.to_external(internal);
        assert!((-3.0..=3.0).contains(&v));
    }
}

#[test]
fn test_from_pairs() {
    let bounds = Bounds::from_pairs(&[(0.1, 5.0)], 3).unwrap();
    assert_eq!(bounds.len(), 3);
    assert_eq!(bounds[0], Bounds::new(0.1, 5.0).unwrap());
    assert_eq!(bounds[2], Bounds::unbounded());

    assert!(matches!(
        Bounds::from_pairs(&[(1.0, 0.0)], 1),
        Err(BoundsError::InvalidBounds { .. })
    ));
    assert!(matches!(
        Bounds::from_pairs(&[(0.0, 1.0), (0.0, 1.0)], 1),
        Err(BoundsError::TooManyBounds { given: 2, expected: 1 })
    ));
}

#[test]
fn test_bounds_json_uses_null_for_infinite_ends() {
    let json = serde_json::to_string(&Bounds::min_only(0.5)).unwrap();
    assert_eq!(json, r#"{"min":0.5,"max":null}"#);

    let back: Bounds = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Bounds::min_only(0.5));
}
