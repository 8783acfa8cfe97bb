use super::*;
use crate::field::source::Category;
use approx::assert_relative_eq;

fn src(x: f64, y: f64, w: f64) -> Source {
    Source::new(x, y, w, Category::Neutral).unwrap()
}

#[test]
fn single_source_plain_inverse_distance() {
    let sources = [src(0.0, 0.0, 10.0)];
    let v = aggregate_potential(Point::new(3.0, 4.0), &sources, &Falloff::default());
    assert_relative_eq!(v, 2.0);
}

#[test]
fn classic_falloff_clamps_distance_to_one_then_halves() {
    let sources = [src(0.0, 0.0, 180.0), src(100.0, 0.0, 40.0)];
    let v = aggregate_potential(Point::new(0.0, 0.0), &sources, &Falloff::CLASSIC);
    // 180 / 0.5 + 40 / 50
    assert_relative_eq!(v, 360.8, epsilon = 1e-9);

    let half = aggregate_potential(Point::new(0.5, 0.0), &sources[..1], &Falloff::CLASSIC);
    assert_relative_eq!(half, 360.0);
}

#[test]
fn softened_falloff_three_sources() {
    let sources = [
        src(10.0, 0.0, 100.0),
        src(0.0, 20.0, 50.0),
        src(-30.0, -40.0, 25.0),
    ];
    let v = aggregate_potential(Point::ORIGIN, &sources, &Falloff::SOFTENED);
    let expected = 100.0 / 6.0 + 50.0 / 11.0 + 25.0 / 26.0;
    assert_relative_eq!(v, expected, epsilon = 1e-12);
}

#[test]
fn exponent_applies_before_scale() {
    let f = Falloff::new(0.01, 2.0, 0.0, 1.0).unwrap();
    let v = potential(Point::new(30.0, 40.0), &src(0.0, 0.0, 8.0), &f);
    assert_relative_eq!(v, 0.32, epsilon = 1e-12);
}

#[test]
fn zero_distance_uses_floor() {
    let v = potential(Point::new(5.0, 5.0), &src(5.0, 5.0, 7.0), &Falloff::default());
    assert_eq!(v, 7.0);
    assert!(v.is_finite());
}

#[test]
fn potential_is_positive_and_strictly_decreasing_outside_floor() {
    let s = src(0.0, 0.0, 3.0);
    for falloff in [Falloff::default(), Falloff::CLASSIC, Falloff::SOFTENED] {
        let mut prev = f64::INFINITY;
        for step in 3..2_000 {
            let d = f64::from(step) * 0.75;
            let v = potential(Point::new(d, 0.0), &s, &falloff);
            assert!(v > 0.0);
            assert!(v < prev, "not decreasing at d={d} for {falloff:?}");
            prev = v;
        }
        assert!(potential(Point::new(1e12, -1e12), &s, &falloff) > 0.0);
    }
}

#[test]
fn falloff_validation_rejects_bad_parameters() {
    assert!(Falloff::new(0.0, 1.0, 0.0, 1.0).is_err());
    assert!(Falloff::new(1.0, -1.0, 0.0, 1.0).is_err());
    assert!(Falloff::new(1.0, 1.0, -0.5, 1.0).is_err());
    assert!(Falloff::new(1.0, 1.0, 0.0, 0.0).is_err());
    assert!(Falloff::new(1.0, 1.0, 0.0, f64::NAN).is_err());
    assert!(Falloff::CLASSIC.validate().is_ok());
    assert!(Falloff::SOFTENED.validate().is_ok());
}

#[test]
fn nearest_source_prefers_lowest_index_on_ties() {
    let sources = [src(-10.0, 0.0, 1.0), src(10.0, 0.0, 1.0), src(0.0, 50.0, 1.0)];
    assert_eq!(nearest_source(Point::ORIGIN, &sources), Some(0));
    assert_eq!(nearest_source(Point::new(9.0, 1.0), &sources), Some(1));
    assert_eq!(nearest_source(Point::new(0.0, 40.0), &sources), Some(2));
    assert_eq!(nearest_source(Point::ORIGIN, &[]), None);
}

#[test]
fn empty_source_list_has_zero_potential() {
    assert_eq!(
        aggregate_potential(Point::ORIGIN, &[], &Falloff::default()),
        0.0
    );
}

#[test]
fn source_rejects_non_positive_weight() {
    assert!(Source::new(0.0, 0.0, 0.0, Category::Warm).is_err());
    assert!(Source::new(0.0, 0.0, -1.0, Category::Warm).is_err());
    assert!(Source::new(f64::INFINITY, 0.0, 1.0, Category::Warm).is_err());
}
