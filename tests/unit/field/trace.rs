use super::*;
use crate::field::source::Category;

fn src(x: f64, y: f64, w: f64) -> Source {
    Source::new(x, y, w, Category::Neutral).unwrap()
}

#[test]
fn lone_source_traces_a_straight_ray_until_cutoff() {
    let sources = [src(0.0, 0.0, 100.0)];
    let path = trace_path(&sources, 0, 0.0, 20.0, &TraceParams::CLASSIC).unwrap();
    assert_eq!(path.points[0], Point::new(20.0, 0.0));
    assert!(path.points.iter().all(|p| p.y == 0.0));
    assert!(path.points.windows(2).all(|w| w[1].x > w[0].x));
    let last = path.points[path.points.len() - 1];
    assert!(last.x > TraceParams::CLASSIC.cutoff);
    assert!(path.steps < TraceParams::CLASSIC.max_steps);
    assert_eq!(path.points.len(), path.steps as usize + 1);
}

#[test]
fn stride_grows_with_distance() {
    let sources = [src(0.0, 0.0, 1.0)];
    let path = trace_path(&sources, 0, 0.0, 0.0, &TraceParams::CLASSIC).unwrap();
    let first = path.points[1].x - path.points[0].x;
    let later = path.points[20].x - path.points[19].x;
    assert_eq!(first, 3.0);
    assert!(later > first);
}

#[test]
fn other_sources_bend_the_line() {
    let sources = [src(0.0, 0.0, 100.0), src(300.0, -200.0, 400.0)];
    let path = trace_path(&sources, 0, 0.0, 20.0, &TraceParams::REFINED).unwrap();
    assert!(path.points[1..].iter().all(|p| p.y < 0.0));
}

#[test]
fn overlapping_sources_terminate_without_nan() {
    let sources = [src(50.0, 50.0, 1e6), src(50.0, 50.0, 1e6), src(50.0, 50.5, 1e6)];
    let params = TraceParams {
        cutoff: 1e12,
        ..TraceParams::CLASSIC
    };
    for origin in 0..sources.len() {
        for start in [0.0, 0.25, 20.0] {
            let path = trace_path(&sources, origin, 1.0, start, &params).unwrap();
            assert!(path.steps <= params.max_steps);
            assert!(path.points.len() <= params.max_steps as usize + 1);
            assert!(path.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }
}

#[test]
fn zero_step_line_is_bounded_by_max_steps() {
    // Nothing ever crosses the cutoff: base step 0 and a lone source at the start point.
    let sources = [src(0.0, 0.0, 1.0)];
    let params = TraceParams {
        base_step: 0.0,
        max_steps: 37,
        start_counts_as_step: false,
        ..TraceParams::CLASSIC
    };
    let path = trace_path(&sources, 0, 0.0, 0.0, &params).unwrap();
    assert_eq!(path.steps, 37);
    assert_eq!(path.points.len(), 38);
}

#[test]
fn classic_lines_count_the_start_point() {
    let sources = [src(0.0, 0.0, 1.0)];
    let stalled = |max_steps, start_counts_as_step| TraceParams {
        base_step: 0.0,
        max_steps,
        start_counts_as_step,
        ..TraceParams::CLASSIC
    };
    let classic = trace_path(&sources, 0, 0.0, 0.0, &stalled(150, true)).unwrap();
    assert_eq!(classic.points.len(), 150);
    assert_eq!(classic.steps, 149);

    let refined = trace_path(&sources, 0, 0.0, 0.0, &stalled(180, false)).unwrap();
    assert_eq!(refined.points.len(), 181);

    // The start point is always kept.
    let empty = trace_path(&sources, 0, 0.0, 0.0, &stalled(0, true)).unwrap();
    assert_eq!(empty.points.len(), 1);
    assert_eq!(empty.steps, 0);
}

#[test]
fn fan_spaces_angles_and_staggers_starts() {
    let sources = [src(0.0, 0.0, 10.0)];
    let fan = trace_fan(&sources, 0, 48, &TraceParams::REFINED).unwrap();
    assert_eq!(fan.len(), 48);
    assert_eq!(fan[0].angle, 0.0);
    assert!((fan[12].angle - TAU / 4.0).abs() < 1e-12);

    let r = |p: &TracePath| hypot(p.points[0].x, p.points[0].y);
    assert!((r(&fan[0]) - 25.0).abs() < 1e-9);
    assert!((r(&fan[1]) - 30.0).abs() < 1e-9);
    assert!((r(&fan[2]) - 35.0).abs() < 1e-9);
    assert!((r(&fan[3]) - 25.0).abs() < 1e-9);
}

#[test]
fn invalid_inputs_are_rejected() {
    let sources = [src(0.0, 0.0, 10.0)];
    assert!(trace_path(&sources, 3, 0.0, 20.0, &TraceParams::CLASSIC).is_err());
    assert!(trace_path(&sources, 0, 0.0, -1.0, &TraceParams::CLASSIC).is_err());
    let bad = TraceParams {
        step_divisor: 0.0,
        ..TraceParams::CLASSIC
    };
    assert!(trace_fan(&sources, 0, 4, &bad).is_err());
    let bad = TraceParams {
        stagger_period: 0,
        ..TraceParams::REFINED
    };
    assert!(bad.validate().is_err());
}
