use super::*;
use crate::field::potential::Falloff;
use crate::field::sampling::{Acceptance, SampleRegion};
use crate::field::source::Category;
use crate::foundation::core::Canvas;

fn sources() -> Vec<Source> {
    vec![
        Source::new(120.0, 140.0, 150.0, Category::Warm).unwrap(),
        Source::new(260.0, 300.0, 110.0, Category::Cool).unwrap(),
    ]
}

fn mark_params() -> MarkParams {
    MarkParams {
        falloff: Falloff::SOFTENED,
        acceptance: Acceptance::Power {
            normalizer: 140.0,
            exponent: 1.3,
        },
        region: SampleRegion::inset(Canvas::new(400, 400).unwrap(), 10.0).unwrap(),
        attempts: 3_000,
    }
}

#[test]
fn rejects_invalid_sources() {
    let mut bad = sources();
    bad[1].weight = 0.0;
    assert!(FieldSampler::new(bad, 1).is_err());
}

#[test]
fn same_seed_reproduces_marks_and_traces() {
    let mut a = FieldSampler::new(sources(), 42).unwrap();
    let mut b = FieldSampler::new(sources(), 42).unwrap();
    assert_eq!(a.marks(&mark_params()).unwrap(), b.marks(&mark_params()).unwrap());
    assert_eq!(
        a.traces(12, &TraceParams::REFINED).unwrap(),
        b.traces(12, &TraceParams::REFINED).unwrap()
    );
}

#[test]
fn successive_passes_advance_the_stream() {
    let mut s = FieldSampler::new(sources(), 9).unwrap();
    let first = s.marks(&mark_params()).unwrap();
    let second = s.marks(&mark_params()).unwrap();
    assert_ne!(first, second);
    assert_eq!(s.seed(), 9);
}

#[test]
fn traces_cover_every_source() {
    let s = FieldSampler::new(sources(), 0).unwrap();
    let paths = s.traces(5, &TraceParams::CLASSIC).unwrap();
    assert_eq!(paths.len(), 10);
    assert!(paths[..5].iter().all(|p| p.origin == 0));
    assert!(paths[5..].iter().all(|p| p.origin == 1));
}
