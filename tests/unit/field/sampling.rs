use super::*;
use crate::field::source::Category;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn two_sources() -> Vec<Source> {
    vec![
        Source::new(100.0, 100.0, 180.0, Category::Warm).unwrap(),
        Source::new(300.0, 250.0, 90.0, Category::Cool).unwrap(),
    ]
}

fn params(acceptance: Acceptance, attempts: u32) -> MarkParams {
    MarkParams {
        falloff: Falloff::CLASSIC,
        acceptance,
        region: SampleRegion::inset(Canvas::new(400, 400).unwrap(), 20.0).unwrap(),
        attempts,
    }
}

#[test]
fn acceptance_is_clamped_to_unit_interval() {
    let linear = Acceptance::Linear { normalizer: 150.0 };
    assert_eq!(linear.probability(75.0), 0.5);
    assert_eq!(linear.probability(1e9), 1.0);
    assert_eq!(linear.probability(-3.0), 0.0);
    assert_eq!(linear.probability(f64::NAN), 0.0);

    let power = Acceptance::Power {
        normalizer: 140.0,
        exponent: 1.3,
    };
    assert_eq!(power.probability(140.0 * 50.0), 1.0);
    assert_eq!(power.probability(0.0), 0.0);
    let mid = power.probability(70.0);
    assert!((mid - 0.5f64.powf(1.3)).abs() < 1e-12);
}

#[test]
fn acceptance_validation() {
    assert!(Acceptance::Linear { normalizer: 0.0 }.validate().is_err());
    assert!(
        Acceptance::Power {
            normalizer: 1.0,
            exponent: f64::INFINITY
        }
        .validate()
        .is_err()
    );
}

#[test]
fn lattice_region_draws_integer_points_inside() {
    let region = SampleRegion::new(Rect::new(80.0, 80.0, 90.0, 85.0), true).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..500 {
        let p = region.draw(&mut rng);
        assert_eq!(p.x.fract(), 0.0);
        assert_eq!(p.y.fract(), 0.0);
        assert!((80.0..=90.0).contains(&p.x));
        assert!((80.0..=85.0).contains(&p.y));
    }
}

#[test]
fn region_validation() {
    assert!(SampleRegion::new(Rect::new(10.0, 0.0, 5.0, 10.0), false).is_err());
    assert!(SampleRegion::new(Rect::new(0.2, 0.0, 0.8, 10.0), true).is_err());
    assert!(SampleRegion::inset(Canvas::new(100, 100).unwrap(), 60.0).is_err());
}

#[test]
fn saturated_acceptance_keeps_every_candidate() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let p = params(Acceptance::Linear { normalizer: 1e-9 }, 300);
    let marks = sample_marks(&mut rng, &two_sources(), &p).unwrap();
    assert_eq!(marks.len(), 300);
}

#[test]
fn marks_record_nearest_source_and_rolls() {
    let sources = two_sources();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let marks = sample_marks(
        &mut rng,
        &sources,
        &params(Acceptance::Linear { normalizer: 150.0 }, 5_000),
    )
    .unwrap();
    assert!(!marks.is_empty());
    for m in &marks {
        assert_eq!(Some(m.nearest), nearest_source(m.position, &sources));
        assert!((0.0..1.0).contains(&m.style_roll));
        assert!(m.local_potential > 0.0 && m.local_potential <= m.potential);
    }
}

#[test]
fn same_seed_reproduces_marks() {
    let sources = two_sources();
    let p = params(
        Acceptance::Power {
            normalizer: 140.0,
            exponent: 1.3,
        },
        4_000,
    );
    let a = sample_marks(&mut ChaCha8Rng::seed_from_u64(42), &sources, &p).unwrap();
    let b = sample_marks(&mut ChaCha8Rng::seed_from_u64(42), &sources, &p).unwrap();
    let c = sample_marks(&mut ChaCha8Rng::seed_from_u64(43), &sources, &p).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn empty_sources_yield_no_marks() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let marks = sample_marks(
        &mut rng,
        &[],
        &params(Acceptance::Linear { normalizer: 1.0 }, 100),
    )
    .unwrap();
    assert!(marks.is_empty());
}
