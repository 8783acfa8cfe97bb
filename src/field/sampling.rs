//! Rejection-sampled mark placement.
//!
//! Candidates are drawn uniformly from a region and kept with a probability that grows
//! with the aggregate potential. This is a density visualization: reproducibility comes
//! from the caller's seeded generator, nothing else.

use rand::Rng;

use crate::field::potential::{Falloff, aggregate_potential, nearest_source, potential};
use crate::field::source::Source;
use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{PosterError, PosterResult};

/// Maps aggregate potential to an acceptance probability in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// `total / normalizer`.
    Linear {
        /// Potential at which acceptance saturates.
        normalizer: f64,
    },
    /// `(total / normalizer) ^ exponent`.
    Power {
        /// Potential at which acceptance saturates.
        normalizer: f64,
        /// Curve exponent; values above 1 thin out weak regions.
        exponent: f64,
    },
}

impl Acceptance {
    /// Validate the normalizer and exponent.
    pub fn validate(&self) -> PosterResult<()> {
        let (normalizer, exponent) = match *self {
            Self::Linear { normalizer } => (normalizer, 1.0),
            Self::Power {
                normalizer,
                exponent,
            } => (normalizer, exponent),
        };
        if !normalizer.is_finite() || normalizer <= 0.0 {
            return Err(PosterError::validation(
                "acceptance normalizer must be finite and > 0",
            ));
        }
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(PosterError::validation(
                "acceptance exponent must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Acceptance probability for an aggregate potential, clamped to `[0, 1]`.
    pub fn probability(&self, total: f64) -> f64 {
        let raw = match *self {
            Self::Linear { normalizer } => total / normalizer,
            Self::Power {
                normalizer,
                exponent,
            } => (total / normalizer).max(0.0).powf(exponent),
        };
        if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
    }
}

/// Rectangle candidates are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SampleRegion {
    /// Bounds (inclusive on both ends).
    pub rect: Rect,
    /// Snap candidates to integer coordinates.
    #[serde(default)]
    pub lattice: bool,
}

impl SampleRegion {
    /// Construct and validate.
    pub fn new(rect: Rect, lattice: bool) -> PosterResult<Self> {
        let r = Self { rect, lattice };
        r.validate()?;
        Ok(r)
    }

    /// Integer-lattice region covering `canvas` minus `margin` on every side.
    pub fn inset(canvas: Canvas, margin: f64) -> PosterResult<Self> {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        Self::new(Rect::new(margin, margin, w - margin, h - margin), true)
    }

    /// Check bounds are finite, ordered, and (for lattices) contain an integer point.
    pub fn validate(&self) -> PosterResult<()> {
        let r = self.rect;
        if ![r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) {
            return Err(PosterError::validation("sample region must be finite"));
        }
        if r.x0 > r.x1 || r.y0 > r.y1 {
            return Err(PosterError::validation("sample region is inverted"));
        }
        if self.lattice && (r.x0.ceil() > r.x1.floor() || r.y0.ceil() > r.y1.floor()) {
            return Err(PosterError::validation(
                "sample region contains no integer lattice point",
            ));
        }
        Ok(())
    }

    /// Draw one candidate: x first, then y.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let r = self.rect;
        if self.lattice {
            let x = rng.gen_range(r.x0.ceil() as i64..=r.x1.floor() as i64);
            let y = rng.gen_range(r.y0.ceil() as i64..=r.y1.floor() as i64);
            Point::new(x as f64, y as f64)
        } else {
            let x = rng.gen_range(r.x0..=r.x1);
            let y = rng.gen_range(r.y0..=r.y1);
            Point::new(x, y)
        }
    }
}

/// Parameters for one rejection-sampling pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarkParams {
    /// Falloff used for both the aggregate and the per-source potential.
    pub falloff: Falloff,
    /// Potential → probability curve.
    pub acceptance: Acceptance,
    /// Candidate region.
    pub region: SampleRegion,
    /// Number of candidates drawn.
    pub attempts: u32,
}

impl MarkParams {
    /// Validate every component.
    pub fn validate(&self) -> PosterResult<()> {
        self.falloff.validate()?;
        self.acceptance.validate()?;
        self.region.validate()
    }
}

/// An accepted sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Mark {
    /// Where the mark lands.
    pub position: Point,
    /// Aggregate potential at `position`.
    pub potential: f64,
    /// Index of the closest source.
    pub nearest: usize,
    /// Potential of the closest source alone.
    pub local_potential: f64,
    /// Uniform `[0, 1)` draw taken after acceptance, for size/opacity jitter.
    pub style_roll: f64,
}

/// Run rejection sampling over `sources`.
///
/// Per candidate the generator is consumed as: x, y, acceptance roll, and on
/// acceptance one style roll. An empty source list yields no marks and draws nothing.
pub fn sample_marks<R: Rng + ?Sized>(
    rng: &mut R,
    sources: &[Source],
    params: &MarkParams,
) -> PosterResult<Vec<Mark>> {
    params.validate()?;
    if sources.is_empty() {
        return Ok(Vec::new());
    }

    let mut marks = Vec::new();
    for _ in 0..params.attempts {
        let p = params.region.draw(rng);
        let total = aggregate_potential(p, sources, &params.falloff);
        let prob = params.acceptance.probability(total);
        let roll: f64 = rng.gen_range(0.0..1.0);
        if roll >= prob {
            continue;
        }
        let Some(nearest) = nearest_source(p, sources) else {
            continue;
        };
        let local_potential = potential(p, &sources[nearest], &params.falloff);
        let style_roll: f64 = rng.gen_range(0.0..1.0);
        marks.push(Mark {
            position: p,
            potential: total,
            nearest,
            local_potential,
            style_roll,
        });
    }

    tracing::debug!(
        attempts = params.attempts,
        accepted = marks.len(),
        "rejection sampling finished"
    );
    Ok(marks)
}

#[cfg(test)]
#[path = "../../tests/unit/field/sampling.rs"]
mod tests;
