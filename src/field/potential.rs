//! Inverse-distance potential evaluation.
//!
//! Every contribution has the shape `weight / max(scale * d^exponent + offset, floor)`.
//! The floor keeps the divisor away from zero, so evaluation is total over finite
//! inputs and never needs to report an error.

use crate::field::source::Source;
use crate::foundation::core::Point;
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::hypot;

/// Distance falloff shared by sampling and trace stepping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Falloff {
    /// Multiplier `k` applied to the (exponentiated) distance.
    pub scale: f64,
    /// Distance exponent; `1.0` is plain inverse distance.
    #[serde(default = "one")]
    pub exponent: f64,
    /// Constant added to the scaled distance before flooring.
    #[serde(default)]
    pub offset: f64,
    /// Minimum divisor.
    #[serde(default = "one")]
    pub floor: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for Falloff {
    fn default() -> Self {
        Self {
            scale: 1.0,
            exponent: 1.0,
            offset: 0.0,
            floor: 1.0,
        }
    }
}

impl Falloff {
    /// `mass / (max(d, 1) * 0.5)`.
    pub const CLASSIC: Self = Self {
        scale: 0.5,
        exponent: 1.0,
        offset: 0.0,
        floor: 0.5,
    };

    /// `mass / (d * 0.5 + 1)`.
    pub const SOFTENED: Self = Self {
        scale: 0.5,
        exponent: 1.0,
        offset: 1.0,
        floor: 1.0,
    };

    /// Construct and validate.
    pub fn new(scale: f64, exponent: f64, offset: f64, floor: f64) -> PosterResult<Self> {
        let f = Self {
            scale,
            exponent,
            offset,
            floor,
        };
        f.validate()?;
        Ok(f)
    }

    /// Reject parameters that would break positivity or the zero-distance guard.
    pub fn validate(&self) -> PosterResult<()> {
        let finite_pos = |v: f64| v.is_finite() && v > 0.0;
        if !finite_pos(self.scale) {
            return Err(PosterError::validation("falloff scale must be finite and > 0"));
        }
        if !finite_pos(self.exponent) {
            return Err(PosterError::validation(
                "falloff exponent must be finite and > 0",
            ));
        }
        if !self.offset.is_finite() || self.offset < 0.0 {
            return Err(PosterError::validation(
                "falloff offset must be finite and >= 0",
            ));
        }
        if !finite_pos(self.floor) {
            return Err(PosterError::validation("falloff floor must be finite and > 0"));
        }
        Ok(())
    }

    /// Divisor for a distance `d >= 0`.
    pub fn divisor(&self, d: f64) -> f64 {
        let scaled = if self.exponent == 1.0 {
            self.scale * d
        } else {
            self.scale * d.powf(self.exponent)
        };
        (scaled + self.offset).max(self.floor)
    }

    /// Contribution of `weight` at distance `d`.
    pub fn contribution(&self, weight: f64, d: f64) -> f64 {
        weight / self.divisor(d)
    }
}

/// Potential of a single source at `p`.
pub fn potential(p: Point, source: &Source, falloff: &Falloff) -> f64 {
    let d = hypot(p.x - source.x, p.y - source.y);
    falloff.contribution(source.weight, d)
}

/// Sum of per-source potentials at `p`.
pub fn aggregate_potential(p: Point, sources: &[Source], falloff: &Falloff) -> f64 {
    sources.iter().map(|s| potential(p, s, falloff)).sum()
}

/// Index of the source closest to `p`; ties resolve to the lowest index.
pub fn nearest_source(p: Point, sources: &[Source]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in sources.iter().enumerate() {
        let d2 = (p.x - s.x).powi(2) + (p.y - s.y).powi(2);
        match best {
            Some((_, bd)) if d2 >= bd => {}
            _ => best = Some((i, d2)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
#[path = "../../tests/unit/field/potential.rs"]
mod tests;
