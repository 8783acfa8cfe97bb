//! Field-line tracing.
//!
//! A trace starts just outside one source, steps radially away from it with a
//! distance-dependent stride and is pulled toward every other source in proportion to
//! that source's potential. The loop is bounded by `max_steps` regardless of the
//! source configuration.

use std::f64::consts::TAU;

use crate::field::potential::Falloff;
use crate::field::source::Source;
use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::hypot;

/// Below this distance the outward direction is taken from the start angle.
const DIRECTION_EPS: f64 = 1e-9;

/// Parameters for tracing one field line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceParams {
    /// Distance from the origin source at which a line starts.
    pub start_radius: f64,
    /// Extra start distance per fan index (`(i % stagger_period) * start_stagger`).
    #[serde(default)]
    pub start_stagger: f64,
    /// Period of the start stagger; `1` disables it.
    #[serde(default = "one_u32")]
    pub stagger_period: u32,
    /// Hard ceiling on the number of steps.
    pub max_steps: u32,
    /// Count the start point against `max_steps`, so a line holds at most `max_steps`
    /// points instead of `max_steps + 1`.
    #[serde(default)]
    pub start_counts_as_step: bool,
    /// Stop once the point is farther than this from the origin source.
    pub cutoff: f64,
    /// Constant part of the stride.
    pub base_step: f64,
    /// Stride grows by `distance / step_divisor`.
    pub step_divisor: f64,
    /// Falloff for the pull of the other sources.
    pub pull: Falloff,
    /// Multiplier applied to each pull.
    pub pull_damping: f64,
    /// Sources closer than this exert no pull.
    pub min_pull_distance: f64,
}

fn one_u32() -> u32 {
    1
}

impl TraceParams {
    /// 36-line fan look: at most 150 points, cutoff 600, pull `m / (2d) * 0.3`.
    pub const CLASSIC: Self = Self {
        start_radius: 20.0,
        start_stagger: 0.0,
        stagger_period: 1,
        max_steps: 150,
        start_counts_as_step: true,
        cutoff: 600.0,
        base_step: 3.0,
        step_divisor: 100.0,
        pull: Falloff {
            scale: 2.0,
            exponent: 1.0,
            offset: 0.0,
            floor: 1.0,
        },
        pull_damping: 0.3,
        min_pull_distance: 1.0,
    };

    /// 48-line fan look: staggered starts, 180 steps, cutoff 650, pull `m / (1.8d) * 0.25`.
    pub const REFINED: Self = Self {
        start_radius: 25.0,
        start_stagger: 5.0,
        stagger_period: 3,
        max_steps: 180,
        start_counts_as_step: false,
        cutoff: 650.0,
        base_step: 2.5,
        step_divisor: 120.0,
        pull: Falloff {
            scale: 1.8,
            exponent: 1.0,
            offset: 0.0,
            floor: 1.0,
        },
        pull_damping: 0.25,
        min_pull_distance: 1.0,
    };

    /// Reject parameters that would make stepping meaningless or non-finite.
    pub fn validate(&self) -> PosterResult<()> {
        let finite_nonneg = |v: f64| v.is_finite() && v >= 0.0;
        if !finite_nonneg(self.start_radius) || !finite_nonneg(self.start_stagger) {
            return Err(PosterError::validation(
                "trace start radius/stagger must be finite and >= 0",
            ));
        }
        if self.stagger_period == 0 {
            return Err(PosterError::validation("trace stagger period must be >= 1"));
        }
        if !finite_nonneg(self.cutoff) {
            return Err(PosterError::validation("trace cutoff must be finite and >= 0"));
        }
        if !finite_nonneg(self.base_step) {
            return Err(PosterError::validation("trace base step must be finite and >= 0"));
        }
        if !self.step_divisor.is_finite() || self.step_divisor <= 0.0 {
            return Err(PosterError::validation(
                "trace step divisor must be finite and > 0",
            ));
        }
        if !finite_nonneg(self.pull_damping) || !finite_nonneg(self.min_pull_distance) {
            return Err(PosterError::validation(
                "trace pull damping/min distance must be finite and >= 0",
            ));
        }
        self.pull.validate()
    }

    /// Start radius for fan index `i`.
    pub fn start_radius_for(&self, i: u32) -> f64 {
        self.start_radius + f64::from(i % self.stagger_period) * self.start_stagger
    }
}

/// A traced field line.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TracePath {
    /// Index of the source the line emanates from.
    pub origin: usize,
    /// Start angle in radians.
    pub angle: f64,
    /// Polyline points, start point first.
    pub points: Vec<Point>,
    /// Steps actually taken (`points.len() - 1`).
    pub steps: u32,
}

impl TracePath {
    /// Whether the line has at least `min_points` points.
    pub fn is_drawable(&self, min_points: usize) -> bool {
        self.points.len() >= min_points
    }
}

/// Trace one line from `sources[origin]` at `angle`, starting `start_radius` out.
pub fn trace_path(
    sources: &[Source],
    origin: usize,
    angle: f64,
    start_radius: f64,
    params: &TraceParams,
) -> PosterResult<TracePath> {
    params.validate()?;
    let center = sources
        .get(origin)
        .ok_or_else(|| {
            PosterError::validation(format!(
                "trace origin {origin} out of range ({} sources)",
                sources.len()
            ))
        })?
        .position();
    if !start_radius.is_finite() || start_radius < 0.0 {
        return Err(PosterError::validation(
            "trace start radius must be finite and >= 0",
        ));
    }

    let heading = Vec2::new(angle.cos(), angle.sin());
    let mut p = center + heading * start_radius;
    let step_limit = if params.start_counts_as_step {
        params.max_steps.saturating_sub(1)
    } else {
        params.max_steps
    };
    let mut points = Vec::with_capacity(step_limit as usize + 1);
    points.push(p);

    let mut steps = 0u32;
    for _ in 0..step_limit {
        let dx = p.x - center.x;
        let dy = p.y - center.y;
        let dist = hypot(dx, dy);
        if dist > params.cutoff {
            break;
        }

        let dir = if dist > DIRECTION_EPS {
            Vec2::new(dx / dist, dy / dist)
        } else {
            heading
        };
        let stride = params.base_step + dist / params.step_divisor;
        p += dir * stride;

        for (j, other) in sources.iter().enumerate() {
            if j == origin {
                continue;
            }
            let ox = other.x - p.x;
            let oy = other.y - p.y;
            let odist = hypot(ox, oy);
            if odist <= params.min_pull_distance || odist <= DIRECTION_EPS {
                continue;
            }
            let influence = params.pull.contribution(other.weight, odist);
            p.x += (ox / odist) * influence * params.pull_damping;
            p.y += (oy / odist) * influence * params.pull_damping;
        }

        points.push(p);
        steps += 1;
    }

    Ok(TracePath {
        origin,
        angle,
        points,
        steps,
    })
}

/// Trace `count` lines at evenly spaced angles around `sources[origin]`.
pub fn trace_fan(
    sources: &[Source],
    origin: usize,
    count: u32,
    params: &TraceParams,
) -> PosterResult<Vec<TracePath>> {
    params.validate()?;
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let angle = f64::from(i) / f64::from(count) * TAU;
        out.push(trace_path(
            sources,
            origin,
            angle,
            params.start_radius_for(i),
            params,
        )?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/field/trace.rs"]
mod tests;
