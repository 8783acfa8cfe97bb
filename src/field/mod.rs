//! Field-biased particle and line rendering core.
//!
//! Everything here is pure arithmetic over a source list. Randomness enters only
//! through the explicit generator owned by [`FieldSampler`].

pub(crate) mod potential;
pub(crate) mod recipe;
pub(crate) mod sampling;
pub(crate) mod source;
pub(crate) mod trace;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::foundation::error::PosterResult;

use self::sampling::{Mark, MarkParams, sample_marks};
use self::source::{Source, validate_sources};
use self::trace::{TracePath, TraceParams, trace_fan};

/// Owns a source list and the seeded generator used for every random draw of a render.
pub struct FieldSampler {
    sources: Vec<Source>,
    seed: u64,
    rng: ChaCha8Rng,
}

impl FieldSampler {
    /// Validate `sources` and seed a fresh generator.
    pub fn new(sources: Vec<Source>, seed: u64) -> PosterResult<Self> {
        validate_sources(&sources)?;
        Ok(Self {
            sources,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// The sources, in construction order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Seed the generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rejection-sample marks, advancing the generator.
    pub fn marks(&mut self, params: &MarkParams) -> PosterResult<Vec<Mark>> {
        sample_marks(&mut self.rng, &self.sources, params)
    }

    /// Trace `per_source` lines around every source. Consumes no randomness.
    pub fn traces(&self, per_source: u32, params: &TraceParams) -> PosterResult<Vec<TracePath>> {
        let mut out = Vec::with_capacity(self.sources.len() * per_source as usize);
        for origin in 0..self.sources.len() {
            out.extend(trace_fan(&self.sources, origin, per_source, params)?);
        }
        tracing::debug!(paths = out.len(), "field lines traced");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/sampler.rs"]
mod tests;
