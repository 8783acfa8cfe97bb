//! A complete field setup and the summary the `sample` command prints.

use crate::field::FieldSampler;
use crate::field::sampling::{Mark, MarkParams};
use crate::field::source::{Source, validate_sources};
use crate::field::trace::{TracePath, TraceParams};
use crate::foundation::error::{PosterError, PosterResult};

/// Everything a field-based poster needs besides the seed.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FieldRecipe {
    /// Weighted sources.
    pub sources: Vec<Source>,
    /// Rejection-sampling parameters.
    pub marks: MarkParams,
    /// Trace stepping parameters.
    pub trace: TraceParams,
    /// Field lines traced around every source.
    pub lines_per_source: u32,
}

impl FieldRecipe {
    /// Validate sources and parameters.
    pub fn validate(&self) -> PosterResult<()> {
        if self.sources.is_empty() {
            return Err(PosterError::validation("field needs at least one source"));
        }
        validate_sources(&self.sources)?;
        self.marks.validate()?;
        self.trace.validate()
    }

    /// Trace every fan, then sample marks, on one generator seeded with `seed`.
    #[tracing::instrument(skip(self), fields(sources = self.sources.len()))]
    pub fn run(&self, seed: u64) -> PosterResult<FieldRun> {
        self.validate()?;
        let mut sampler = FieldSampler::new(self.sources.clone(), seed)?;
        let paths = sampler.traces(self.lines_per_source, &self.trace)?;
        let marks = sampler.marks(&self.marks)?;
        Ok(FieldRun { seed, paths, marks })
    }
}

/// Output of [`FieldRecipe::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRun {
    /// Seed the run used.
    pub seed: u64,
    /// Field lines, grouped by origin source in source order.
    pub paths: Vec<TracePath>,
    /// Accepted marks in acceptance order.
    pub marks: Vec<Mark>,
}

/// Counts describing a [`FieldRun`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FieldStats {
    /// Seed the run used.
    pub seed: u64,
    /// Number of sources.
    pub sources: usize,
    /// Candidates drawn.
    pub attempts: u32,
    /// Candidates accepted.
    pub marks: usize,
    /// `marks / attempts`.
    pub acceptance_rate: f64,
    /// Accepted marks by nearest source.
    pub marks_per_source: Vec<usize>,
    /// Field lines traced.
    pub paths: usize,
    /// Steps summed over all paths.
    pub total_steps: u64,
    /// Average steps per path.
    pub mean_steps: f64,
    /// Paths that stopped at `max_steps` instead of the cutoff.
    pub capped_paths: usize,
}

impl FieldRun {
    /// Summarize this run against the recipe that produced it.
    pub fn stats(&self, recipe: &FieldRecipe) -> FieldStats {
        let mut marks_per_source = vec![0usize; recipe.sources.len()];
        for m in &self.marks {
            if let Some(n) = marks_per_source.get_mut(m.nearest) {
                *n += 1;
            }
        }
        let total_steps: u64 = self.paths.iter().map(|p| u64::from(p.steps)).sum();
        let mean_steps = if self.paths.is_empty() {
            0.0
        } else {
            total_steps as f64 / self.paths.len() as f64
        };
        let acceptance_rate = if recipe.marks.attempts == 0 {
            0.0
        } else {
            self.marks.len() as f64 / f64::from(recipe.marks.attempts)
        };
        FieldStats {
            seed: self.seed,
            sources: recipe.sources.len(),
            attempts: recipe.marks.attempts,
            marks: self.marks.len(),
            acceptance_rate,
            marks_per_source,
            paths: self.paths.len(),
            total_steps,
            mean_steps,
            capped_paths: self
                .paths
                .iter()
                .filter(|p| p.steps == recipe.trace.max_steps)
                .count(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/recipe.rs"]
mod tests;
