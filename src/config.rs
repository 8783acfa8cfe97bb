//! JSON overrides layered over a poster's defaults.
//!
//! Every field is optional. Field parameters replace the matching parts of the poster's
//! [`FieldRecipe`]; the merged recipe is validated before anything is sampled. A seed given on
//! the command line wins over the one in the file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::fonts::FontBook;
use crate::field::potential::Falloff;
use crate::field::recipe::FieldRecipe;
use crate::field::sampling::Acceptance;
use crate::field::source::Source;
use crate::field::trace::TraceParams;
use crate::foundation::error::{PosterError, PosterResult};
use crate::posters::{PosterKind, PosterOptions};
use crate::scene::model::FontRole;

/// Overrides read from a JSON file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PosterConfig {
    /// Generator seed.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Rejection-sampling attempts.
    #[serde(default)]
    pub samples: Option<u32>,
    /// Replacement source list.
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    /// Falloff used for the density map.
    #[serde(default)]
    pub falloff: Option<Falloff>,
    /// Acceptance curve for the density map.
    #[serde(default)]
    pub acceptance: Option<Acceptance>,
    /// Partial field-line parameters.
    #[serde(default)]
    pub trace: Option<TraceConfig>,
    /// Field lines per source.
    #[serde(default)]
    pub lines_per_source: Option<u32>,
    /// Directory searched for font files.
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
    /// Explicit font files per role.
    #[serde(default)]
    pub fonts: FontFiles,
}

/// Field-line overrides; unset fields keep the poster's value.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Start distance from the origin source.
    #[serde(default)]
    pub start_radius: Option<f64>,
    /// Step ceiling.
    #[serde(default)]
    pub max_steps: Option<u32>,
    /// Whether the start point counts against the step ceiling.
    #[serde(default)]
    pub start_counts_as_step: Option<bool>,
    /// Stop distance from the origin source.
    #[serde(default)]
    pub cutoff: Option<f64>,
    /// Constant part of the stride.
    #[serde(default)]
    pub base_step: Option<f64>,
    /// Distance divisor for stride growth.
    #[serde(default)]
    pub step_divisor: Option<f64>,
    /// Falloff of the other sources' pull.
    #[serde(default)]
    pub pull: Option<Falloff>,
    /// Pull multiplier.
    #[serde(default)]
    pub pull_damping: Option<f64>,
}

impl TraceConfig {
    fn apply(&self, base: &mut TraceParams) {
        if let Some(v) = self.start_radius {
            base.start_radius = v;
        }
        if let Some(v) = self.max_steps {
            base.max_steps = v;
        }
        if let Some(v) = self.start_counts_as_step {
            base.start_counts_as_step = v;
        }
        if let Some(v) = self.cutoff {
            base.cutoff = v;
        }
        if let Some(v) = self.base_step {
            base.base_step = v;
        }
        if let Some(v) = self.step_divisor {
            base.step_divisor = v;
        }
        if let Some(v) = self.pull {
            base.pull = v;
        }
        if let Some(v) = self.pull_damping {
            base.pull_damping = v;
        }
    }
}

/// Font files pinned per role. They take precedence over directory and system lookup.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontFiles {
    /// Regular monospace face.
    #[serde(default)]
    pub mono: Option<PathBuf>,
    /// Bold monospace face.
    #[serde(default)]
    pub mono_bold: Option<PathBuf>,
    /// Regular sans-serif face.
    #[serde(default)]
    pub sans: Option<PathBuf>,
    /// Bold sans-serif face.
    #[serde(default)]
    pub sans_bold: Option<PathBuf>,
}

impl FontFiles {
    fn entries(&self) -> [(FontRole, Option<&PathBuf>); 4] {
        [
            (FontRole::Mono, self.mono.as_ref()),
            (FontRole::MonoBold, self.mono_bold.as_ref()),
            (FontRole::Sans, self.sans.as_ref()),
            (FontRole::SansBold, self.sans_bold.as_ref()),
        ]
    }

    fn entries_mut(&mut self) -> [&mut Option<PathBuf>; 4] {
        [
            &mut self.mono,
            &mut self.mono_bold,
            &mut self.sans,
            &mut self.sans_bold,
        ]
    }
}

impl PosterConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PosterResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PosterError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(s: &str) -> PosterResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PosterError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config file. Relative font paths are resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> PosterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosterError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(base) = path.parent() {
            cfg.resolve_relative_to(base);
        }
        Ok(cfg)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(rel) = p.as_ref().filter(|p| p.is_relative()) {
                *p = Some(base.join(rel));
            }
        };
        resolve(&mut self.font_dir);
        for entry in self.fonts.entries_mut() {
            resolve(entry);
        }
    }

    /// Whether any field parameter is overridden.
    pub fn touches_field(&self) -> bool {
        self.samples.is_some()
            || self.sources.is_some()
            || self.falloff.is_some()
            || self.acceptance.is_some()
            || self.trace.is_some()
            || self.lines_per_source.is_some()
    }

    /// `cli` if given, else the config's seed.
    pub fn seed_or(&self, cli: Option<u64>) -> Option<u64> {
        cli.or(self.seed)
    }

    /// Merge the field overrides over `base` and validate the result.
    pub fn field_recipe(&self, base: &FieldRecipe) -> PosterResult<FieldRecipe> {
        let mut recipe = base.clone();
        if let Some(sources) = &self.sources {
            recipe.sources = sources.clone();
        }
        if let Some(samples) = self.samples {
            recipe.marks.attempts = samples;
        }
        if let Some(falloff) = self.falloff {
            recipe.marks.falloff = falloff;
        }
        if let Some(acceptance) = self.acceptance {
            recipe.marks.acceptance = acceptance;
        }
        if let Some(trace) = &self.trace {
            trace.apply(&mut recipe.trace);
        }
        if let Some(lines) = self.lines_per_source {
            recipe.lines_per_source = lines;
        }
        recipe.validate()?;
        Ok(recipe)
    }

    /// Options for `kind`, with `cli_seed` taking precedence over the file.
    ///
    /// Field overrides are only merged for posters that have a field recipe.
    pub fn poster_options(
        &self,
        kind: PosterKind,
        cli_seed: Option<u64>,
    ) -> PosterResult<PosterOptions> {
        let field = match kind.field_recipe() {
            Some(base) if self.touches_field() => Some(self.field_recipe(&base)?),
            Some(_) => None,
            None => {
                if self.touches_field() {
                    tracing::warn!(poster = kind.as_str(), "config field overrides ignored");
                }
                None
            }
        };
        Ok(PosterOptions {
            seed: self.seed_or(cli_seed),
            field,
        })
    }

    /// Font book with the CLI directory (or the config's) and any pinned files.
    pub fn font_book(&self, cli_dir: Option<PathBuf>) -> FontBook {
        let mut book = FontBook::new(cli_dir.or_else(|| self.font_dir.clone()));
        for (role, path) in self.fonts.entries() {
            if let Some(path) = path {
                book.set_file(role, path.clone());
            }
        }
        book
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
