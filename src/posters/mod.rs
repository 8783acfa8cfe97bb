//! Poster compositions.
//!
//! Each poster is a function from options to a [`Scene`]. Field-based posters take their
//! sources and parameters from a [`FieldRecipe`] so configs can replace any of them.

pub(crate) mod gravitational_recall;
pub(crate) mod memory_force;
pub(crate) mod mnemonic_fields;
pub(crate) mod terminal_velocity;

use std::fmt;
use std::str::FromStr;

use crate::field::recipe::FieldRecipe;
use crate::foundation::error::{PosterError, PosterResult};
use crate::scene::model::Scene;

/// Seed used when neither the CLI nor a config supplies one.
pub const DEFAULT_SEED: u64 = 42;

/// Available posters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PosterKind {
    /// Five memory centers, field lines and a density map.
    GravitationalRecall,
    /// The refined SVG take: softened falloff, staggered fans, layered annotations.
    GravitationalRecallRefined,
    /// Distorted grid, spiral pathways and orbital spheres around one core.
    MemoryForce,
    /// Glowing memory spheres pulling on a central figure.
    MnemonicFields,
    /// Terminal panes, process grids and glowing type.
    TerminalVelocity,
}

impl PosterKind {
    /// Every poster, in listing order.
    pub const ALL: [Self; 5] = [
        Self::GravitationalRecall,
        Self::GravitationalRecallRefined,
        Self::MemoryForce,
        Self::MnemonicFields,
        Self::TerminalVelocity,
    ];

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GravitationalRecall => "gravitational-recall",
            Self::GravitationalRecallRefined => "gravitational-recall-refined",
            Self::MemoryForce => "memory-force",
            Self::MnemonicFields => "mnemonic-fields",
            Self::TerminalVelocity => "terminal-velocity",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::GravitationalRecall => {
                "memory centers with field lines and a linear-acceptance density map (2400x3200)"
            }
            Self::GravitationalRecallRefined => {
                "refined field study: power acceptance, 48-line fans, annotations (2400x3200)"
            }
            Self::MemoryForce => "distorted grid, spiral pathways and orbital spheres (1920x2400)",
            Self::MnemonicFields => "glowing memory spheres bending toward a figure (2400x3200)",
            Self::TerminalVelocity => "terminal panes, seeded process grids, glow type (2400x1350)",
        }
    }

    /// Default field setup, for posters built on the field module.
    pub fn field_recipe(self) -> Option<FieldRecipe> {
        match self {
            Self::GravitationalRecall => Some(gravitational_recall::classic_recipe()),
            Self::GravitationalRecallRefined => Some(gravitational_recall::refined_recipe()),
            Self::MemoryForce | Self::MnemonicFields | Self::TerminalVelocity => None,
        }
    }
}

impl fmt::Display for PosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosterKind {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                PosterError::validation(format!(
                    "unknown poster '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// Inputs to [`build_poster`] beyond the poster kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PosterOptions {
    /// Generator seed; [`DEFAULT_SEED`] when `None`.
    pub seed: Option<u64>,
    /// Replaces the poster's default field recipe. Ignored by posters without one.
    pub field: Option<FieldRecipe>,
}

impl PosterOptions {
    /// Options with only a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            field: None,
        }
    }

    /// Effective seed.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    fn recipe_for(&self, kind: PosterKind) -> PosterResult<FieldRecipe> {
        let recipe = match &self.field {
            Some(r) => r.clone(),
            None => kind.field_recipe().ok_or_else(|| {
                PosterError::validation(format!("poster '{kind}' has no field recipe"))
            })?,
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

/// Build the scene for `kind`.
#[tracing::instrument(skip(opts), fields(poster = kind.as_str(), seed = opts.seed()))]
pub fn build_poster(kind: PosterKind, opts: &PosterOptions) -> PosterResult<Scene> {
    if opts.field.is_some() && kind.field_recipe().is_none() {
        tracing::warn!("field overrides ignored: poster does not use the field module");
    }
    let seed = opts.seed();
    let scene = match kind {
        PosterKind::GravitationalRecall => {
            gravitational_recall::classic(&opts.recipe_for(kind)?, seed)?
        }
        PosterKind::GravitationalRecallRefined => {
            gravitational_recall::refined(&opts.recipe_for(kind)?, seed)?
        }
        PosterKind::MemoryForce => memory_force::build()?,
        PosterKind::MnemonicFields => mnemonic_fields::build()?,
        PosterKind::TerminalVelocity => terminal_velocity::build(seed)?,
    };
    tracing::info!(
        layers = scene.layers.len(),
        items = scene.item_count(),
        "poster built"
    );
    Ok(scene)
}

/// Baseline for text whose top edge sits at `top`.
///
/// Compositions place type by its top-left corner; ascent is taken as 0.8 em.
pub(crate) fn baseline(top: f64, size: f64) -> f64 {
    top + size * 0.8
}

/// Mass as printed in annotations: integers without a decimal point.
pub(crate) fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight.abs() < 1e15 {
        format!("{}", weight as i64)
    } else {
        format!("{weight:.1}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/posters/mod.rs"]
mod tests;
