use crate::foundation::core::Point;
use crate::foundation::error::{PosterError, PosterResult};

/// Color family of a source. Only used to pick a palette entry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Warm accent (amber/copper).
    Warm,
    /// Cool accent (steel blue).
    Cool,
    /// Neutral gray.
    #[default]
    Neutral,
}

impl Category {
    /// Stable lowercase name, used for SVG group ids.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Neutral => "neutral",
        }
    }
}

/// A weighted point exerting influence on the potential field.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Source {
    /// Position in canvas coordinates.
    pub x: f64,
    /// Position in canvas coordinates.
    pub y: f64,
    /// Mass; strictly positive.
    pub weight: f64,
    /// Color family.
    #[serde(default)]
    pub category: Category,
    /// Optional annotation text (e.g. `M₁`).
    #[serde(default)]
    pub label: Option<String>,
}

impl Source {
    /// Construct and validate a source.
    pub fn new(x: f64, y: f64, weight: f64, category: Category) -> PosterResult<Self> {
        let s = Self {
            x,
            y,
            weight,
            category,
            label: None,
        };
        s.validate()?;
        Ok(s)
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Position as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check the finite-position and positive-weight invariants.
    pub fn validate(&self) -> PosterResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(PosterError::validation("source position must be finite"));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(PosterError::validation(format!(
                "source weight must be finite and > 0 (got {})",
                self.weight
            )));
        }
        Ok(())
    }
}

/// Validate every source in a list.
pub fn validate_sources(sources: &[Source]) -> PosterResult<()> {
    for (i, s) in sources.iter().enumerate() {
        s.validate()
            .map_err(|e| PosterError::validation(format!("source {i}: {e}")))?;
    }
    Ok(())
}
