use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};

/// A straight RGBA8 color plus a separate opacity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Paint {
    /// Base color; its own alpha is multiplied by `opacity`.
    pub color: Rgba8,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Paint {
    /// Paint with the given opacity.
    pub fn new(color: Rgba8, opacity: f64) -> Self {
        Self { color, opacity }
    }

    /// Fully opaque paint.
    pub fn solid(color: Rgba8) -> Self {
        Self::new(color, 1.0)
    }

    /// Color with `opacity` folded into alpha.
    pub fn effective(self) -> Rgba8 {
        self.color.faded(self.opacity)
    }

    /// Combined alpha in `[0, 1]`.
    pub fn effective_alpha(self) -> f64 {
        self.color.alpha_f64() * self.opacity.clamp(0.0, 1.0)
    }

    fn validate(&self) -> PosterResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(PosterError::validation(format!(
                "paint opacity must be in [0, 1] (got {})",
                self.opacity
            )));
        }
        Ok(())
    }
}

/// Outline style.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub paint: Paint,
    /// Width in pixels.
    pub width: f64,
    /// Optional `(dash, gap)` pattern.
    pub dash: Option<(f64, f64)>,
}

impl StrokeStyle {
    /// Solid stroke.
    pub fn new(paint: Paint, width: f64) -> Self {
        Self {
            paint,
            width,
            dash: None,
        }
    }

    /// Dashed copy of this stroke.
    pub fn dashed(mut self, dash: f64, gap: f64) -> Self {
        self.dash = Some((dash, gap));
        self
    }

    fn validate(&self) -> PosterResult<()> {
        self.paint.validate()?;
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(PosterError::validation("stroke width must be finite and >= 0"));
        }
        if let Some((dash, gap)) = self.dash
            && (!dash.is_finite() || !gap.is_finite() || dash <= 0.0 || gap < 0.0)
        {
            return Err(PosterError::validation(
                "stroke dash must be > 0 and gap >= 0",
            ));
        }
        Ok(())
    }
}

/// Font family role. Resolved to a concrete face by the font book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Monospace, regular weight.
    Mono,
    /// Monospace, bold.
    MonoBold,
    /// Sans-serif, regular weight.
    Sans,
    /// Sans-serif, bold.
    SansBold,
}

impl FontRole {
    /// Every role, regular before bold within a family.
    pub const ALL: [Self; 4] = [Self::Mono, Self::MonoBold, Self::Sans, Self::SansBold];

    /// Generic CSS family used by the SVG writer.
    pub fn generic_family(self) -> &'static str {
        match self {
            Self::Mono | Self::MonoBold => "monospace",
            Self::Sans | Self::SansBold => "sans-serif",
        }
    }

    /// Whether this role asks for a bold face.
    pub fn is_bold(self) -> bool {
        matches!(self, Self::MonoBold | Self::SansBold)
    }
}

/// Horizontal anchoring of a text run relative to its origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    /// Origin is the left edge.
    #[default]
    Start,
    /// Origin is the horizontal center.
    Middle,
    /// Origin is the right edge.
    End,
}

impl TextAnchor {
    /// SVG `text-anchor` keyword.
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }

    /// Offset to apply to a run of `advance` pixels.
    pub fn offset(self, advance: f64) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Middle => -advance / 2.0,
            Self::End => -advance,
        }
    }
}

/// One line of text. `origin` sits on the baseline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextItem {
    /// Text content.
    pub content: String,
    /// Baseline anchor point.
    pub origin: Point,
    /// Font size in pixels.
    pub size: f64,
    /// Family role.
    pub font: FontRole,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Extra advance between glyphs in pixels.
    pub letter_spacing: f64,
    /// CSS weight hint (SVG only; raster weight comes from the role).
    pub weight: u16,
    /// Fill paint.
    pub paint: Paint,
}

impl TextItem {
    /// Start-anchored regular-weight text.
    pub fn new(
        content: impl Into<String>,
        origin: Point,
        size: f64,
        font: FontRole,
        paint: Paint,
    ) -> Self {
        Self {
            content: content.into(),
            origin,
            size,
            font,
            anchor: TextAnchor::Start,
            letter_spacing: 0.0,
            weight: if font.is_bold() { 700 } else { 400 },
            paint,
        }
    }

    /// Set the anchor.
    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set letter spacing.
    pub fn spaced(mut self, letter_spacing: f64) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    /// Set the weight hint.
    pub fn weighted(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    fn validate(&self) -> PosterResult<()> {
        finite_point(self.origin, "text origin")?;
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(PosterError::validation("text size must be finite and > 0"));
        }
        if !self.letter_spacing.is_finite() {
            return Err(PosterError::validation("text letter spacing must be finite"));
        }
        self.paint.validate()
    }
}

/// A drawable primitive.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawItem {
    /// Axis-aligned rectangle, optionally rounded.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Corner radius; `0` for square corners.
        corner_radius: f64,
        /// Interior fill.
        fill: Option<Paint>,
        /// Outline.
        stroke: Option<StrokeStyle>,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke style.
        stroke: StrokeStyle,
    },
    /// Open or closed polyline.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Close back to the first point.
        closed: bool,
        /// Stroke style.
        stroke: StrokeStyle,
    },
    /// Arbitrary Bezier path.
    Path {
        /// Geometry.
        path: BezPath,
        /// Interior fill.
        fill: Option<Paint>,
        /// Outline.
        stroke: Option<StrokeStyle>,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Interior fill.
        fill: Option<Paint>,
        /// Outline.
        stroke: Option<StrokeStyle>,
    },
    /// Disk filled with a radial gradient from `inner` at the center to `outer` at the rim.
    RadialGlow {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Color at the center.
        inner: Paint,
        /// Color at the rim.
        outer: Paint,
    },
    /// Rectangle filled with a top-to-bottom gradient.
    VerticalGradient {
        /// Bounds.
        rect: Rect,
        /// Color along the top edge.
        top: Rgba8,
        /// Color along the bottom edge.
        bottom: Rgba8,
    },
    /// A line of text.
    Text(TextItem),
}

impl DrawItem {
    /// Check geometry and paints.
    pub fn validate(&self) -> PosterResult<()> {
        match self {
            Self::Rect {
                rect,
                corner_radius,
                fill,
                stroke,
            } => {
                finite_rect(*rect)?;
                non_negative(*corner_radius, "corner radius")?;
                validate_fill_stroke(fill.as_ref(), stroke.as_ref())
            }
            Self::Line { from, to, stroke } => {
                finite_point(*from, "line start")?;
                finite_point(*to, "line end")?;
                stroke.validate()
            }
            Self::Polyline { points, stroke, .. } => {
                for p in points {
                    finite_point(*p, "polyline vertex")?;
                }
                stroke.validate()
            }
            Self::Path { path, fill, stroke } => {
                for el in path.elements() {
                    let ok = match *el {
                        kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => p.is_finite(),
                        kurbo::PathEl::QuadTo(a, b) => a.is_finite() && b.is_finite(),
                        kurbo::PathEl::CurveTo(a, b, c) => {
                            a.is_finite() && b.is_finite() && c.is_finite()
                        }
                        kurbo::PathEl::ClosePath => true,
                    };
                    if !ok {
                        return Err(PosterError::validation("path coordinates must be finite"));
                    }
                }
                validate_fill_stroke(fill.as_ref(), stroke.as_ref())
            }
            Self::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                finite_point(*center, "circle center")?;
                non_negative(*radius, "circle radius")?;
                validate_fill_stroke(fill.as_ref(), stroke.as_ref())
            }
            Self::RadialGlow {
                center,
                radius,
                inner,
                outer,
            } => {
                finite_point(*center, "glow center")?;
                non_negative(*radius, "glow radius")?;
                inner.validate()?;
                outer.validate()
            }
            Self::VerticalGradient { rect, .. } => finite_rect(*rect),
            Self::Text(t) => t.validate(),
        }
    }
}

/// An ordered group of items rasterized together and composited onto the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Layer {
    /// Name, used for SVG group ids and logs.
    pub name: String,
    /// Items in paint order.
    pub items: Vec<DrawItem>,
    /// Gaussian blur applied to the whole layer before compositing.
    pub blur_sigma: Option<f64>,
    /// Layer opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Layer {
    /// Empty, unblurred, opaque layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            blur_sigma: None,
            opacity: 1.0,
        }
    }

    fn validate(&self) -> PosterResult<()> {
        if let Some(sigma) = self.blur_sigma
            && (!sigma.is_finite() || sigma <= 0.0)
        {
            return Err(PosterError::validation(format!(
                "layer '{}': blur sigma must be finite and > 0",
                self.name
            )));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(PosterError::validation(format!(
                "layer '{}': opacity must be in [0, 1]",
                self.name
            )));
        }
        for (i, item) in self.items.iter().enumerate() {
            item.validate().map_err(|e| {
                PosterError::validation(format!("layer '{}' item {i}: {e}", self.name))
            })?;
        }
        Ok(())
    }
}

/// A complete poster: canvas, opaque background and layers in paint order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Scene {
    /// Output surface.
    pub canvas: Canvas,
    /// Opaque background color.
    pub background: Rgba8,
    /// Layers, bottom first.
    pub layers: Vec<Layer>,
}

impl Scene {
    /// Check the canvas and every layer.
    pub fn validate(&self) -> PosterResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        for layer in &self.layers {
            layer.validate()?;
        }
        Ok(())
    }

    /// Total number of draw items.
    pub fn item_count(&self) -> usize {
        self.layers.iter().map(|l| l.items.len()).sum()
    }

    /// Iterate every text item.
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.layers.iter().flat_map(|l| {
            l.items.iter().filter_map(|item| match item {
                DrawItem::Text(t) => Some(t),
                _ => None,
            })
        })
    }
}

fn finite_point(p: Point, what: &str) -> PosterResult<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(PosterError::validation(format!("{what} must be finite")))
    }
}

fn finite_rect(r: Rect) -> PosterResult<()> {
    if [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PosterError::validation("rect must be finite"))
    }
}

fn non_negative(v: f64, what: &str) -> PosterResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(PosterError::validation(format!(
            "{what} must be finite and >= 0 (got {v})"
        )))
    }
}

fn validate_fill_stroke(fill: Option<&Paint>, stroke: Option<&StrokeStyle>) -> PosterResult<()> {
    if let Some(f) = fill {
        f.validate()?;
    }
    if let Some(s) = stroke {
        s.validate()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
