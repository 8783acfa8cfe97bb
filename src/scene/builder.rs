use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::scene::model::{
    DrawItem, FontRole, Layer, Paint, Scene, StrokeStyle, TextAnchor, TextItem,
};

/// Builder for [`Scene`](crate::Scene).
///
/// Items go into the most recently opened layer. A `"base"` layer is open from the start.
pub struct SceneBuilder {
    canvas: Canvas,
    background: Rgba8,
    layers: Vec<Layer>,
}

impl SceneBuilder {
    /// Start a scene with an opaque background.
    pub fn new(canvas: Canvas, background: Rgba8) -> Self {
        Self {
            canvas,
            background: Rgba8 { a: 255, ..background },
            layers: vec![Layer::new("base")],
        }
    }

    /// Canvas being drawn on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Open a new layer; subsequent items go into it.
    pub fn layer(&mut self, name: impl Into<String>) -> &mut Self {
        self.layers.push(Layer::new(name));
        self
    }

    /// Open a layer that is Gaussian-blurred with `sigma` before compositing.
    pub fn blurred_layer(&mut self, name: impl Into<String>, sigma: f64) -> &mut Self {
        let mut layer = Layer::new(name);
        layer.blur_sigma = Some(sigma);
        self.layers.push(layer);
        self
    }

    /// Set the opacity of the current layer.
    pub fn layer_opacity(&mut self, opacity: f64) -> &mut Self {
        self.current().opacity = opacity;
        self
    }

    /// Append a raw item to the current layer.
    pub fn push(&mut self, item: DrawItem) -> &mut Self {
        self.current().items.push(item);
        self
    }

    fn current(&mut self) -> &mut Layer {
        if self.layers.is_empty() {
            self.layers.push(Layer::new("base"));
        }
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Filled rectangle.
    pub fn fill_rect(&mut self, rect: Rect, paint: Paint) -> &mut Self {
        self.push(DrawItem::Rect {
            rect,
            corner_radius: 0.0,
            fill: Some(paint),
            stroke: None,
        })
    }

    /// Outlined rectangle.
    pub fn stroke_rect(&mut self, rect: Rect, stroke: StrokeStyle) -> &mut Self {
        self.push(DrawItem::Rect {
            rect,
            corner_radius: 0.0,
            fill: None,
            stroke: Some(stroke),
        })
    }

    /// Straight segment.
    pub fn line(&mut self, from: Point, to: Point, stroke: StrokeStyle) -> &mut Self {
        self.push(DrawItem::Line { from, to, stroke })
    }

    /// Open polyline. Fewer than two points draws nothing.
    pub fn polyline(&mut self, points: Vec<Point>, stroke: StrokeStyle) -> &mut Self {
        if points.len() < 2 {
            return self;
        }
        self.push(DrawItem::Polyline {
            points,
            closed: false,
            stroke,
        })
    }

    /// Filled polygon.
    pub fn polygon(&mut self, points: &[Point], fill: Paint) -> &mut Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        let mut path = BezPath::new();
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
        self.path(path, Some(fill), None)
    }

    /// Arbitrary path.
    pub fn path(
        &mut self,
        path: BezPath,
        fill: Option<Paint>,
        stroke: Option<StrokeStyle>,
    ) -> &mut Self {
        self.push(DrawItem::Path { path, fill, stroke })
    }

    /// Circle with optional fill and outline.
    pub fn circle(
        &mut self,
        center: Point,
        radius: f64,
        fill: Option<Paint>,
        stroke: Option<StrokeStyle>,
    ) -> &mut Self {
        self.push(DrawItem::Circle {
            center,
            radius,
            fill,
            stroke,
        })
    }

    /// Filled circle.
    pub fn dot(&mut self, center: Point, radius: f64, paint: Paint) -> &mut Self {
        self.circle(center, radius, Some(paint), None)
    }

    /// Concentric outlines.
    pub fn rings(&mut self, center: Point, radii: &[f64], stroke: StrokeStyle) -> &mut Self {
        for &r in radii {
            self.circle(center, r, None, Some(stroke));
        }
        self
    }

    /// Disk with a radial gradient.
    pub fn radial_glow(&mut self, center: Point, radius: f64, inner: Paint, outer: Paint) -> &mut Self {
        self.push(DrawItem::RadialGlow {
            center,
            radius,
            inner,
            outer,
        })
    }

    /// Rectangle with a vertical gradient.
    pub fn vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8) -> &mut Self {
        self.push(DrawItem::VerticalGradient { rect, top, bottom })
    }

    /// Text item.
    pub fn text(&mut self, item: TextItem) -> &mut Self {
        self.push(DrawItem::Text(item))
    }

    /// Monospace annotation.
    pub fn label(
        &mut self,
        content: impl Into<String>,
        origin: Point,
        size: f64,
        anchor: TextAnchor,
        paint: Paint,
    ) -> &mut Self {
        self.text(TextItem::new(content, origin, size, FontRole::Mono, paint).anchored(anchor))
    }

    /// Vertical lines at every `xs`, spanning `y0..y1`.
    pub fn vertical_lines(
        &mut self,
        xs: impl IntoIterator<Item = f64>,
        y0: f64,
        y1: f64,
        stroke: StrokeStyle,
    ) -> &mut Self {
        for x in xs {
            self.line(Point::new(x, y0), Point::new(x, y1), stroke);
        }
        self
    }

    /// Horizontal lines at every `ys`, spanning `x0..x1`.
    pub fn horizontal_lines(
        &mut self,
        ys: impl IntoIterator<Item = f64>,
        x0: f64,
        x1: f64,
        stroke: StrokeStyle,
    ) -> &mut Self {
        for y in ys {
            self.line(Point::new(x0, y), Point::new(x1, y), stroke);
        }
        self
    }

    /// Regular grid inside `bounds`, starting at its top-left corner.
    pub fn grid(&mut self, bounds: Rect, spacing: f64, stroke: StrokeStyle) -> PosterResult<&mut Self> {
        let xs = stepped(bounds.x0, bounds.x1, spacing)?;
        let ys = stepped(bounds.y0, bounds.y1, spacing)?;
        self.vertical_lines(xs, bounds.y0, bounds.y1, stroke);
        self.horizontal_lines(ys, bounds.x0, bounds.x1, stroke);
        Ok(self)
    }

    /// Rectangle outline with a halo of `radius` outward passes under a dim core.
    ///
    /// Pass `i` is inflated by `i` pixels, `width + i` wide, at `intensity * (radius - i) / radius`.
    pub fn glow_rect(
        &mut self,
        rect: Rect,
        color: Rgba8,
        width: f64,
        radius: u32,
        intensity: f64,
    ) -> &mut Self {
        let r = f64::from(radius.max(1));
        for i in (1..=radius).rev() {
            let grow = f64::from(i);
            let opacity = (intensity * (r - grow) / r).clamp(0.0, 1.0);
            if opacity <= 0.0 {
                continue;
            }
            self.stroke_rect(
                rect.inflate(grow, grow),
                StrokeStyle::new(Paint::new(color, opacity), width + grow),
            );
        }
        self.stroke_rect(rect, StrokeStyle::new(Paint::new(color, 0.4), width))
    }

    /// Stacked disks whose opacity rises linearly toward the center.
    ///
    /// Disks shrink from `radius` by `step` pixels; each gets `intensity * (1 - r/radius)`.
    pub fn glow_circle(
        &mut self,
        center: Point,
        radius: f64,
        step: f64,
        color: Rgba8,
        intensity: f64,
    ) -> &mut Self {
        if !radius.is_finite() || !step.is_finite() || radius <= 0.0 || step <= 0.0 {
            return self;
        }
        let mut r = radius;
        while r > 0.0 {
            let opacity = (intensity * (1.0 - r / radius)).clamp(0.0, 1.0);
            if opacity > 0.0 {
                self.dot(center, r, Paint::new(color, opacity));
            }
            r -= step;
        }
        self
    }

    /// Outline inset `inset` pixels from the canvas edge.
    pub fn frame(&mut self, inset: f64, stroke: StrokeStyle) -> &mut Self {
        let r = self.canvas.rect();
        self.stroke_rect(
            Rect::new(r.x0 + inset, r.y0 + inset, r.x1 - inset, r.y1 - inset),
            stroke,
        )
    }

    /// One-pixel horizontal lines across the canvas every `every` pixels.
    pub fn scanlines(&mut self, every: f64, paint: Paint) -> PosterResult<&mut Self> {
        let r = self.canvas.rect();
        let ys = stepped(r.y0, r.y1, every)?;
        self.horizontal_lines(ys, r.x0, r.x1, StrokeStyle::new(paint, 1.0));
        Ok(self)
    }

    /// Validate and produce the scene.
    pub fn build(self) -> PosterResult<Scene> {
        let scene = Scene {
            canvas: self.canvas,
            background: self.background,
            layers: self.layers,
        };
        scene.validate()?;
        Ok(scene)
    }
}

/// `start, start + step, ...` while `< end`.
pub fn stepped(start: f64, end: f64, step: f64) -> PosterResult<Vec<f64>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(PosterError::validation("grid step must be finite and > 0"));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(PosterError::validation("grid range must be finite"));
    }
    let mut out = Vec::new();
    let mut k = 0u32;
    loop {
        let v = start + f64::from(k) * step;
        if v >= end {
            break;
        }
        out.push(v);
        k += 1;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
