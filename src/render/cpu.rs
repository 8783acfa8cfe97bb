use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::assets::fonts::FontBook;
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::blur::blur_rgba8_premul;
use crate::render::composite::{fill, over_in_place};
use crate::scene::model::{DrawItem, FontRole, Layer, Paint, Scene, StrokeStyle, TextItem};

/// Flattening tolerance for circles and rounded rects, in poster units.
const SHAPE_TOLERANCE: f64 = 0.1;

/// CPU backend powered by `vello_cpu` for vector/text rasterization.
///
/// Every layer is drawn into its own transparent pixmap, optionally blurred, then composited
/// source-over onto a frame that starts as the opaque background.
pub struct CpuBackend<'f> {
    settings: RenderSettings,
    fonts: &'f mut FontBook,
    text_engine: TextLayoutEngine,
    font_data: HashMap<FontRole, vello_cpu::peniko::FontData>,
    surface: (u32, u32),
}

impl<'f> CpuBackend<'f> {
    /// Backend drawing text with faces from `fonts`.
    pub fn new(settings: RenderSettings, fonts: &'f mut FontBook) -> Self {
        Self {
            settings,
            fonts,
            text_engine: TextLayoutEngine::new(),
            font_data: HashMap::new(),
            surface: (0, 0),
        }
    }

    fn render_layer(
        &mut self,
        layer: &Layer,
        ctx: &mut vello_cpu::RenderContext,
        pixmap: &mut vello_cpu::Pixmap,
    ) -> PosterResult<()> {
        ctx.reset();
        pixmap.data_as_u8_slice_mut().fill(0);
        for item in &layer.items {
            self.draw_item(ctx, item)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(pixmap);
        Ok(())
    }

    fn base_transform(&self) -> Affine {
        Affine::scale(self.settings.scale)
    }

    fn draw_item(&mut self, ctx: &mut vello_cpu::RenderContext, item: &DrawItem) -> PosterResult<()> {
        let base = self.base_transform();
        ctx.set_transform(affine_to_cpu(base));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());

        match item {
            DrawItem::Rect {
                rect,
                corner_radius,
                fill,
                stroke,
            } => {
                let path = if *corner_radius > 0.0 {
                    kurbo::RoundedRect::from_rect(*rect, *corner_radius).to_path(SHAPE_TOLERANCE)
                } else {
                    rect.to_path(SHAPE_TOLERANCE)
                };
                fill_and_stroke(ctx, &path, fill.as_ref(), stroke.as_ref());
                Ok(())
            }
            DrawItem::Line { from, to, stroke } => {
                let mut path = BezPath::new();
                path.move_to(*from);
                path.line_to(*to);
                stroke_path(ctx, &path, stroke);
                Ok(())
            }
            DrawItem::Polyline {
                points,
                closed,
                stroke,
            } => {
                let Some(path) = polyline_path(points, *closed) else {
                    return Ok(());
                };
                stroke_path(ctx, &path, stroke);
                Ok(())
            }
            DrawItem::Path { path, fill, stroke } => {
                fill_and_stroke(ctx, path, fill.as_ref(), stroke.as_ref());
                Ok(())
            }
            DrawItem::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                if *radius <= 0.0 {
                    return Ok(());
                }
                let path = kurbo::Circle::new(*center, *radius).to_path(SHAPE_TOLERANCE);
                fill_and_stroke(ctx, &path, fill.as_ref(), stroke.as_ref());
                Ok(())
            }
            DrawItem::RadialGlow {
                center,
                radius,
                inner,
                outer,
            } => self.draw_radial_glow(ctx, *center, *radius, *inner, *outer),
            DrawItem::VerticalGradient { rect, top, bottom } => {
                self.draw_vertical_gradient(ctx, *rect, *top, *bottom)
            }
            DrawItem::Text(t) => self.draw_text(ctx, t),
        }
    }

    /// The gradient is rasterized at output resolution so scaling never blurs it. Only the part
    /// of the disk that lands on the surface is allocated.
    fn draw_radial_glow(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        center: Point,
        radius: f64,
        inner: Paint,
        outer: Paint,
    ) -> PosterResult<()> {
        let scale = self.settings.scale;
        let r_px = radius * scale;
        if r_px < 0.5 {
            return Ok(());
        }
        let c = Point::new(center.x * scale, center.y * scale);
        let disk = Rect::new(c.x - r_px, c.y - r_px, c.x + r_px, c.y + r_px);
        let Some(window) = self.surface_window(disk) else {
            return Ok(());
        };
        let (w, h) = window_size(window);
        let local = Point::new(c.x - window.x0, c.y - window.y0);
        let img = radial_gradient_image(w, h, local, r_px, inner.effective(), outer.effective())?;

        ctx.set_transform(affine_to_cpu(Affine::translate((window.x0, window.y0))));
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        Ok(())
    }

    fn draw_vertical_gradient(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        rect: Rect,
        top: Rgba8,
        bottom: Rgba8,
    ) -> PosterResult<()> {
        let scale = self.settings.scale;
        let r = rect.abs();
        let full = Rect::new(r.x0 * scale, r.y0 * scale, r.x1 * scale, r.y1 * scale);
        if full.width() <= 0.0 || full.height() <= 0.0 {
            return Ok(());
        }
        let Some(window) = self.surface_window(full) else {
            return Ok(());
        };
        let (w, h) = window_size(window);
        // Rows keep their color from the unclipped rect.
        let t0 = (window.y0 - full.y0) / full.height();
        let t1 = (window.y1 - full.y0) / full.height();
        let img = vertical_gradient_image(w, h, top.lerp(bottom, t0), top.lerp(bottom, t1))?;
        ctx.set_transform(affine_to_cpu(Affine::translate((window.x0, window.y0))));
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        Ok(())
    }

    /// Whole-pixel part of `bounds` (output pixels) that lies on the surface.
    fn surface_window(&self, bounds: Rect) -> Option<Rect> {
        clip_to_surface(bounds, self.surface.0, self.surface.1)
    }

    fn font_data_for(&mut self, role: FontRole) -> Option<vello_cpu::peniko::FontData> {
        if let Some(f) = self.font_data.get(&role) {
            return Some(f.clone());
        }
        let loaded = self.fonts.resolve(role)?;
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(loaded.bytes.as_ref().clone()),
            loaded.index,
        );
        self.font_data.insert(role, data.clone());
        Some(data)
    }

    fn draw_text(&mut self, ctx: &mut vello_cpu::RenderContext, t: &TextItem) -> PosterResult<()> {
        if t.content.trim().is_empty() {
            return Ok(());
        }
        let Some(loaded) = self.fonts.resolve(t.font) else {
            tracing::warn!(text = %t.content, role = ?t.font, "no font for text item; skipped");
            return Ok(());
        };
        let Some(font) = self.font_data_for(t.font) else {
            return Ok(());
        };

        let color = t.paint.effective();
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let shaped = match self.text_engine.shape_line(
            &t.content,
            t.font,
            &loaded,
            t.size as f32,
            t.letter_spacing as f32,
            brush,
        ) {
            Ok(s) => s,
            Err(PosterError::Font(msg)) => {
                tracing::warn!(text = %t.content, error = %msg, "text shaping failed; skipped");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let x = t.origin.x + t.anchor.offset(f64::from(shaped.width));
        let tr = self.base_transform() * Affine::translate((x, t.origin.y));
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        ctx.glyph_run(&font)
            .font_size(t.size as f32)
            .fill_glyphs(glyphs);
        Ok(())
    }
}

impl RenderBackend for CpuBackend<'_> {
    #[tracing::instrument(skip_all, fields(layers = scene.layers.len()))]
    fn render_scene(&mut self, scene: &Scene) -> PosterResult<FrameRGBA> {
        scene.validate()?;
        let out = self.settings.output_canvas(scene)?;
        let w: u16 = out
            .width
            .try_into()
            .map_err(|_| PosterError::render("surface width exceeds u16"))?;
        let h: u16 = out
            .height
            .try_into()
            .map_err(|_| PosterError::render("surface height exceeds u16"))?;

        self.surface = (out.width, out.height);

        let mut frame = vec![0u8; (out.width as usize) * (out.height as usize) * 4];
        fill(&mut frame, scene.background.premultiplied());

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        for layer in &scene.layers {
            if layer.items.is_empty() || layer.opacity <= 0.0 {
                continue;
            }
            self.render_layer(layer, &mut ctx, &mut pixmap)?;
            match layer.blur_sigma {
                Some(sigma) => {
                    let blurred = blur_rgba8_premul(
                        pixmap.data_as_u8_slice(),
                        out.width,
                        out.height,
                        sigma * self.settings.scale,
                    )?;
                    over_in_place(&mut frame, &blurred, layer.opacity)?;
                }
                None => over_in_place(&mut frame, pixmap.data_as_u8_slice(), layer.opacity)?,
            }
            tracing::debug!(layer = %layer.name, items = layer.items.len(), "layer composited");
        }

        Ok(FrameRGBA {
            width: out.width,
            height: out.height,
            data: frame,
            premultiplied: true,
        })
    }
}

fn cpu_color(paint: Paint) -> vello_cpu::peniko::Color {
    let c = paint.effective();
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn cpu_stroke(stroke: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    let s = vello_cpu::kurbo::Stroke::new(stroke.width);
    match stroke.dash {
        Some((dash, gap)) => s.with_dashes(0.0, [dash, gap]),
        None => s,
    }
}

fn fill_and_stroke(
    ctx: &mut vello_cpu::RenderContext,
    path: &BezPath,
    fill: Option<&Paint>,
    stroke: Option<&StrokeStyle>,
) {
    if let Some(f) = fill
        && f.effective().a > 0
    {
        ctx.set_paint(cpu_color(*f));
        ctx.fill_path(&bezpath_to_cpu(path));
    }
    if let Some(s) = stroke {
        stroke_path(ctx, path, s);
    }
}

fn stroke_path(ctx: &mut vello_cpu::RenderContext, path: &BezPath, stroke: &StrokeStyle) {
    if stroke.width <= 0.0 || stroke.paint.effective().a == 0 {
        return;
    }
    ctx.set_paint(cpu_color(stroke.paint));
    ctx.set_stroke(cpu_stroke(stroke));
    ctx.stroke_path(&bezpath_to_cpu(path));
}

fn polyline_path(points: &[Point], closed: bool) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    Some(path)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PosterError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn image_paint(bytes_premul: &[u8], width: u32, height: u32) -> PosterResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Top-to-bottom gradient, one color per row.
pub(crate) fn vertical_gradient_bytes(w: u32, h: u32, top: Rgba8, bottom: Rgba8) -> Vec<u8> {
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let h1 = f64::from(h.max(1) - 1);
    let row_len = w as usize * 4;
    for (y, row) in bytes.chunks_exact_mut(row_len.max(1)).enumerate() {
        let t = if h1 <= 0.0 { 0.0 } else { y as f64 / h1 };
        let c = top.lerp(bottom, t).premultiplied().to_array();
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}

fn vertical_gradient_image(w: u32, h: u32, top: Rgba8, bottom: Rgba8) -> PosterResult<vello_cpu::Image> {
    image_paint(&vertical_gradient_bytes(w, h, top, bottom), w, h)
}

/// Intersection of `bounds` with a `width`×`height` surface, widened to whole pixels.
pub(crate) fn clip_to_surface(bounds: Rect, width: u32, height: u32) -> Option<Rect> {
    let x0 = bounds.x0.floor().max(0.0);
    let y0 = bounds.y0.floor().max(0.0);
    let x1 = bounds.x1.ceil().min(f64::from(width));
    let y1 = bounds.y1.ceil().min(f64::from(height));
    (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1, y1))
}

fn window_size(window: Rect) -> (u32, u32) {
    (window.width() as u32, window.height() as u32)
}

/// `w`×`h` window onto a disk of `radius` around `center` (window pixels), `inner` at the
/// center fading to `outer` at the rim and transparent outside it.
pub(crate) fn radial_gradient_bytes(
    w: u32,
    h: u32,
    center: Point,
    radius: f64,
    inner: Rgba8,
    outer: Rgba8,
) -> Vec<u8> {
    let (w, h) = (w as usize, h as usize);
    let mut bytes = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
    for y in 0..h {
        for x in 0..w {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            let t = (dx * dx + dy * dy).sqrt() / radius;
            if t > 1.0 {
                continue;
            }
            let c = inner.lerp(outer, t).premultiplied().to_array();
            let idx = (y * w + x) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c);
        }
    }
    bytes
}

fn radial_gradient_image(
    w: u32,
    h: u32,
    center: Point,
    radius: f64,
    inner: Rgba8,
    outer: Rgba8,
) -> PosterResult<vello_cpu::Image> {
    image_paint(&radial_gradient_bytes(w, h, center, radius, inner, outer), w, h)
}

/// Convenience wrapper: render `scene` with a fresh CPU backend.
pub fn render_scene_cpu(
    scene: &Scene,
    settings: RenderSettings,
    fonts: &mut FontBook,
) -> PosterResult<FrameRGBA> {
    CpuBackend::new(settings, fonts).render_scene(scene)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
