//! Standalone SVG 1.1 output.
//!
//! Coordinates stay in poster units; `RenderSettings::scale` only changes the
//! `width`/`height` attributes. Numbers are written with at most two decimals so output is
//! byte-stable across runs.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::scene::model::{DrawItem, FontRole, Layer, Paint, Scene, StrokeStyle, TextItem};

/// Serialize `scene` as an SVG document.
#[tracing::instrument(skip_all, fields(layers = scene.layers.len()))]
pub fn render_scene_svg(scene: &Scene, settings: RenderSettings) -> PosterResult<String> {
    scene.validate()?;
    let out = settings.output_canvas(scene)?;
    let (w, h) = (scene.canvas.width, scene.canvas.height);

    let mut writer = SvgWriter::default();
    for (i, layer) in scene.layers.iter().enumerate() {
        writer.layer(i, layer, scene)?;
    }

    let mut doc = String::with_capacity(writer.body.len() + writer.defs.len() + 512);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        doc,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {w} {h}\">",
        out.width, out.height
    );
    if !writer.defs.is_empty() {
        doc.push_str("<defs>\n");
        doc.push_str(&writer.defs);
        doc.push_str("</defs>\n");
    }
    let _ = writeln!(
        doc,
        "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{}\"/>",
        scene.background.to_hex_rgb()
    );
    doc.push_str(&writer.body);
    doc.push_str("</svg>\n");

    tracing::debug!(bytes = doc.len(), gradients = writer.gradients, "svg serialized");
    Ok(doc)
}

#[derive(Default)]
struct SvgWriter {
    defs: String,
    body: String,
    gradients: usize,
}

impl SvgWriter {
    fn layer(&mut self, index: usize, layer: &Layer, scene: &Scene) -> PosterResult<()> {
        if layer.items.is_empty() {
            return Ok(());
        }
        let _ = write!(self.body, "<g id=\"{}\"", layer_id(index, &layer.name));
        if layer.opacity < 1.0 {
            let _ = write!(self.body, " opacity=\"{}\"", num(layer.opacity));
        }
        if let Some(sigma) = layer.blur_sigma {
            let fid = format!("blur{index}");
            let _ = writeln!(
                self.defs,
                "<filter id=\"{fid}\" filterUnits=\"userSpaceOnUse\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\"><feGaussianBlur stdDeviation=\"{}\"/></filter>",
                scene.canvas.width,
                scene.canvas.height,
                num(sigma)
            );
            let _ = write!(self.body, " filter=\"url(#{fid})\"");
        }
        self.body.push_str(">\n");
        for item in &layer.items {
            self.item(item)?;
        }
        self.body.push_str("</g>\n");
        Ok(())
    }

    fn next_gradient_id(&mut self) -> String {
        self.gradients += 1;
        format!("grad{}", self.gradients)
    }

    fn item(&mut self, item: &DrawItem) -> PosterResult<()> {
        match item {
            DrawItem::Rect {
                rect,
                corner_radius,
                fill,
                stroke,
            } => {
                let r = rect.abs();
                let _ = write!(
                    self.body,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    num(r.x0),
                    num(r.y0),
                    num(r.width()),
                    num(r.height())
                );
                if *corner_radius > 0.0 {
                    let _ = write!(self.body, " rx=\"{}\"", num(*corner_radius));
                }
                self.paint_attrs(fill.as_ref(), stroke.as_ref());
                self.body.push_str("/>\n");
            }
            DrawItem::Line { from, to, stroke } => {
                let _ = write!(
                    self.body,
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                    num(from.x),
                    num(from.y),
                    num(to.x),
                    num(to.y)
                );
                self.paint_attrs(None, Some(stroke));
                self.body.push_str("/>\n");
            }
            DrawItem::Polyline {
                points,
                closed,
                stroke,
            } => {
                if points.len() < 2 {
                    return Ok(());
                }
                let tag = if *closed { "polygon" } else { "polyline" };
                let _ = write!(self.body, "<{tag} points=\"{}\"", points_attr(points));
                self.paint_attrs(None, Some(stroke));
                self.body.push_str("/>\n");
            }
            DrawItem::Path { path, fill, stroke } => {
                let _ = write!(self.body, "<path d=\"{}\"", path_data(path));
                self.paint_attrs(fill.as_ref(), stroke.as_ref());
                self.body.push_str("/>\n");
            }
            DrawItem::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let _ = write!(
                    self.body,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    num(center.x),
                    num(center.y),
                    num(*radius)
                );
                self.paint_attrs(fill.as_ref(), stroke.as_ref());
                self.body.push_str("/>\n");
            }
            DrawItem::RadialGlow {
                center,
                radius,
                inner,
                outer,
            } => {
                let id = self.next_gradient_id();
                let _ = writeln!(
                    self.defs,
                    "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\">{}{}</radialGradient>",
                    stop(0.0, *inner),
                    stop(1.0, *outer),
                    cx = num(center.x),
                    cy = num(center.y),
                    r = num(*radius),
                );
                let _ = writeln!(
                    self.body,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"url(#{id})\"/>",
                    num(center.x),
                    num(center.y),
                    num(*radius)
                );
            }
            DrawItem::VerticalGradient { rect, top, bottom } => {
                let id = self.next_gradient_id();
                let _ = writeln!(
                    self.defs,
                    "<linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">{}{}</linearGradient>",
                    stop(0.0, Paint::solid(*top)),
                    stop(1.0, Paint::solid(*bottom)),
                );
                let r = rect.abs();
                let _ = writeln!(
                    self.body,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"url(#{id})\"/>",
                    num(r.x0),
                    num(r.y0),
                    num(r.width()),
                    num(r.height())
                );
            }
            DrawItem::Text(t) => self.text(t),
        }
        Ok(())
    }

    fn paint_attrs(&mut self, fill: Option<&Paint>, stroke: Option<&StrokeStyle>) {
        match fill {
            Some(p) => {
                let _ = write!(self.body, " fill=\"{}\"", p.color.to_hex_rgb());
                let alpha = p.effective_alpha();
                if alpha < 1.0 {
                    let _ = write!(self.body, " fill-opacity=\"{}\"", num(alpha));
                }
            }
            None => self.body.push_str(" fill=\"none\""),
        }
        if let Some(s) = stroke {
            let _ = write!(
                self.body,
                " stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
                s.paint.color.to_hex_rgb(),
                num(s.width)
            );
            let alpha = s.paint.effective_alpha();
            if alpha < 1.0 {
                let _ = write!(self.body, " stroke-opacity=\"{}\"", num(alpha));
            }
            if let Some((dash, gap)) = s.dash {
                let _ = write!(self.body, " stroke-dasharray=\"{} {}\"", num(dash), num(gap));
            }
        }
    }

    fn text(&mut self, t: &TextItem) {
        let _ = write!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"",
            num(t.origin.x),
            num(t.origin.y),
            t.font.generic_family(),
            num(t.size),
            t.paint.color.to_hex_rgb()
        );
        let alpha = t.paint.effective_alpha();
        if alpha < 1.0 {
            let _ = write!(self.body, " fill-opacity=\"{}\"", num(alpha));
        }
        if t.anchor.as_svg() != "start" {
            let _ = write!(self.body, " text-anchor=\"{}\"", t.anchor.as_svg());
        }
        if t.letter_spacing != 0.0 {
            let _ = write!(self.body, " letter-spacing=\"{}\"", num(t.letter_spacing));
        }
        if t.weight != 400 {
            let _ = write!(self.body, " font-weight=\"{}\"", t.weight);
        }
        let _ = writeln!(self.body, ">{}</text>", escape_text(&t.content));
    }
}

fn layer_id(index: usize, name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("layer{index}-{slug}")
}

fn stop(offset: f64, paint: Paint) -> String {
    format!(
        "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
        num(offset),
        paint.color.to_hex_rgb(),
        num(paint.effective_alpha())
    )
}

/// Format with at most two decimals, trimming trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let mut s = format!("{v:.2}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn points_attr(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 12);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", num(p.x), num(p.y));
    }
    out
}

fn path_data(path: &BezPath) -> String {
    use kurbo::PathEl;

    let mut out = String::new();
    for el in path.elements() {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = match *el {
            PathEl::MoveTo(p) => write!(out, "M{},{}", num(p.x), num(p.y)),
            PathEl::LineTo(p) => write!(out, "L{},{}", num(p.x), num(p.y)),
            PathEl::QuadTo(a, b) => write!(
                out,
                "Q{},{} {},{}",
                num(a.x),
                num(a.y),
                num(b.x),
                num(b.y)
            ),
            PathEl::CurveTo(a, b, c) => write!(
                out,
                "C{},{} {},{} {},{}",
                num(a.x),
                num(a.y),
                num(b.x),
                num(b.y),
                num(c.x),
                num(c.y)
            ),
            PathEl::ClosePath => write!(out, "Z"),
        };
    }
    out
}

pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Raster backend that serializes to SVG and rasterizes with `resvg`.
///
/// Useful as a cross-check against the `vello_cpu` path. Text goes through `usvg`'s own font
/// selection, with pinned files taking over the generic families.
pub struct SvgRasterBackend {
    settings: RenderSettings,
    font_dir: Option<PathBuf>,
    system_fonts: bool,
    font_files: Vec<(FontRole, PathBuf)>,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl SvgRasterBackend {
    /// Backend loading faces from `font_dir` and optionally the system database.
    pub fn new(settings: RenderSettings, font_dir: Option<PathBuf>, system_fonts: bool) -> Self {
        Self {
            settings,
            font_dir,
            system_fonts,
            font_files: Vec::new(),
            fontdb: None,
        }
    }

    /// Also load `files`; each one becomes the generic family of its role.
    pub fn with_font_files(mut self, files: Vec<(FontRole, PathBuf)>) -> Self {
        self.font_files = files;
        self.fontdb = None;
        self
    }

    fn fontdb(&mut self) -> Arc<usvg::fontdb::Database> {
        if let Some(db) = &self.fontdb {
            return db.clone();
        }
        let mut db = usvg::fontdb::Database::new();
        if self.system_fonts {
            db.load_system_fonts();
        }
        if let Some(dir) = &self.font_dir {
            db.load_fonts_dir(dir);
        }
        configure_generic_families(&mut db);
        load_pinned_files(&mut db, &self.font_files);
        tracing::debug!(faces = db.len(), "svg font database ready");
        let db = Arc::new(db);
        self.fontdb = Some(db.clone());
        db
    }
}

/// Point `monospace`/`sans-serif` at the first installed family we know about.
fn configure_generic_families(db: &mut usvg::fontdb::Database) {
    let installed = |db: &usvg::fontdb::Database, name: &str| {
        db.faces()
            .any(|f| f.families.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)))
    };
    let mono = [
        "Geist Mono",
        "IBM Plex Mono",
        "JetBrains Mono",
        "DejaVu Sans Mono",
        "Liberation Mono",
        "Noto Sans Mono",
    ];
    let sans = ["Instrument Sans", "DejaVu Sans", "Liberation Sans", "Noto Sans"];
    if let Some(name) = mono.iter().find(|n| installed(db, n)) {
        db.set_monospace_family(*name);
    }
    if let Some(name) = sans.iter().find(|n| installed(db, n)) {
        db.set_sans_serif_family(*name);
    }
}

/// Load pinned files and make their families the generic `monospace`/`sans-serif`.
///
/// A regular role's family wins over its bold sibling; unreadable files are skipped.
fn load_pinned_files(db: &mut usvg::fontdb::Database, files: &[(FontRole, PathBuf)]) {
    let mut mono: Option<String> = None;
    let mut sans: Option<String> = None;
    for (role, path) in files {
        let ids = db.load_font_source(usvg::fontdb::Source::File(path.clone()));
        let family = ids
            .first()
            .and_then(|id| db.face(*id))
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone());
        let Some(family) = family else {
            tracing::warn!(path = %path.display(), ?role, "pinned font file not loaded");
            continue;
        };
        let slot = match role {
            FontRole::Mono | FontRole::MonoBold => &mut mono,
            FontRole::Sans | FontRole::SansBold => &mut sans,
        };
        if slot.is_none() || !role.is_bold() {
            *slot = Some(family);
        }
    }
    if let Some(name) = mono {
        db.set_monospace_family(name);
    }
    if let Some(name) = sans {
        db.set_sans_serif_family(name);
    }
}

impl RenderBackend for SvgRasterBackend {
    #[tracing::instrument(skip_all, fields(layers = scene.layers.len()))]
    fn render_scene(&mut self, scene: &Scene) -> PosterResult<FrameRGBA> {
        let doc = render_scene_svg(scene, self.settings)?;
        let out = self.settings.output_canvas(scene)?;
        let opts = usvg::Options {
            fontdb: self.fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts)
            .map_err(|e| PosterError::render(format!("parse generated svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(out.width, out.height)
            .ok_or_else(|| PosterError::render("failed to allocate svg pixmap"))?;
        let sx = out.width as f32 / tree.size().width();
        let sy = out.height as f32 / tree.size().height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width: out.width,
            height: out.height,
            data: pixmap.data().to_vec(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
