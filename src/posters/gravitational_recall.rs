//! Gravitational Recall: memory centers as gravitational wells.
//!
//! Both variants share the five-center layout and differ in falloff, acceptance curve,
//! fan density and finish.

use crate::field::potential::Falloff;
use crate::field::recipe::{FieldRecipe, FieldRun};
use crate::field::sampling::{Acceptance, MarkParams, SampleRegion};
use crate::field::source::{Category, Source};
use crate::field::trace::TraceParams;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::PosterResult;
use crate::posters::{baseline, format_weight};
use crate::scene::builder::{SceneBuilder, stepped};
use crate::scene::model::{DrawItem, FontRole, Paint, Scene, StrokeStyle, TextAnchor, TextItem};

const WIDTH: u32 = 2400;
const HEIGHT: u32 = 3200;

const SUBTITLE: &str = "A Study in Memorial Dynamics";
const TITLE: &str = "GRAVITATIONAL RECALL";

/// Colors keyed by role. Neutral sources borrow a different entry per element.
struct Palette {
    background: Rgba8,
    primary: Rgba8,
    secondary: Rgba8,
    tertiary: Rgba8,
    warm: Rgba8,
    cool: Rgba8,
    grid: Rgba8,
    faint_grid: Rgba8,
}

const CLASSIC: Palette = Palette {
    background: Rgba8::rgb(12, 15, 25),
    primary: Rgba8::rgb(220, 225, 235),
    secondary: Rgba8::rgb(140, 150, 165),
    tertiary: Rgba8::rgb(70, 80, 95),
    warm: Rgba8::rgb(205, 145, 95),
    cool: Rgba8::rgb(85, 135, 175),
    grid: Rgba8::rgb(50, 55, 65),
    faint_grid: Rgba8::rgb(50, 55, 65),
};

const REFINED: Palette = Palette {
    background: Rgba8::rgb(8, 12, 22),
    primary: Rgba8::rgb(225, 228, 235),
    secondary: Rgba8::rgb(155, 162, 175),
    tertiary: Rgba8::rgb(85, 92, 105),
    warm: Rgba8::rgb(215, 152, 105),
    cool: Rgba8::rgb(95, 142, 185),
    grid: Rgba8::rgb(42, 48, 62),
    faint_grid: Rgba8::rgb(28, 32, 42),
};

impl Palette {
    fn accent(&self, category: Category, neutral: Rgba8) -> Rgba8 {
        match category {
            Category::Warm => self.warm,
            Category::Cool => self.cool,
            Category::Neutral => neutral,
        }
    }
}

fn canvas() -> PosterResult<Canvas> {
    Canvas::new(WIDTH, HEIGHT)
}

fn memory_centers(layout: &[(f64, f64, f64, Category)]) -> Vec<Source> {
    const LABELS: [&str; 5] = ["M₁", "M₂", "M₃", "M₄", "M₅"];
    layout
        .iter()
        .zip(LABELS)
        .map(|(&(x, y, weight, category), label)| {
            Source {
                x,
                y,
                weight,
                category,
                label: None,
            }
            .with_label(label)
        })
        .collect()
}

fn source_label(source: &Source, index: usize) -> String {
    source
        .label
        .clone()
        .unwrap_or_else(|| format!("M{}", index + 1))
}

/// Default setup of the raster poster: 36-line fans and linear acceptance over 15 000 draws.
pub(crate) fn classic_recipe() -> FieldRecipe {
    let sources = memory_centers(&[
        (800.0, 1200.0, 180.0, Category::Warm),
        (1600.0, 1000.0, 140.0, Category::Cool),
        (1200.0, 2100.0, 120.0, Category::Neutral),
        (1800.0, 2500.0, 90.0, Category::Warm),
        (600.0, 2600.0, 100.0, Category::Cool),
    ]);
    FieldRecipe {
        sources,
        marks: MarkParams {
            falloff: Falloff::CLASSIC,
            acceptance: Acceptance::Linear { normalizer: 150.0 },
            region: SampleRegion {
                rect: Rect::new(100.0, 100.0, f64::from(WIDTH) - 100.0, f64::from(HEIGHT) - 100.0),
                lattice: true,
            },
            attempts: 15_000,
        },
        trace: TraceParams::CLASSIC,
        lines_per_source: 36,
    }
}

/// Default setup of the refined variant: 48-line fans and power acceptance over 18 000 draws.
pub(crate) fn refined_recipe() -> FieldRecipe {
    let sources = memory_centers(&[
        (750.0, 1150.0, 185.0, Category::Warm),
        (1650.0, 950.0, 145.0, Category::Cool),
        (1150.0, 2150.0, 125.0, Category::Neutral),
        (1850.0, 2450.0, 95.0, Category::Warm),
        (550.0, 2650.0, 105.0, Category::Cool),
    ]);
    FieldRecipe {
        sources,
        marks: MarkParams {
            falloff: Falloff::SOFTENED,
            acceptance: Acceptance::Power {
                normalizer: 140.0,
                exponent: 1.3,
            },
            region: SampleRegion {
                rect: Rect::new(80.0, 80.0, f64::from(WIDTH) - 80.0, f64::from(HEIGHT) - 80.0),
                lattice: true,
            },
            attempts: 18_000,
        },
        trace: TraceParams::REFINED,
        lines_per_source: 48,
    }
}

/// Segments of a faded trace that stay visible: `int(255 * (1 - i/n) * 0.3) > 20`.
fn visible_segments(point_count: usize) -> usize {
    let n = point_count as f64;
    (0..point_count.saturating_sub(1))
        .take_while(|&i| (255.0 * (1.0 - i as f64 / n) * 0.3).floor() > 20.0)
        .count()
}

pub(crate) fn classic(recipe: &FieldRecipe, seed: u64) -> PosterResult<Scene> {
    let pal = &CLASSIC;
    let canvas = canvas()?;
    let run = recipe.run(seed)?;
    let sources = &recipe.sources;
    let mut b = SceneBuilder::new(canvas, pal.background);

    b.layer("field-lines");
    for path in &run.paths {
        if !path.is_drawable(3) {
            continue;
        }
        let keep = visible_segments(path.points.len());
        if keep == 0 {
            continue;
        }
        let color = pal.accent(sources[path.origin].category, pal.secondary);
        b.polyline(
            path.points[..=keep].to_vec(),
            StrokeStyle::new(Paint::solid(color), 1.0),
        );
    }

    b.layer("density");
    for mark in &run.marks {
        let color = pal.accent(sources[mark.nearest].category, pal.tertiary);
        let size = (1.0 + (mark.style_roll * 3.0).floor()).min(3.0);
        let half = size / 2.0;
        b.dot(
            Point::new(mark.position.x + half, mark.position.y + half),
            half,
            Paint::solid(color),
        );
    }

    b.layer("centers");
    for source in sources {
        let color = pal.accent(source.category, pal.primary);
        let center = source.position();
        let radius = (source.weight / 3.0).floor();
        let radii = stepped_down(radius, 8.0, corner_reach(center));
        b.rings(center, &radii, StrokeStyle::new(Paint::solid(color), 2.0));
        b.dot(center, 12.0, Paint::solid(color));
    }

    b.layer("grid");
    let grid = StrokeStyle::new(Paint::solid(pal.grid), 1.0);
    let (w, h) = (f64::from(WIDTH), f64::from(HEIGHT));
    let xs = stepped(200.0, w, 400.0)?;
    let ys = stepped(400.0, h, 400.0)?;
    b.vertical_lines(xs.iter().copied(), 150.0, h - 150.0, grid);
    b.horizontal_lines(ys.iter().copied(), 150.0, w - 150.0, grid);

    b.layer("annotations");
    let tick = Paint::solid(pal.secondary);
    for (i, y) in ys.iter().enumerate() {
        b.label(
            format!("{}", i * 400),
            Point::new(100.0, baseline(y - 10.0, 18.0)),
            18.0,
            TextAnchor::Start,
            tick,
        );
    }
    for (i, x) in xs.iter().enumerate() {
        b.label(
            format!("{}", i * 400),
            Point::new(x - 20.0, baseline(h - 120.0, 18.0)),
            18.0,
            TextAnchor::Start,
            tick,
        );
    }

    const OFFSETS: [(f64, f64); 5] = [
        (80.0, -80.0),
        (90.0, -70.0),
        (-100.0, 70.0),
        (80.0, 60.0),
        (-90.0, -60.0),
    ];
    for (i, source) in sources.iter().enumerate() {
        let (dx, dy) = OFFSETS[i % OFFSETS.len()];
        let center = source.position();
        let at = Point::new(center.x + dx, center.y + dy);
        b.line(center, at, StrokeStyle::new(Paint::solid(pal.tertiary), 1.0));
        b.label(
            source_label(source, i),
            Point::new(at.x, baseline(at.y - 15.0, 24.0)),
            24.0,
            TextAnchor::Start,
            Paint::solid(pal.secondary),
        );
        b.label(
            format!("m={}", format_weight(source.weight)),
            Point::new(at.x, baseline(at.y + 10.0, 18.0)),
            18.0,
            TextAnchor::Start,
            Paint::solid(pal.tertiary),
        );
    }

    b.layer("title");
    b.text(
        TextItem::new(
            TITLE,
            Point::new(w / 2.0, baseline(120.0, 28.0)),
            28.0,
            FontRole::Sans,
            Paint::solid(pal.primary),
        )
        .anchored(TextAnchor::Middle),
    );
    b.label(
        SUBTITLE,
        Point::new(w / 2.0, baseline(175.0, 18.0)),
        18.0,
        TextAnchor::Middle,
        Paint::solid(pal.tertiary),
    );

    log_run(&run);
    b.build()
}

/// `radius, radius - step, ...` while positive, skipping the leading radii above `reach`.
fn stepped_down(radius: f64, step: f64, reach: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut r = radius;
    if r > reach {
        r -= ((r - reach) / step).ceil() * step;
    }
    while r > 0.0 {
        out.push(r);
        r -= step;
    }
    out
}

/// Distance from `p` to the farthest canvas corner. A circle centered on `p` with a larger
/// radius never touches the canvas.
fn corner_reach(p: Point) -> f64 {
    let (w, h) = (f64::from(WIDTH), f64::from(HEIGHT));
    [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)]
        .into_iter()
        .map(|(x, y)| p.distance(Point::new(x, y)))
        .fold(0.0, f64::max)
}

pub(crate) fn refined(recipe: &FieldRecipe, seed: u64) -> PosterResult<Scene> {
    let pal = &REFINED;
    let canvas = canvas()?;
    let run = recipe.run(seed)?;
    let sources = &recipe.sources;
    let (w, h) = (f64::from(WIDTH), f64::from(HEIGHT));
    let mut b = SceneBuilder::new(canvas, pal.background);

    b.layer("grid");
    let faint = StrokeStyle::new(Paint::new(pal.faint_grid, 0.3), 0.5);
    let outer = stepped(0.0, w + 1.0, 800.0)?;
    b.vertical_lines(outer, 0.0, h, faint);
    let outer = stepped(0.0, h + 1.0, 800.0)?;
    b.horizontal_lines(outer, 0.0, w, faint);

    let medium = StrokeStyle::new(Paint::new(pal.grid, 0.4), 1.0);
    let xs = stepped(200.0, w, 400.0)?;
    let ys = stepped(350.0, h, 400.0)?;
    b.vertical_lines(xs.iter().copied(), 120.0, h - 120.0, medium);
    b.horizontal_lines(ys.iter().copied(), 120.0, w - 120.0, medium);

    let fine = StrokeStyle::new(Paint::new(pal.faint_grid, 0.15), 0.5);
    for source in sources {
        b.rings(source.position(), &[50.0, 100.0, 150.0, 200.0, 250.0], fine);
    }

    b.layer("field-lines");
    for path in &run.paths {
        if !path.is_drawable(11) {
            continue;
        }
        let color = pal.accent(sources[path.origin].category, pal.secondary);
        let opacity = 0.15 + (path.angle * 4.0).sin() * 0.08;
        b.polyline(
            path.points.clone(),
            StrokeStyle::new(Paint::new(color, opacity), 1.2),
        );
    }

    for category in [Category::Cool, Category::Neutral, Category::Warm] {
        b.layer(format!("density-{}", category.as_str()));
        let color = pal.accent(category, pal.secondary);
        for mark in run
            .marks
            .iter()
            .filter(|m| sources[m.nearest].category == category)
        {
            let local = mark.local_potential;
            let radius = 1.0 + (local / 60.0).min(2.0);
            let opacity = (0.2 + local / 200.0).min(0.6);
            b.dot(mark.position, radius, Paint::new(color, opacity));
        }
    }

    b.layer("centers");
    for source in sources {
        let center = source.position();
        let color = pal.accent(source.category, pal.secondary);
        let radius = source.weight / 2.8;
        let reach = corner_reach(center);
        b.radial_glow(
            center,
            radius * 1.2,
            Paint::new(pal.primary, 0.8 * 0.1),
            Paint::new(pal.primary, 0.0),
        );
        for (i, factor) in [1.0, 0.85, 0.68, 0.5, 0.35, 0.22].into_iter().enumerate() {
            let r = radius * factor;
            if r <= 5.0 || r > reach {
                continue;
            }
            let opacity = 0.3 + i as f64 * 0.08;
            let width = if i < 3 { 2.0 } else { 1.5 };
            b.circle(
                center,
                r,
                None,
                Some(StrokeStyle::new(Paint::new(color, opacity), width)),
            );
        }
        b.dot(center, 14.0, Paint::new(color, 0.9));
        b.dot(center, 8.0, Paint::new(pal.primary, 0.4));
    }

    b.layer("annotations");
    const OFFSETS: [(f64, f64, TextAnchor); 5] = [
        (95.0, -85.0, TextAnchor::Start),
        (100.0, -75.0, TextAnchor::Start),
        (-110.0, 75.0, TextAnchor::End),
        (95.0, 65.0, TextAnchor::Start),
        (-100.0, -65.0, TextAnchor::End),
    ];
    for (i, source) in sources.iter().enumerate() {
        let (dx, dy, anchor) = OFFSETS[i % OFFSETS.len()];
        let center = source.position();
        let at = Point::new(center.x + dx, center.y + dy);
        b.line(
            center,
            at,
            StrokeStyle::new(Paint::new(pal.tertiary, 0.6), 0.8).dashed(3.0, 2.0),
        );
        let box_x = if anchor == TextAnchor::Start { at.x - 5.0 } else { at.x - 70.0 };
        b.push(DrawItem::Rect {
            rect: Rect::new(box_x, at.y - 30.0, box_x + 75.0, at.y + 25.0),
            corner_radius: 2.0,
            fill: Some(Paint::new(pal.background, 0.7)),
            stroke: None,
        });
        b.text(
            TextItem::new(
                source_label(source, i),
                Point::new(at.x, at.y - 10.0),
                22.0,
                FontRole::Mono,
                Paint::solid(pal.secondary),
            )
            .anchored(anchor)
            .weighted(300),
        );
        b.label(
            format!("m={}", format_weight(source.weight)),
            Point::new(at.x, at.y + 12.0),
            16.0,
            anchor,
            Paint::solid(pal.tertiary),
        );
        b.label(
            format!("({},{})", format_weight(source.x), format_weight(source.y)),
            Point::new(at.x, at.y + 30.0),
            13.0,
            anchor,
            Paint::new(pal.tertiary, 0.5),
        );
    }

    let axis = Paint::new(pal.tertiary, 0.5);
    for (i, y) in ys.iter().enumerate() {
        b.label(
            format!("{:04}", (i + 1) * 400),
            Point::new(75.0, y + 5.0),
            16.0,
            TextAnchor::End,
            axis,
        );
    }
    for (i, x) in xs.iter().enumerate() {
        b.label(
            format!("{:04}", i * 400),
            Point::new(*x, h - 75.0),
            16.0,
            TextAnchor::Middle,
            axis,
        );
    }

    b.frame(50.0, StrokeStyle::new(Paint::new(pal.grid, 0.3), 1.0));

    b.layer("title");
    b.text(
        TextItem::new(
            TITLE,
            Point::new(w / 2.0, 90.0),
            32.0,
            FontRole::Sans,
            Paint::solid(pal.primary),
        )
        .anchored(TextAnchor::Middle)
        .spaced(4.0)
        .weighted(300),
    );
    b.text(
        TextItem::new(
            SUBTITLE,
            Point::new(w / 2.0, 135.0),
            17.0,
            FontRole::Mono,
            Paint::new(pal.tertiary, 0.7),
        )
        .anchored(TextAnchor::Middle)
        .spaced(1.0),
    );
    b.label(
        "Field Study № 01  ·  2025",
        Point::new(w / 2.0, h - 60.0),
        14.0,
        TextAnchor::Middle,
        Paint::new(pal.tertiary, 0.4),
    );

    log_run(&run);
    b.build()
}

fn log_run(run: &FieldRun) {
    tracing::debug!(
        seed = run.seed,
        paths = run.paths.len(),
        marks = run.marks.len(),
        "field sampled"
    );
}

#[cfg(test)]
#[path = "../../tests/unit/posters/gravitational_recall.rs"]
mod tests;
