//! Memory Force: one core warping the grid around it.

use std::f64::consts::{PI, TAU};

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::PosterResult;
use crate::posters::baseline;
use crate::scene::builder::SceneBuilder;
use crate::scene::model::{FontRole, Paint, Scene, StrokeStyle, TextAnchor, TextItem};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 2400;

const BACKGROUND: Rgba8 = Rgba8::rgb(8, 15, 35);
const GRID: Rgba8 = Rgba8::rgb(100, 140, 180);
const RAY: Rgba8 = Rgba8::rgb(180, 200, 220);
const GOLD: Rgba8 = Rgba8::rgb(255, 200, 80);
const PLATINUM: Rgba8 = Rgba8::rgb(220, 230, 240);
const EMBER: Rgba8 = Rgba8::rgb(255, 220, 150);

const GRID_SPACING: i32 = 120;
const WARP_REACH: f64 = 900.0;

/// Truncated 0..255 alpha as an opacity.
fn alpha(value: f64) -> f64 {
    value.floor().clamp(0.0, 255.0) / 255.0
}

/// Displacement of a grid point at `distance` from the core.
fn warp(distance: f64) -> f64 {
    if distance >= WARP_REACH {
        return 0.0;
    }
    let falloff = 1.0 - (distance / WARP_REACH).powi(2);
    (distance * 0.01).sin() * falloff * 180.0
}

/// Segment-by-segment stroke, fading with distance from `core`.
fn draw_grid_line(b: &mut SceneBuilder, core: Point, points: &[Point]) {
    for pair in points.windows(2) {
        let d = ((pair[0] - core).hypot() / 600.0).min(1.0);
        let opacity = alpha(20.0 * (1.0 - d * 0.7));
        b.line(pair[0], pair[1], StrokeStyle::new(Paint::new(GRID, opacity), 1.0));
    }
}

fn distorted_grid(b: &mut SceneBuilder, core: Point) {
    let (w, h) = (WIDTH as i32, HEIGHT as i32);
    for x in (-200..w + 200).step_by(GRID_SPACING as usize) {
        let x = f64::from(x);
        let points: Vec<Point> = (0..h + 200)
            .step_by(40)
            .map(|y| {
                let y = f64::from(y);
                let d = (Point::new(x, y) - core).hypot();
                Point::new(x + warp(d), y)
            })
            .collect();
        draw_grid_line(b, core, &points);
    }
    for y in (-200..h + 200).step_by(GRID_SPACING as usize) {
        let y = f64::from(y);
        let points: Vec<Point> = (0..w + 200)
            .step_by(40)
            .map(|x| {
                let x = f64::from(x);
                let d = (Point::new(x, y) - core).hypot();
                Point::new(x, y + warp(d))
            })
            .collect();
        draw_grid_line(b, core, &points);
    }
}

fn force_field_lines(b: &mut SceneBuilder, core: Point) {
    const RAYS: u32 = 24;
    for i in 0..RAYS {
        let angle = TAU * f64::from(i) / f64::from(RAYS);
        let points: Vec<Point> = (100..1000)
            .step_by(30)
            .map(|d| {
                let d = f64::from(d);
                let a = angle + (d * 0.01).sin() * 0.3;
                Point::new(core.x + d * a.cos(), core.y + d * a.sin())
            })
            .collect();
        let n = points.len() as f64;
        for (j, pair) in points.windows(2).enumerate() {
            let fade = j as f64 / n;
            let paint = Paint::new(RAY, alpha(40.0 * (1.0 - fade)));
            b.line(pair[0], pair[1], StrokeStyle::new(paint, 1.0));
        }
    }
}

fn neural_pathways(b: &mut SceneBuilder, core: Point) {
    const PATHWAYS: u32 = 8;
    for i in 0..PATHWAYS {
        let angle = TAU * f64::from(i) / f64::from(PATHWAYS);
        let points: Vec<Point> = (0..400)
            .step_by(15)
            .map(|d| {
                let d = f64::from(d);
                let a = angle + d * 0.01;
                Point::new(core.x + d * a.cos() * 0.9, core.y + d * a.sin() * 0.9)
            })
            .collect();
        let n = points.len() as f64;
        for (j, pair) in points.windows(2).enumerate() {
            let fade = j as f64 / n;
            let color = truncating_lerp(GOLD, PLATINUM, fade);
            let paint = Paint::new(color, alpha(200.0 * (1.0 - fade * 0.5)));
            b.line(pair[0], pair[1], StrokeStyle::new(paint, 3.0));
        }
    }
}

/// Per-channel `int(a + (b - a) * t)`.
fn truncating_lerp(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8;
    Rgba8::rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Stacked disks shading a sphere: bright rim, translucent center.
struct Sphere {
    size: i32,
    step: usize,
    peak_alpha: f64,
    tint_span: f64,
    green_drop: u8,
    blue_drop: u8,
    outline: Rgba8,
}

const LARGE_SPHERE: Sphere = Sphere {
    size: 45,
    step: 3,
    peak_alpha: 100.0,
    tint_span: 55.0,
    green_drop: 30,
    blue_drop: 80,
    outline: GOLD,
};

const SMALL_SPHERE: Sphere = Sphere {
    size: 25,
    step: 2,
    peak_alpha: 80.0,
    tint_span: 50.0,
    green_drop: 50,
    blue_drop: 100,
    outline: PLATINUM,
};

fn sphere(b: &mut SceneBuilder, center: Point, s: &Sphere) {
    let size = f64::from(s.size);
    for ring in (1..=s.size).rev().step_by(s.step) {
        let t = f64::from(ring) / size;
        let opacity = alpha(s.peak_alpha * (1.0 - t));
        if opacity <= 0.0 {
            continue;
        }
        let v = (200.0 + s.tint_span * t) as u8;
        let fill = Rgba8::rgb(v, v.saturating_sub(s.green_drop), v.saturating_sub(s.blue_drop));
        b.circle(
            center,
            f64::from(ring),
            Some(Paint::new(fill, opacity)),
            Some(StrokeStyle::new(Paint::new(s.outline, opacity), 1.0)),
        );
    }
}

fn orbital_elements(b: &mut SceneBuilder, core: Point) {
    for i in 0..6 {
        let angle = TAU * f64::from(i) / 6.0;
        let at = Point::new(core.x + 500.0 * angle.cos(), core.y + 500.0 * angle.sin());
        sphere(b, at, &LARGE_SPHERE);
    }
    for i in 0..12 {
        let angle = TAU * f64::from(i) / 12.0 + PI / 12.0;
        let at = Point::new(core.x + 700.0 * angle.cos(), core.y + 700.0 * angle.sin());
        sphere(b, at, &SMALL_SPHERE);
    }
}

fn core_presence(b: &mut SceneBuilder, core: Point) {
    for radius in [180.0, 140.0, 100.0, 60.0] {
        let opacity = alpha(150.0 * (1.0 - radius / 180.0));
        if opacity <= 0.0 {
            continue;
        }
        b.circle(
            core,
            radius,
            None,
            Some(StrokeStyle::new(Paint::new(GOLD, opacity), 2.0)),
        );
    }
    for ring in (1..=25).rev().step_by(2) {
        let opacity = alpha(180.0 * f64::from(ring) / 25.0);
        b.dot(core, f64::from(ring), Paint::new(EMBER, opacity));
    }
}

fn typography(b: &mut SceneBuilder) {
    let cx = f64::from(WIDTH) / 2.0;
    b.text(
        TextItem::new(
            "MEMORY",
            Point::new(cx, baseline(200.0, 120.0)),
            120.0,
            FontRole::SansBold,
            Paint::solid(Rgba8::rgba(220, 200, 160, 200)),
        )
        .anchored(TextAnchor::Middle),
    );
    b.text(
        TextItem::new(
            "A FIELD OF FORCE",
            Point::new(cx, baseline(350.0, 48.0)),
            48.0,
            FontRole::Sans,
            Paint::solid(Rgba8::rgba(150, 170, 200, 150)),
        )
        .anchored(TextAnchor::Middle),
    );
    let note = Paint::solid(Rgba8::rgba(180, 200, 220, 120));
    for (text, x, y) in [
        ("gravitational", 100.0, 800.0),
        ("distortion", f64::from(WIDTH) - 500.0, 1200.0),
        ("presence", 150.0, 2000.0),
    ] {
        b.text(TextItem::new(
            text,
            Point::new(x, baseline(y, 36.0)),
            36.0,
            FontRole::Sans,
            note,
        ));
    }
}

pub(crate) fn build() -> PosterResult<Scene> {
    let canvas = Canvas::new(WIDTH, HEIGHT)?;
    let core = Point::new(f64::from(WIDTH / 2), f64::from(HEIGHT / 2) - 200.0);
    let mut b = SceneBuilder::new(canvas, BACKGROUND);

    b.layer("distorted-grid");
    distorted_grid(&mut b, core);
    b.layer("force-lines");
    force_field_lines(&mut b, core);
    b.layer("pathways");
    neural_pathways(&mut b, core);
    b.layer("orbitals");
    orbital_elements(&mut b, core);
    b.layer("core");
    core_presence(&mut b, core);
    b.layer("type");
    typography(&mut b);

    b.build()
}

#[cfg(test)]
#[path = "../../tests/unit/posters/memory_force.rs"]
mod tests;
