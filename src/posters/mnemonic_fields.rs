//! Mnemonic Fields: glowing memories pulling toward a central figure.

use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::PosterResult;
use crate::posters::baseline;
use crate::scene::builder::SceneBuilder;
use crate::scene::model::{FontRole, Paint, Scene, StrokeStyle, TextItem};

const WIDTH: u32 = 2400;
const HEIGHT: u32 = 3200;

const BACKGROUND_TOP: Rgba8 = Rgba8::rgb(2, 3, 12);
const BACKGROUND_BOTTOM: Rgba8 = Rgba8::rgb(1, 2, 8);
const FIGURE: Rgba8 = Rgba8::rgb(238, 243, 250);
const FIELD_LINE: Rgba8 = Rgba8::rgb(200, 225, 255);
const ARROW: Rgba8 = Rgba8::rgba(210, 235, 255, 200);
const FRAME: Rgba8 = Rgba8::rgba(195, 210, 230, 36);
const COORD: Rgba8 = Rgba8::rgba(175, 195, 215, 122);

/// Glow blur applied to the halo layer.
const HALO_SIGMA: f64 = 8.0;

struct Memory {
    x: f64,
    y: f64,
    radius: f64,
    intensity: f64,
    label: &'static str,
}

const MEMORIES: [Memory; 7] = [
    Memory { x: 1800.0, y: 800.0, radius: 180.0, intensity: 1.0, label: "M₁" },
    Memory { x: 600.0, y: 1200.0, radius: 140.0, intensity: 0.85, label: "M₂" },
    Memory { x: 1900.0, y: 2200.0, radius: 100.0, intensity: 0.7, label: "M₃" },
    Memory { x: 400.0, y: 2600.0, radius: 85.0, intensity: 0.6, label: "M₄" },
    Memory { x: 2100.0, y: 1600.0, radius: 120.0, intensity: 0.75, label: "M₅" },
    Memory { x: 300.0, y: 600.0, radius: 70.0, intensity: 0.5, label: "M₆" },
    Memory { x: 1600.0, y: 2800.0, radius: 95.0, intensity: 0.65, label: "M₇" },
];

impl Memory {
    fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Channel `int(value * intensity)` capped at 255.
fn channel(value: f64, intensity: f64) -> u8 {
    (value * intensity).clamp(0.0, 255.0) as u8
}

fn halos(b: &mut SceneBuilder) {
    for m in &MEMORIES {
        for i in (1..=40).rev() {
            let i = f64::from(i);
            let a = ((40.0 - i) * 4.5 * m.intensity).floor().max(0.0);
            if a <= 0.0 {
                continue;
            }
            let t = 1.0 - i / 40.0;
            let color = Rgba8::rgb(
                channel(220.0 + 35.0 * t, m.intensity),
                channel(140.0 + 40.0 * t, m.intensity),
                channel(50.0 + 30.0 * t, m.intensity),
            );
            b.dot(m.center(), m.radius * (1.0 + i * 0.12), Paint::new(color, a / 255.0));
        }
    }
}

fn cores(b: &mut SceneBuilder) {
    for m in &MEMORIES {
        for i in (1..=15).rev() {
            let i = f64::from(i);
            let brightness = 1.0 - i / 20.0;
            let color = Rgba8::rgb(
                channel(200.0 + 55.0 * brightness, m.intensity),
                channel(120.0 + 120.0 * brightness, m.intensity),
                channel(40.0 + 150.0 * brightness, m.intensity),
            );
            b.dot(m.center(), m.radius * i / 15.0, Paint::solid(color));
        }
    }
}

/// Quadratic Bezier point.
fn quad(p0: Point, ctrl: Point, p1: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * ctrl.x + t * t * p1.x,
        u * u * p0.y + 2.0 * u * t * ctrl.y + t * t * p1.y,
    )
}

fn field_lines(b: &mut SceneBuilder, center: Point) {
    const SEGMENTS: u32 = 60;
    for m in &MEMORIES {
        let to_center = center - m.center();
        let angle = to_center.y.atan2(to_center.x);
        let dir = Vec2::new(angle.cos(), angle.sin());
        for offset in [-30.0, 0.0, 30.0] {
            let perp = Vec2::new(-angle.sin() * offset, angle.cos() * offset);
            let start = (m.center() + dir * m.radius + perp).floor();
            let end = (center - dir * 150.0 + perp).floor();
            let ctrl = start.midpoint(end) + perp * 0.3;
            let factor = if offset == 0.0 { 0.9 } else { 0.75 };
            for i in 0..SEGMENTS {
                let t = f64::from(i) / f64::from(SEGMENTS);
                let t2 = f64::from(i + 1) / f64::from(SEGMENTS);
                let a = ((70.0 + 60.0 * (1.0 - t)).floor() * factor).floor();
                b.line(
                    quad(start, ctrl, end, t),
                    quad(start, ctrl, end, t2),
                    StrokeStyle::new(Paint::new(FIELD_LINE, a / 255.0), 2.0),
                );
            }
        }
    }
}

fn arrows(b: &mut SceneBuilder, center: Point) {
    const LENGTH: f64 = 35.0;
    const WING: f64 = std::f64::consts::PI / 6.0;
    let stroke = StrokeStyle::new(Paint::solid(ARROW), 3.0);
    for m in &MEMORIES {
        let d = center - m.center();
        let angle = d.y.atan2(d.x);
        let tip = m.center().midpoint(center);
        for wing in [angle - WING, angle + WING] {
            let from = Point::new(tip.x - LENGTH * wing.cos(), tip.y - LENGTH * wing.sin());
            b.line(from, tip, stroke);
        }
    }
}

fn figure(b: &mut SceneBuilder, c: Point) {
    let paint = Paint::solid(FIGURE);
    let at = |x0: f64, y0: f64, x1: f64, y1: f64| Rect::new(c.x + x0, c.y + y0, c.x + x1, c.y + y1);
    b.dot(Point::new(c.x, c.y - 58.0), 42.0, paint);
    b.fill_rect(at(-12.0, -16.0, 12.0, 0.0), paint);
    b.fill_rect(at(-35.0, 0.0, 35.0, 120.0), paint);
    b.fill_rect(at(-92.0, 5.0, -35.0, 27.0), paint);
    b.fill_rect(at(35.0, 5.0, 92.0, 27.0), paint);
    b.fill_rect(at(-30.0, 120.0, -4.0, 202.0), paint);
    b.fill_rect(at(4.0, 120.0, 30.0, 202.0), paint);
}

/// Text placed by its top-left corner, like the rest of this composition.
fn note(b: &mut SceneBuilder, text: &str, x: f64, top: f64, size: f64, font: FontRole, color: Rgba8) {
    b.text(TextItem::new(
        text,
        Point::new(x, baseline(top, size)),
        size,
        font,
        Paint::solid(color),
    ));
}

fn annotations(b: &mut SceneBuilder) {
    use FontRole::{Mono, Sans};
    note(b, "MNEMONIC FIELDS", 180.0, 2950.0, 64.0, Sans, Rgba8::rgba(230, 240, 255, 230));
    note(
        b,
        "A quantitative study of memory as gravitational force",
        180.0,
        3015.0,
        22.0,
        Sans,
        Rgba8::rgba(200, 215, 235, 165),
    );

    note(b, "F = m · g(r,t)", 180.0, 260.0, 32.0, Sans, Rgba8::rgba(220, 235, 250, 190));
    note(b, "temporal gravitational constant", 180.0, 305.0, 18.0, Sans, Rgba8::rgba(195, 215, 235, 155));
    note(b, "where r ∝ 1/t²", 180.0, 380.0, 22.0, Sans, Rgba8::rgba(205, 225, 245, 165));

    for m in &MEMORIES {
        note(b, m.label, m.x + 55.0, m.y - 35.0, 28.0, Sans, Rgba8::rgba(220, 230, 245, 205));
    }

    for (x, y, text) in [
        (1470.0, 1160.0, "r = 1.82u"),
        (870.0, 1350.0, "r = 2.31u"),
        (1570.0, 1910.0, "r = 1.54u"),
        (690.0, 2290.0, "r = 3.07u"),
    ] {
        note(b, text, x, y, 18.0, Sans, Rgba8::rgba(205, 218, 238, 165));
    }
    for (x, y, text) in [
        (1510.0, 1375.0, "F⃗₁"),
        (960.0, 1285.0, "F⃗₂"),
        (1615.0, 1970.0, "F⃗₃"),
        (710.0, 2320.0, "F⃗₄"),
    ] {
        note(b, text, x, y, 22.0, Sans, Rgba8::rgba(210, 225, 245, 180));
    }

    let frame = StrokeStyle::new(Paint::solid(FRAME), 1.0);
    b.stroke_rect(Rect::new(140.0, 140.0, 2260.0, 3060.0), frame);
    for y in [800.0, 1600.0, 2400.0] {
        b.line(Point::new(140.0, y), Point::new(165.0, y), frame);
    }
    for x in [600.0, 1200.0, 1800.0] {
        b.line(Point::new(x, 3060.0), Point::new(x, 3035.0), frame);
    }

    for (x, y, text) in [
        (95.0, 808.0, "0.25"),
        (95.0, 1608.0, "0.50"),
        (95.0, 2408.0, "0.75"),
        (575.0, 3095.0, "0.25"),
        (1175.0, 3095.0, "0.50"),
        (1775.0, 3095.0, "0.75"),
        (95.0, 3095.0, "0.00"),
        (2200.0, 3095.0, "τ units"),
    ] {
        note(b, text, x, y, 15.0, Mono, COORD);
    }
    note(b, "OBS-2451", 2100.0, 230.0, 15.0, Mono, Rgba8::rgba(165, 185, 205, 107));
}

pub(crate) fn build() -> PosterResult<Scene> {
    let canvas = Canvas::new(WIDTH, HEIGHT)?;
    let center = Point::new(f64::from(WIDTH / 2), f64::from(HEIGHT / 2));
    let mut b = SceneBuilder::new(canvas, BACKGROUND_TOP);

    b.vertical_gradient(canvas.rect(), BACKGROUND_TOP, BACKGROUND_BOTTOM);
    b.blurred_layer("halos", HALO_SIGMA);
    halos(&mut b);
    b.layer("cores");
    cores(&mut b);
    b.layer("field-lines");
    field_lines(&mut b, center);
    arrows(&mut b, center);
    b.layer("figure");
    figure(&mut b, center);
    b.layer("annotations");
    annotations(&mut b);

    b.build()
}

#[cfg(test)]
#[path = "../../tests/unit/posters/mnemonic_fields.rs"]
mod tests;
