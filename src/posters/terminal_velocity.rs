//! Terminal Velocity: tmux-like panes, seeded process grids and phosphor type.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::PosterResult;
use crate::posters::baseline;
use crate::scene::builder::SceneBuilder;
use crate::scene::model::{FontRole, Paint, Scene, StrokeStyle, TextAnchor, TextItem};

const WIDTH: u32 = 2400;
const HEIGHT: u32 = 1350;

const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
const DARK_GRAY: Rgba8 = Rgba8::rgb(26, 29, 26);
const EMERALD: Rgba8 = Rgba8::rgb(16, 185, 129);
const TEAL: Rgba8 = Rgba8::rgb(6, 182, 212);
const CYAN_BRIGHT: Rgba8 = Rgba8::rgb(34, 211, 238);
const WHITE: Rgba8 = Rgba8::rgb(240, 253, 244);
const EMERALD_DIM: Rgba8 = Rgba8::rgb(6, 95, 70);
const TEAL_DIM: Rgba8 = Rgba8::rgb(22, 78, 99);

/// Blur of the layer carrying the headline's halo.
const HEADLINE_GLOW_SIGMA: f64 = 8.0;

/// A pane outline and its halo.
#[derive(Clone, Copy)]
struct Pane {
    rect: Rect,
    color: Rgba8,
    outline: f64,
    glow: u32,
}

fn panes() -> [Pane; 3] {
    let (w, h) = (f64::from(WIDTH), f64::from(HEIGHT));
    let pane = |x: f64, y: f64, pw: f64, ph: f64| Rect::new(w * x, h * y, w * (x + pw), h * (y + ph));
    [
        Pane {
            rect: pane(0.38, 0.52, 0.58, 0.40),
            color: EMERALD,
            outline: 2.0,
            glow: 8,
        },
        Pane {
            rect: pane(0.06, 0.32, 0.44, 0.33),
            color: TEAL,
            outline: 2.0,
            glow: 7,
        },
        Pane {
            rect: pane(0.56, 0.10, 0.37, 0.24),
            color: CYAN_BRIGHT,
            outline: 1.0,
            glow: 5,
        },
    ]
}

/// Seeded grid of active cells inside a pane.
struct ProcessGrid {
    inset: f64,
    cell: f64,
    density: f64,
    alpha: f64,
}

fn process_grid<R: Rng + ?Sized>(
    b: &mut SceneBuilder,
    rng: &mut R,
    pane: &Pane,
    grid: &ProcessGrid,
) {
    let r = pane.rect;
    let area = Rect::new(
        r.x0 + grid.inset,
        r.y0 + grid.inset,
        r.x1 - grid.inset,
        r.y1 - grid.inset,
    );
    let cols = (area.width() / grid.cell).floor() as u32;
    let rows = (area.height() / grid.cell).floor() as u32;
    let mut active = 0u32;
    for row in 0..rows {
        for col in 0..cols {
            if rng.gen_range(0.0..1.0) >= grid.density {
                continue;
            }
            active += 1;
            let x = area.x0 + f64::from(col) * grid.cell;
            let y = area.y0 + f64::from(row) * grid.cell;
            let cell = Rect::new(x, y, x + grid.cell, y + grid.cell);
            for layer in 0..3u32 {
                let grow = f64::from(layer) * 2.0;
                let opacity = (grid.alpha / 3.0) * f64::from(3 - layer) / 3.0;
                b.fill_rect(cell.inflate(grow, grow), Paint::new(pane.color, opacity));
            }
            b.fill_rect(
                Rect::new(x, y, x + grid.cell - 2.0, y + grid.cell - 2.0),
                Paint::new(pane.color, grid.alpha * 0.6),
            );
        }
    }
    tracing::debug!(rows, cols, active, "process grid filled");
}

/// Stacked rectangles behind a cursor block, opacity rising toward the block.
struct Halo {
    reach: u32,
    step: usize,
    intensity: f64,
}

fn cursor(b: &mut SceneBuilder, at: Point, size: f64, color: Rgba8, halo: &Halo, core: f64) {
    let block = Rect::new(at.x, at.y, at.x + size, at.y + size);
    let reach = f64::from(halo.reach);
    for r in (1..=halo.reach).rev().step_by(halo.step) {
        let r = f64::from(r);
        let opacity = halo.intensity * (reach - r) / reach;
        if opacity > 0.0 {
            b.fill_rect(block.inflate(r, r), Paint::new(color, opacity));
        }
    }
    b.fill_rect(block, Paint::new(color, core));
}

pub(crate) fn build(seed: u64) -> PosterResult<Scene> {
    let canvas = Canvas::new(WIDTH, HEIGHT)?;
    let (w, h) = (f64::from(WIDTH), f64::from(HEIGHT));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = SceneBuilder::new(canvas, BLACK);

    b.grid(canvas.rect(), 36.0, StrokeStyle::new(Paint::new(DARK_GRAY, 0.12), 1.0))?;

    b.layer("diagonals");
    const DIAGONALS: u32 = 40;
    for i in 0..DIAGONALS {
        let y1 = h - f64::from(i) * (h / f64::from(DIAGONALS));
        let color = match i % 3 {
            0 => EMERALD,
            1 => TEAL,
            _ => CYAN_BRIGHT,
        };
        let opacity = 0.05 * (1.0 - f64::from(i) / f64::from(DIAGONALS) * 0.6);
        let width = if i % 5 == 0 { 3.0 } else { 1.0 };
        b.line(
            Point::new(0.0, y1),
            Point::new(w, y1 - h * 0.4),
            StrokeStyle::new(Paint::new(color, opacity), width),
        );
    }

    b.layer("panes");
    let panes = panes();
    for pane in &panes {
        b.glow_rect(pane.rect, pane.color, pane.outline, pane.glow, 0.15);
    }

    b.layer("processes");
    let grids = [
        ProcessGrid {
            inset: 20.0,
            cell: 28.0,
            density: 0.28,
            alpha: 0.25,
        },
        ProcessGrid {
            inset: 20.0,
            cell: 24.0,
            density: 0.22,
            alpha: 0.2,
        },
        ProcessGrid {
            inset: 15.0,
            cell: 20.0,
            density: 0.18,
            alpha: 0.18,
        },
    ];
    for (pane, grid) in panes.iter().zip(&grids) {
        process_grid(&mut b, &mut rng, pane, grid);
    }

    let velocity = Point::new(140.0, h / 2.0 - 90.0);
    let headline = TextItem::new(
        "VELOCITY",
        Point::new(velocity.x, baseline(velocity.y, 180.0)),
        180.0,
        FontRole::MonoBold,
        Paint::solid(EMERALD),
    );
    b.blurred_layer("headline-glow", HEADLINE_GLOW_SIGMA);
    b.text(TextItem {
        paint: Paint::new(EMERALD, 0.8),
        ..headline.clone()
    });

    b.layer("type");
    b.text(TextItem::new(
        "TERMINAL",
        Point::new(100.0, baseline(90.0, 38.0)),
        38.0,
        FontRole::MonoBold,
        Paint::new(EMERALD_DIM, 0.7),
    ));
    b.text(headline);
    b.label(
        "$ zero → deploy --speed=∞",
        Point::new(velocity.x + 8.0, baseline(velocity.y + 200.0, 32.0)),
        32.0,
        TextAnchor::Start,
        Paint::new(TEAL, 0.85),
    );

    let status_x = w - 120.0;
    for (i, line) in ["PROCESS: 45+ CONCURRENT", "UPTIME: 6 MONTHS", "STATUS: ACCELERATING"]
        .into_iter()
        .enumerate()
    {
        let top = 140.0 + i as f64 * 36.0;
        b.label(
            line,
            Point::new(status_x, baseline(top, 20.0)),
            20.0,
            TextAnchor::End,
            Paint::new(TEAL_DIM, 0.7),
        );
    }
    for (line, top) in [("SYSTEM.MATT_M", 80.0), ("PROMPT.ENGINEER", 112.0)] {
        b.label(
            line,
            Point::new(status_x, baseline(top, 20.0)),
            20.0,
            TextAnchor::End,
            Paint::new(EMERALD_DIM, 0.6),
        );
    }

    b.layer("cursors");
    cursor(
        &mut b,
        Point::new(velocity.x - 26.0, velocity.y + 10.0),
        16.0,
        EMERALD,
        &Halo {
            reach: 20,
            step: 2,
            intensity: 0.15,
        },
        1.0,
    );
    let side = panes[1].rect;
    for (at, size) in [
        (Point::new(status_x - 30.0, 144.0), 12.0),
        (Point::new(side.x0 + 15.0, side.y1 - 30.0), 10.0),
    ] {
        let halo = Halo {
            reach: 8,
            step: 1,
            intensity: 0.08,
        };
        cursor(&mut b, at, size, TEAL, &halo, 0.6);
    }

    b.layer("markers");
    let marker = StrokeStyle::new(Paint::new(CYAN_BRIGHT, 0.15), 1.0);
    const MARKER: f64 = 60.0;
    for f in [0.236, 0.5, 0.764] {
        let x = w * f;
        b.line(Point::new(x, 0.0), Point::new(x, MARKER), marker);
        b.line(Point::new(x, h - MARKER), Point::new(x, h), marker);
        let y = h * f;
        b.line(Point::new(0.0, y), Point::new(MARKER, y), marker);
        b.line(Point::new(w - MARKER, y), Point::new(w, y), marker);
    }

    b.layer("glow-points");
    let main = panes[0].rect;
    for (at, color, radius) in [
        (Point::new(main.x1 - 80.0, main.y1 - 80.0), EMERALD, 24.0),
        (Point::new(side.x0 + 80.0, side.y0 + 80.0), TEAL, 20.0),
        (Point::new(w / 2.0, h * 0.78), CYAN_BRIGHT, 18.0),
    ] {
        b.glow_circle(at, radius, 1.0, color, 0.08);
        b.dot(at, 3.0, Paint::new(color, 0.9));
    }

    b.layer("scanlines");
    b.scanlines(6.0, Paint::new(WHITE, 0.015))?;

    b.layer("frame");
    b.frame(40.0, StrokeStyle::new(Paint::new(EMERALD_DIM, 0.25), 2.0));
    b.frame(44.0, StrokeStyle::new(Paint::new(BLACK, 0.3), 1.0));

    b.build()
}

#[cfg(test)]
#[path = "../../tests/unit/posters/terminal_velocity.rs"]
mod tests;
