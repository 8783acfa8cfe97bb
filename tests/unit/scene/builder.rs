use super::*;

fn builder() -> SceneBuilder {
    SceneBuilder::new(Canvas::new(100, 60).unwrap(), Rgba8::rgba(5, 6, 7, 0))
}

fn stroke() -> StrokeStyle {
    StrokeStyle::new(Paint::solid(Rgba8::rgb(50, 50, 50)), 1.0)
}

#[test]
fn background_is_forced_opaque() {
    let scene = builder().build().unwrap();
    assert_eq!(scene.background, Rgba8::rgb(5, 6, 7));
    assert_eq!(scene.layers.len(), 1);
    assert_eq!(scene.layers[0].name, "base");
}

#[test]
fn items_land_in_most_recent_layer() {
    let mut b = builder();
    b.dot(Point::new(1.0, 1.0), 2.0, Paint::solid(Rgba8::rgb(1, 1, 1)));
    b.blurred_layer("glow", 4.0).layer_opacity(0.5);
    b.line(Point::ZERO, Point::new(10.0, 10.0), stroke());
    b.line(Point::ZERO, Point::new(20.0, 10.0), stroke());
    let scene = b.build().unwrap();

    assert_eq!(scene.layers.len(), 2);
    assert_eq!(scene.layers[0].items.len(), 1);
    assert_eq!(scene.layers[1].items.len(), 2);
    assert_eq!(scene.layers[1].blur_sigma, Some(4.0));
    assert_eq!(scene.layers[1].opacity, 0.5);
}

#[test]
fn stepped_excludes_end() {
    assert_eq!(stepped(0.0, 100.0, 40.0).unwrap(), vec![0.0, 40.0, 80.0]);
    assert_eq!(stepped(0.0, 80.0, 40.0).unwrap(), vec![0.0, 40.0]);
    assert!(stepped(0.0, 10.0, 0.0).is_err());
}

#[test]
fn grid_draws_both_directions() {
    let mut b = builder();
    b.grid(Rect::new(0.0, 0.0, 100.0, 60.0), 20.0, stroke())
        .unwrap();
    let scene = b.build().unwrap();
    // 5 verticals (0..80) + 3 horizontals (0..40)
    assert_eq!(scene.layers[0].items.len(), 8);
}

#[test]
fn glow_circle_opacity_rises_toward_center() {
    let mut b = builder();
    b.glow_circle(Point::new(50.0, 30.0), 10.0, 2.0, Rgba8::rgb(255, 255, 255), 0.8);
    let scene = b.build().unwrap();
    let opacities: Vec<f64> = scene.layers[0]
        .items
        .iter()
        .map(|item| match item {
            DrawItem::Circle {
                fill: Some(p), ..
            } => p.opacity,
            _ => panic!("expected filled circle"),
        })
        .collect();
    assert!(!opacities.is_empty());
    assert!(opacities.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn frame_and_scanlines_cover_canvas() {
    let mut b = builder();
    b.frame(10.0, stroke());
    b.scanlines(6.0, Paint::new(Rgba8::rgb(0, 0, 0), 0.1)).unwrap();
    let scene = b.build().unwrap();
    let items = &scene.layers[0].items;
    let DrawItem::Rect { rect, .. } = &items[0] else {
        panic!("expected frame rect");
    };
    assert_eq!(*rect, Rect::new(10.0, 10.0, 90.0, 50.0));
    assert_eq!(items.len(), 1 + 10);
}

#[test]
fn polyline_needs_two_points() {
    let mut b = builder();
    b.polyline(vec![Point::ZERO], stroke());
    b.polygon(&[], Paint::solid(Rgba8::rgb(1, 1, 1)));
    assert_eq!(b.build().unwrap().item_count(), 0);
}

#[test]
fn build_rejects_invalid_items() {
    let mut b = builder();
    b.rings(Point::new(1.0, 1.0), &[10.0, -1.0], stroke());
    assert!(b.build().is_err());
}

#[test]
fn glow_rect_grows_outward_and_keeps_dim_core() {
    let mut b = builder();
    let pane = Rect::new(20.0, 10.0, 60.0, 40.0);
    b.glow_rect(pane, Rgba8::rgb(6, 182, 212), 2.0, 3, 0.15);
    let scene = b.build().unwrap();
    let items = &scene.layers[0].items;
    // i = 3 has zero opacity
    assert_eq!(items.len(), 3);
    let DrawItem::Rect {
        rect,
        stroke: Some(s),
        ..
    } = &items[0]
    else {
        panic!("expected stroked rect");
    };
    assert_eq!(*rect, pane.inflate(2.0, 2.0));
    assert_eq!(s.width, 4.0);
    let DrawItem::Rect {
        rect,
        stroke: Some(core),
        ..
    } = items.last().unwrap()
    else {
        panic!("expected stroked rect");
    };
    assert_eq!(*rect, pane);
    assert_eq!(core.paint.opacity, 0.4);
}
