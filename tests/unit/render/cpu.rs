use super::*;
use crate::foundation::core::Canvas;
use crate::scene::builder::SceneBuilder;
use crate::scene::model::TextAnchor;

fn no_fonts() -> FontBook {
    FontBook::new(None).without_system_fonts()
}

fn base() -> SceneBuilder {
    SceneBuilder::new(Canvas::new(20, 20).unwrap(), Rgba8::rgb(8, 12, 22))
}

#[test]
fn empty_scene_is_opaque_background() {
    let scene = base().build().unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).unwrap();
    assert_eq!((frame.width, frame.height), (20, 20));
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|px| px == [8, 12, 22, 255]));
}

#[test]
fn filled_rect_covers_interior_pixels() {
    let mut b = base();
    b.fill_rect(
        Rect::new(4.0, 4.0, 12.0, 12.0),
        Paint::solid(Rgba8::rgb(255, 0, 0)),
    );
    let scene = b.build().unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).unwrap();
    assert_eq!(frame.pixel(8, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(1, 1), Some([8, 12, 22, 255]));
}

#[test]
fn layer_opacity_mixes_with_background() {
    let mut b = SceneBuilder::new(Canvas::new(8, 8).unwrap(), Rgba8::rgb(0, 0, 0));
    b.layer("half").layer_opacity(0.5);
    b.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Paint::solid(Rgba8::rgb(200, 200, 200)));
    let scene = b.build().unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).unwrap();
    let px = frame.pixel(4, 4).unwrap();
    assert!((i32::from(px[0]) - 100).abs() <= 2, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn blurred_layer_bleeds_outside_its_shape() {
    let mut sharp = SceneBuilder::new(Canvas::new(32, 32).unwrap(), Rgba8::rgb(0, 0, 0));
    sharp.layer("core");
    sharp.fill_rect(Rect::new(12.0, 12.0, 20.0, 20.0), Paint::solid(Rgba8::rgb(255, 255, 255)));
    let mut soft = SceneBuilder::new(Canvas::new(32, 32).unwrap(), Rgba8::rgb(0, 0, 0));
    soft.blurred_layer("glow", 3.0);
    soft.fill_rect(Rect::new(12.0, 12.0, 20.0, 20.0), Paint::solid(Rgba8::rgb(255, 255, 255)));

    let mut fonts = no_fonts();
    let a = render_scene_cpu(&sharp.build().unwrap(), RenderSettings::default(), &mut fonts).unwrap();
    let b = render_scene_cpu(&soft.build().unwrap(), RenderSettings::default(), &mut fonts).unwrap();
    assert_eq!(a.pixel(9, 16).unwrap()[0], 0);
    assert!(b.pixel(9, 16).unwrap()[0] > 0);
    assert!(b.pixel(16, 16).unwrap()[0] < 255);
}

#[test]
fn scale_changes_output_size() {
    let scene = SceneBuilder::new(Canvas::new(200, 100).unwrap(), Rgba8::rgb(1, 2, 3))
        .build()
        .unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings { scale: 0.25 }, &mut fonts).unwrap();
    assert_eq!((frame.width, frame.height), (50, 25));
}

#[test]
fn text_without_fonts_is_skipped() {
    let mut b = base();
    b.label(
        "M₁",
        Point::new(2.0, 12.0),
        10.0,
        TextAnchor::Start,
        Paint::solid(Rgba8::rgb(255, 255, 255)),
    );
    let scene = b.build().unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [8, 12, 22, 255]));
}

#[test]
fn radial_gradient_fades_from_center() {
    let bytes = radial_gradient_bytes(
        10,
        10,
        Point::new(5.0, 5.0),
        5.0,
        Rgba8::rgba(255, 255, 255, 200),
        Rgba8::rgba(255, 255, 255, 0),
    );
    let alpha = |x: usize, y: usize| bytes[(y * 10 + x) * 4 + 3];
    assert!(alpha(5, 5) > alpha(8, 5));
    assert_eq!(alpha(0, 0), 0);
}

#[test]
fn surface_clip_bounds_oversized_shapes() {
    let huge = Rect::new(-1.0e9, -1.0e9, 1.0e9, 1.0e9);
    assert_eq!(clip_to_surface(huge, 40, 30), Some(Rect::new(0.0, 0.0, 40.0, 30.0)));
    assert_eq!(
        clip_to_surface(Rect::new(2.5, 3.2, 6.1, 7.0), 40, 30),
        Some(Rect::new(2.0, 3.0, 7.0, 7.0))
    );
    assert_eq!(clip_to_surface(Rect::new(50.0, 0.0, 60.0, 10.0), 40, 30), None);
}

#[test]
fn huge_radial_glow_renders_clipped() {
    let mut b = base();
    b.layer("glow");
    b.radial_glow(
        Point::new(10.0, 10.0),
        1.0e9,
        Paint::solid(Rgba8::rgb(255, 255, 255)),
        Paint::new(Rgba8::rgb(255, 255, 255), 0.0),
    );
    let scene = b.build().unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).unwrap();
    assert_eq!((frame.width, frame.height), (20, 20));
    // A pixel 10 units from the center of a 1e9 disk sits at its inner color.
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn offscreen_glow_leaves_background() {
    let mut b = base();
    b.radial_glow(
        Point::new(500.0, 500.0),
        50.0,
        Paint::solid(Rgba8::rgb(255, 255, 255)),
        Paint::solid(Rgba8::rgb(255, 255, 255)),
    );
    let scene = b.build().unwrap();
    let mut fonts = no_fonts();
    let frame = render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).unwrap();
    assert!(frame.data.chunks_exact(4).all(|px| px == [8, 12, 22, 255]));
}

#[test]
fn vertical_gradient_interpolates_rows() {
    let bytes = vertical_gradient_bytes(2, 3, Rgba8::rgb(0, 0, 0), Rgba8::rgb(200, 100, 0));
    assert_eq!(&bytes[0..4], &[0, 0, 0, 255]);
    assert_eq!(&bytes[8..12], &[100, 50, 0, 255]);
    assert_eq!(&bytes[16..20], &[200, 100, 0, 255]);
}

#[test]
fn invalid_scene_is_rejected() {
    let mut scene = base().build().unwrap();
    scene.layers[0].opacity = 2.0;
    let mut fonts = no_fonts();
    assert!(render_scene_cpu(&scene, RenderSettings::default(), &mut fonts).is_err());
}
