use super::*;
use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::scene::builder::SceneBuilder;
use crate::scene::model::{FontRole, TextAnchor};

fn sample_scene() -> Scene {
    let mut b = SceneBuilder::new(Canvas::new(300, 200).unwrap(), Rgba8::rgb(12, 15, 25));
    b.line(
        Point::new(0.0, 0.0),
        Point::new(100.0, 50.5),
        StrokeStyle::new(Paint::new(Rgba8::rgb(50, 55, 65), 0.5), 1.0).dashed(4.0, 8.0),
    );
    b.blurred_layer("glow core", 8.0);
    b.radial_glow(
        Point::new(150.0, 100.0),
        80.0,
        Paint::new(Rgba8::rgb(205, 145, 95), 0.3),
        Paint::new(Rgba8::rgb(205, 145, 95), 0.0),
    );
    b.layer("type");
    b.text(
        TextItem::new(
            "A & B <C>",
            Point::new(150.0, 40.0),
            28.0,
            FontRole::Sans,
            Paint::solid(Rgba8::rgb(220, 225, 235)),
        )
        .anchored(TextAnchor::Middle)
        .spaced(2.0)
        .weighted(300),
    );
    b.vertical_gradient(
        Rect::new(0.0, 150.0, 300.0, 200.0),
        Rgba8::rgb(0, 0, 0),
        Rgba8::rgb(255, 255, 255),
    );
    b.build().unwrap()
}

#[test]
fn num_trims_and_rounds() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(2.5), "2.5");
    assert_eq!(num(3.14159), "3.14");
    assert_eq!(num(-0.001), "0");
    assert_eq!(num(1200.0), "1200");
}

#[test]
fn escape_covers_markup_characters() {
    assert_eq!(escape_text("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&apos;");
    assert_eq!(escape_text("M₁ · №"), "M₁ · №");
}

#[test]
fn document_carries_defs_layers_and_attributes() {
    let doc = render_scene_svg(&sample_scene(), RenderSettings::default()).unwrap();
    assert!(doc.starts_with("<?xml"));
    assert!(doc.contains("viewBox=\"0 0 300 200\""));
    assert!(doc.contains("<feGaussianBlur stdDeviation=\"8\"/>"));
    assert!(doc.contains("filter=\"url(#blur1)\""));
    assert!(doc.contains("<g id=\"layer1-glow-core\""));
    assert!(doc.contains("stroke-dasharray=\"4 8\""));
    assert!(doc.contains("y2=\"50.5\""));
    assert!(doc.contains("text-anchor=\"middle\""));
    assert!(doc.contains("letter-spacing=\"2\""));
    assert!(doc.contains("font-weight=\"300\""));
    assert!(doc.contains(">A &amp; B &lt;C&gt;</text>"));
    assert!(doc.contains("<radialGradient id=\"grad1\""));
    assert!(doc.contains("<linearGradient id=\"grad2\""));
    assert!(doc.trim_end().ends_with("</svg>"));
}

#[test]
fn scale_changes_only_the_outer_size() {
    let doc = render_scene_svg(&sample_scene(), RenderSettings { scale: 0.5 }).unwrap();
    assert!(doc.contains("width=\"150\" height=\"100\" viewBox=\"0 0 300 200\""));
}

#[test]
fn output_parses_with_usvg() {
    let doc = render_scene_svg(&sample_scene(), RenderSettings::default()).unwrap();
    let tree = usvg::Tree::from_str(&doc, &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 300.0);
    assert_eq!(tree.size().height(), 200.0);
}

#[test]
fn serialization_is_deterministic() {
    let a = render_scene_svg(&sample_scene(), RenderSettings::default()).unwrap();
    let b = render_scene_svg(&sample_scene(), RenderSettings::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn raster_backend_matches_canvas_and_background() {
    let mut backend = SvgRasterBackend::new(RenderSettings { scale: 0.5 }, None, false);
    let frame = backend.render_scene(&sample_scene()).unwrap();
    assert_eq!((frame.width, frame.height), (150, 100));
    assert_eq!(frame.pixel(145, 3), Some([12, 15, 25, 255]));
}

/// Some installed font file, if the machine has one.
fn any_system_font_file() -> Option<(PathBuf, String)> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    db.faces().filter(|face| face.index == 0).find_map(|face| match &face.source {
        usvg::fontdb::Source::File(path) | usvg::fontdb::Source::SharedFile(path, _) => face
            .families
            .first()
            .map(|(name, _)| (path.clone(), name.clone())),
        _ => None,
    })
}

#[test]
fn pinned_file_becomes_the_generic_family() {
    let Some((path, family)) = any_system_font_file() else {
        return;
    };
    let mut db = usvg::fontdb::Database::new();
    load_pinned_files(&mut db, &[(FontRole::Sans, path.clone()), (FontRole::MonoBold, path)]);
    assert!(db.len() > 0);
    assert_eq!(db.family_name(&usvg::fontdb::Family::SansSerif), family);
    assert_eq!(db.family_name(&usvg::fontdb::Family::Monospace), family);
}

#[test]
fn missing_pinned_file_is_skipped() {
    let mut db = usvg::fontdb::Database::new();
    let before = db.family_name(&usvg::fontdb::Family::Monospace).to_owned();
    load_pinned_files(
        &mut db,
        &[(FontRole::Mono, PathBuf::from("/nonexistent/fieldposter-missing.ttf"))],
    );
    assert_eq!(db.len(), 0);
    assert_eq!(db.family_name(&usvg::fontdb::Family::Monospace), before);

    let mut backend = SvgRasterBackend::new(RenderSettings { scale: 0.5 }, None, false)
        .with_font_files(vec![(FontRole::Sans, PathBuf::from("/nonexistent/sans.ttf"))]);
    let frame = backend.render_scene(&sample_scene()).unwrap();
    assert_eq!((frame.width, frame.height), (150, 100));
}
