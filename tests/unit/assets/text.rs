use super::*;
use crate::assets::fonts::FontBook;

fn system_font(role: FontRole) -> Option<std::sync::Arc<LoadedFont>> {
    FontBook::new(None).resolve(role)
}

#[test]
fn rejects_non_positive_size() {
    let font = LoadedFont {
        bytes: std::sync::Arc::new(vec![0u8; 4]),
        index: 0,
        family: "bogus".to_string(),
        origin: crate::assets::fonts::FontOrigin::System,
    };
    let mut engine = TextLayoutEngine::new();
    let err = engine
        .shape_line("x", FontRole::Mono, &font, 0.0, 0.0, TextBrushRgba8::default())
        .unwrap_err();
    assert!(matches!(err, PosterError::Validation(_)));
}

#[test]
fn shaped_glyphs_advance_left_to_right() {
    // Skips on hosts without any system font.
    let Some(font) = system_font(FontRole::Mono) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let line = engine
        .shape_line("MEMORY", FontRole::Mono, &font, 32.0, 0.0, TextBrushRgba8::default())
        .unwrap();
    assert_eq!(line.glyphs.len(), 6);
    assert!(line.width > 0.0);
    assert!(line.glyphs.windows(2).all(|w| w[0].x < w[1].x));
    assert!(line.glyphs.iter().all(|g| g.y.abs() < 1e-3));
}

#[test]
fn letter_spacing_widens_the_line() {
    let Some(font) = system_font(FontRole::Sans) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let tight = engine
        .shape_line("RECALL", FontRole::Sans, &font, 28.0, 0.0, TextBrushRgba8::default())
        .unwrap();
    let loose = engine
        .shape_line("RECALL", FontRole::Sans, &font, 28.0, 4.0, TextBrushRgba8::default())
        .unwrap();
    assert!(loose.width > tight.width);
}
