use std::collections::HashMap;

use crate::assets::fonts::LoadedFont;
use crate::foundation::error::{PosterError, PosterResult};
use crate::scene::model::FontRole;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layout.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

/// A glyph positioned relative to the run's baseline origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlacedGlyph {
    pub(crate) id: u32,
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// Shaped single-line text.
#[derive(Clone, Debug, Default)]
pub(crate) struct ShapedLine {
    /// Glyphs with the first baseline at `y = 0` and the pen starting at `x = 0`.
    pub(crate) glyphs: Vec<PlacedGlyph>,
    /// Total advance.
    pub(crate) width: f32,
}

/// Stateful helper for shaping text with Parley from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<FontRole, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, role: FontRole, font: &LoadedFont) -> PosterResult<String> {
        if let Some(name) = self.families.get(&role) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PosterError::font("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::font("registered font family has no name"))?
            .to_string();
        self.families.insert(role, name.clone());
        Ok(name)
    }

    /// Shape one line of text.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        role: FontRole,
        font: &LoadedFont,
        size_px: f32,
        letter_spacing_px: f32,
        brush: TextBrushRgba8,
    ) -> PosterResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PosterError::validation(
                "text size must be finite and > 0",
            ));
        }
        let family_name = self.family_for(role, font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            letter_spacing_px,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = ShapedLine {
            glyphs: Vec::new(),
            width: layout.width(),
        };
        let mut first_baseline: Option<f32> = None;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let baseline = run.baseline();
                let origin_y = *first_baseline.get_or_insert(baseline);
                let mut x = run.offset();
                for g in run.glyphs() {
                    out.glyphs.push(PlacedGlyph {
                        id: u32::from(g.id),
                        x: x + g.x,
                        y: baseline - origin_y - g.y,
                    });
                    x += g.advance;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
