//! Fonts and text shaping.

pub(crate) mod fonts;
pub(crate) mod text;
