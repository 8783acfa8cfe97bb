//! Retained drawing model shared by the raster and SVG backends.

pub(crate) mod builder;
pub(crate) mod model;
