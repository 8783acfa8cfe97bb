//! Fieldposter renders procedural posters built on weighted point fields.
//!
//! A poster is assembled in three steps:
//!
//! - Sample a potential field from weighted [`Source`]s with a seeded [`FieldSampler`]
//! - Lay the marks, traced lines, grids and type into a retained [`Scene`]
//! - Hand the scene to a backend: [`CpuBackend`] for PNG, [`render_scene_svg`] for SVG
//!
//! The same seed and configuration always produce the same scene.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod field;
mod foundation;
mod posters;
mod render;
mod scene;

/// JSON overrides for posters.
pub mod config;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Point, Rect, Rgba8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{PosterError, PosterResult};

pub use crate::field::FieldSampler;
pub use crate::field::potential::{Falloff, aggregate_potential, nearest_source, potential};
pub use crate::field::recipe::{FieldRecipe, FieldRun, FieldStats};
pub use crate::field::sampling::{Acceptance, Mark, MarkParams, SampleRegion, sample_marks};
pub use crate::field::source::{Category, Source, validate_sources};
pub use crate::field::trace::{TracePath, TraceParams, trace_fan, trace_path};

pub use crate::scene::builder::{SceneBuilder, stepped};
pub use crate::scene::model::{
    DrawItem, FontRole, Layer, Paint, Scene, StrokeStyle, TextAnchor, TextItem,
};

pub use crate::assets::fonts::{FontBook, FontOrigin, LoadedFont, directory_candidates};

pub use crate::render::backend::{
    BackendKind, FrameRGBA, OutputFormat, RenderBackend, RenderSettings, create_backend,
    write_output, write_png,
};
pub use crate::render::cpu::{CpuBackend, render_scene_cpu};
pub use crate::render::svg::{SvgRasterBackend, render_scene_svg};

pub use crate::posters::{DEFAULT_SEED, PosterKind, PosterOptions, build_poster};

pub use crate::config::{FontFiles, PosterConfig, TraceConfig};
