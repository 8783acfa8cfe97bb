use std::path::Path;

use crate::assets::fonts::FontBook;
use crate::foundation::core::Canvas;
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::unpremultiply_in_place;
use crate::scene::model::Scene;

/// A rendered poster as RGBA8 pixels.
///
/// Frames produced by the backends are **premultiplied alpha**; the flag makes this explicit at
/// API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_in_place(&mut out);
        }
        out
    }
}

/// Backend-agnostic settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Uniform output scale; scene coordinates stay in poster units.
    pub scale: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl RenderSettings {
    /// Output surface for `scene` at this scale.
    pub fn output_canvas(&self, scene: &Scene) -> PosterResult<Canvas> {
        scene.canvas.scaled(self.scale)
    }
}

/// Something that can turn a [`Scene`] into a [`FrameRGBA`].
pub trait RenderBackend {
    /// Rasterize a validated scene.
    fn render_scene(&mut self, scene: &Scene) -> PosterResult<FrameRGBA>;
}

/// Available raster backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// `vello_cpu` rasterizer with `parley` text.
    Cpu,
    /// The SVG writer's output rasterized by `resvg`.
    SvgRaster,
}

/// Create a raster backend borrowing `fonts`.
pub fn create_backend<'f>(
    kind: BackendKind,
    settings: RenderSettings,
    fonts: &'f mut FontBook,
) -> Box<dyn RenderBackend + 'f> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new(settings, fonts)),
        BackendKind::SvgRaster => Box::new(
            crate::render::svg::SvgRasterBackend::new(
                settings,
                fonts.dir().map(Path::to_path_buf),
                fonts.uses_system_fonts(),
            )
            .with_font_files(fonts.pinned_files()),
        ),
    }
}

/// Output file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raster PNG.
    Png,
    /// Standalone SVG document.
    Svg,
}

impl OutputFormat {
    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> PosterResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            _ => Err(PosterError::validation(format!(
                "cannot infer output format from '{}' (expected .png or .svg)",
                path.display()
            ))),
        }
    }
}

/// Render `scene` and write it to `path`, creating parent directories.
///
/// PNG goes through the CPU backend; SVG through the SVG writer.
#[tracing::instrument(skip(scene, fonts), fields(path = %path.display()))]
pub fn write_output(
    scene: &Scene,
    path: &Path,
    format: OutputFormat,
    settings: RenderSettings,
    fonts: &mut FontBook,
) -> PosterResult<()> {
    create_parent_dir(path)?;
    match format {
        OutputFormat::Png => {
            let mut backend = crate::render::cpu::CpuBackend::new(settings, fonts);
            let frame = backend.render_scene(scene)?;
            write_png(&frame, path)
        }
        OutputFormat::Svg => {
            let doc = crate::render::svg::render_scene_svg(scene, settings)?;
            std::fs::write(path, doc)?;
            tracing::info!(bytes = path.metadata().map(|m| m.len()).unwrap_or(0), "svg written");
            Ok(())
        }
    }
}

/// Write a frame as straight-alpha PNG.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> PosterResult<()> {
    create_parent_dir(path)?;
    let data = frame.to_straight_rgba();
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| PosterError::render(format!("write png '{}': {e}", path.display())))?;
    tracing::info!(width = frame.width, height = frame.height, "png written");
    Ok(())
}

fn create_parent_dir(path: &Path) -> PosterResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
