//! Rasterization and PNG encoding using resvg/usvg and `image`.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{ExportError, Result};
use crate::markup;
use crate::settings::MAX_RESOLUTION;

/// A square RGBA raster with premultiplied alpha.
///
/// Each raster owns its drawing surface; nothing is shared between
/// rasterizations.
#[derive(Clone, PartialEq)]
pub struct Raster {
    pixmap: Pixmap,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn premultiplied_data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Converts to straight (non-premultiplied) RGBA.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width(), self.height());

        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
            *dst = Rgba([r, g, b, a]);
        }

        img
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

fn rasterization_error(size: u32, reason: impl Into<String>) -> ExportError {
    ExportError::Rasterization {
        size,
        reason: reason.into(),
    }
}

/// Renders SVG markup onto a fresh `size`×`size` surface.
///
/// The document's intrinsic size (width/height, else viewBox) is scaled on
/// each axis to fill the square. Markup that does not parse, or that
/// references resources outside the document, fails with
/// [`ExportError::Rasterization`] for this size; no blank image is
/// substituted.
///
/// `size` must be between 1 and [`MAX_RESOLUTION`].
pub fn rasterize(svg_data: &str, size: u32) -> Result<Raster> {
    if size == 0 || size > MAX_RESOLUTION {
        return Err(rasterization_error(
            size,
            format!("size must be between 1 and {MAX_RESOLUTION}px"),
        ));
    }

    let prepared = markup::prepare_for_render(svg_data)
        .map_err(|err| rasterization_error(size, err.to_string()))?;

    if let Some(href) = prepared.external_reference {
        return Err(rasterization_error(
            size,
            format!("external resource `{href}` cannot be loaded"),
        ));
    }

    // Parse the SVG
    let opts = Options::default();
    let tree = Tree::from_str(&prepared.text, &opts)
        .map_err(|err| rasterization_error(size, err.to_string()))?;

    // Stretch the intrinsic size onto the square
    let svg_size = tree.size();
    let sx = size as f32 / svg_size.width();
    let sy = size as f32 / svg_size.height();

    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| rasterization_error(size, format!("cannot allocate a {size}x{size} surface")))?;
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    tracing::debug!(size, "rasterized icon");

    Ok(Raster { pixmap })
}

/// Encodes a raster as PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    encode_rgba(&raster.to_rgba_image())
}

/// Encodes straight RGBA pixels as PNG.
pub fn encode_rgba(img: &RgbaImage) -> Result<Vec<u8>> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ExportError::Encode {
            reason: format!("cannot encode a {}x{} image", img.width(), img.height()),
        });
    }

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| ExportError::Encode {
            reason: err.to_string(),
        })?;

    tracing::debug!(width = img.width(), bytes = buffer.len(), "encoded PNG");

    Ok(buffer)
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}
