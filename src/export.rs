//! The export pipeline: colorize, rasterize, encode, pack.
//!
//! # Pipeline
//!
//! 1. **Colorize** ([`markup::colorize`]) - sets the root `fill`
//! 2. **Rasterize** ([`raster::rasterize`]) - renders onto an N×N surface
//! 3. **Encode** ([`raster::encode_png`]) - PNG bytes
//! 4. **Pack** ([`IcoContainer`]) - one PNG frame per size, ICO only
//!
//! Every function here is pure: the same icon, color and sizes always
//! produce the same bytes.

use std::collections::HashSet;

use crate::color::FillColor;
use crate::error::{ExportError, Result};
use crate::ico::{IcoContainer, MAX_ICO_SIZE};
use crate::icon::{OutputKind, RasterSpec, VectorIcon};
use crate::markup;
use crate::raster;
use crate::settings::ExportSettings;

/// A finished export, ready for the host's download/save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// `{slug}-{hex}.{ext}`
    pub file_name: String,
    pub kind: OutputKind,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Returns the recolored markup as UTF-8 bytes. No rasterization.
pub fn export_svg(icon: &VectorIcon, color: &FillColor) -> Result<Vec<u8>> {
    let colored = markup::colorize(icon.markup(), color)?;
    Ok(colored.into_bytes())
}

/// Renders the recolored icon at `size`×`size` and encodes it as PNG.
pub fn export_png(icon: &VectorIcon, color: &FillColor, size: u32) -> Result<Vec<u8>> {
    let colored = markup::colorize(icon.markup(), color)?;
    render_png(&colored, size)
}

/// Renders the recolored icon once per size and packs the PNGs into an ICO.
///
/// Sizes must be non-empty, unique and within `1..=256`; this is checked
/// before any rendering. The first size that fails aborts the whole container.
///
/// ```
/// use tinticon::{export_ico, FillColor, IcoDirectory, VectorIcon};
///
/// let icon = VectorIcon::new(
///     "square",
///     r#"<svg viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#,
/// );
/// let color = FillColor::parse("#FF0000").unwrap();
///
/// let bytes = export_ico(&icon, &color, &[16, 32]).unwrap();
/// let dir = IcoDirectory::parse(&bytes).unwrap();
/// assert_eq!(dir.entries[0].width, 16);
/// assert_eq!(dir.entries[0].offset, 6 + 32);
/// ```
pub fn export_ico(icon: &VectorIcon, color: &FillColor, sizes: &[u32]) -> Result<Vec<u8>> {
    validate_sizes(sizes)?;

    let colored = markup::colorize(icon.markup(), color)?;

    let mut container = IcoContainer::new();
    for &size in sizes {
        container.push(size, render_png(&colored, size)?)?;
    }

    let bytes = container.to_bytes()?;
    tracing::debug!(
        slug = icon.slug(),
        images = container.len(),
        bytes = bytes.len(),
        "packed icon container"
    );
    Ok(bytes)
}

/// Exports `icon` as described by `spec`.
///
/// For [`OutputKind::Ico`] the sizes come from [`RasterSpec::ico_sizes`].
pub fn export(icon: &VectorIcon, color: &FillColor, spec: RasterSpec) -> Result<ExportedFile> {
    let bytes = match spec.kind {
        OutputKind::Svg => export_svg(icon, color)?,
        OutputKind::Png => export_png(icon, color, spec.size)?,
        OutputKind::Ico => export_ico(icon, color, spec.ico_sizes())?,
    };

    Ok(ExportedFile {
        file_name: icon.file_name(color, spec.kind),
        kind: spec.kind,
        bytes,
    })
}

/// Exports `icon` with user settings.
///
/// Settings are validated first. An invalid color falls back to black.
pub fn export_with_settings(icon: &VectorIcon, settings: &ExportSettings) -> Result<ExportedFile> {
    settings.validate()?;

    let color = settings.fill_color();
    let bytes = match settings.format {
        OutputKind::Svg => export_svg(icon, &color)?,
        OutputKind::Png => export_png(icon, &color, settings.resolution)?,
        OutputKind::Ico => export_ico(icon, &color, &settings.ico_sizes())?,
    };

    Ok(ExportedFile {
        file_name: icon.file_name(&color, settings.format),
        kind: settings.format,
        bytes,
    })
}

fn render_png(colored: &str, size: u32) -> Result<Vec<u8>> {
    let raster = raster::rasterize(colored, size)?;
    raster::encode_png(&raster)
}

/// Checks an ICO size set: non-empty, each size in `1..=256`, no repeats.
pub fn validate_sizes(sizes: &[u32]) -> Result<()> {
    if sizes.is_empty() {
        return Err(ExportError::EmptySizeSet);
    }

    let mut seen = HashSet::with_capacity(sizes.len());
    for &size in sizes {
        if size == 0 || size > MAX_ICO_SIZE {
            return Err(ExportError::InvalidSize { size });
        }
        if !seen.insert(size) {
            return Err(ExportError::DuplicateSize { size });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ico::IcoDirectory;

    const SQUARE: &str = r#"<svg viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#;

    fn icon() -> VectorIcon {
        VectorIcon::new("square", SQUARE)
    }

    fn blue() -> FillColor {
        FillColor::parse("#0000FF").unwrap()
    }

    #[test]
    fn svg_export_only_colorizes() {
        let bytes = export_svg(&icon(), &blue()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r##"<svg fill="#0000FF" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"##
        );
    }

    #[test]
    fn png_export_uses_fill_color() {
        let png = export_png(&icon(), &blue(), 32).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (32, 32));
        assert_eq!(img.get_pixel(16, 16).0, [0, 0, 255, 255]);
    }

    #[test]
    fn png_export_is_deterministic() {
        assert_eq!(
            export_png(&icon(), &blue(), 48).unwrap(),
            export_png(&icon(), &blue(), 48).unwrap()
        );
    }

    #[test]
    fn ico_export_structure() {
        let bytes = export_ico(&icon(), &blue(), &[16, 32, 48]).unwrap();
        let dir = IcoDirectory::parse(&bytes).unwrap();

        let widths: Vec<_> = dir.entries.iter().map(|e| e.width).collect();
        assert_eq!(widths, vec![16, 32, 48]);
        assert!(dir.entries.iter().all(|e| e.bit_depth == 32 && e.planes == 1));

        let frame = dir.image_data(&bytes, 2).unwrap();
        let decoded = image::load_from_memory(frame).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (48, 48));
    }

    #[test]
    fn ico_length_matches_frames() {
        let png16 = export_png(&icon(), &blue(), 16).unwrap();
        let png32 = export_png(&icon(), &blue(), 32).unwrap();
        let bytes = export_ico(&icon(), &blue(), &[16, 32]).unwrap();
        assert_eq!(bytes.len(), 6 + 32 + png16.len() + png32.len());
        assert_eq!(&bytes[38..38 + png16.len()], &png16[..]);
    }

    #[test]
    fn ico_rejects_bad_size_sets_before_rendering() {
        // Malformed markup would fail later; size checks come first
        let broken = VectorIcon::new("broken", "<svg");
        assert_eq!(
            export_ico(&broken, &blue(), &[32, 32]),
            Err(ExportError::DuplicateSize { size: 32 })
        );
        assert_eq!(export_ico(&broken, &blue(), &[]), Err(ExportError::EmptySizeSet));
        assert_eq!(
            export_ico(&broken, &blue(), &[16, 0]),
            Err(ExportError::InvalidSize { size: 0 })
        );
    }

    #[test]
    fn ico_rejects_sizes_above_256() {
        assert_eq!(
            export_ico(&icon(), &blue(), &[256, 512]),
            Err(ExportError::InvalidSize { size: 512 })
        );
        assert_eq!(
            export_ico(&icon(), &blue(), &[300]),
            Err(ExportError::InvalidSize { size: 300 })
        );

        let bytes = export_ico(&icon(), &blue(), &[16, 256]).unwrap();
        assert!(IcoDirectory::parse(&bytes).unwrap().has_unique_sizes());
    }

    #[test]
    fn one_failing_size_aborts_the_container() {
        let linked = VectorIcon::new(
            "linked",
            r#"<svg viewBox="0 0 4 4"><image href="https://cdn.example.com/a.png" width="4" height="4"/></svg>"#,
        );
        match export_ico(&linked, &blue(), &[16, 32]) {
            Err(ExportError::Rasterization { size, reason }) => {
                assert_eq!(size, 16);
                assert!(reason.contains("https://cdn.example.com/a.png"));
            }
            other => panic!("expected rasterization error, got {other:?}"),
        }
        assert!(matches!(
            export_png(&linked, &blue(), 32),
            Err(ExportError::Rasterization { size: 32, .. })
        ));
    }

    #[test]
    fn png_export_refuses_oversized_surfaces() {
        assert!(matches!(
            export_png(&icon(), &blue(), 60_000),
            Err(ExportError::Rasterization { size: 60_000, .. })
        ));
    }

    #[test]
    fn parse_errors_surface_as_parse() {
        let broken = VectorIcon::new("broken", "<svg><g></svg>");
        assert!(matches!(
            export_png(&broken, &blue(), 16),
            Err(ExportError::Parse(_))
        ));
    }

    #[test]
    fn export_dispatches_on_kind() {
        let svg = export(&icon(), &blue(), RasterSpec::svg()).unwrap();
        assert_eq!(svg.file_name, "square-0000FF.svg");
        assert_eq!(svg.mime_type(), "image/svg+xml");

        let ico = export(&icon(), &blue(), RasterSpec::ico(64)).unwrap();
        assert_eq!(ico.file_name, "square-0000FF.ico");
        assert_eq!(IcoDirectory::parse(&ico.bytes).unwrap().entries.len(), 4);
    }

    #[test]
    fn export_with_settings_validates() {
        let settings = ExportSettings::new().with_resolution(9000);
        assert!(matches!(
            export_with_settings(&icon(), &settings),
            Err(ExportError::Settings(_))
        ));

        let settings = ExportSettings::new()
            .with_color("#0000FF")
            .with_format(OutputKind::Png)
            .with_resolution(20);
        let file = export_with_settings(&icon(), &settings).unwrap();
        assert_eq!(file.file_name, "square-0000FF.png");
        let img = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!(img.width(), 20);
    }
}
