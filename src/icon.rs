//! Icon types shared across the export pipeline.
//!
//! A [`VectorIcon`] is the immutable input of every export. A
//! [`RasterSpec`] says what to produce from it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::FillColor;

/// A vector icon: outline markup plus the slug used to name exported files.
///
/// Cloning is cheap; the markup is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorIcon {
    slug: Arc<str>,
    markup: Arc<str>,
}

impl VectorIcon {
    /// Creates an icon from its slug and raw SVG markup.
    pub fn new(slug: impl Into<Arc<str>>, markup: impl Into<Arc<str>>) -> Self {
        Self {
            slug: slug.into(),
            markup: markup.into(),
        }
    }

    /// The stable identifier, e.g. `github`.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The raw SVG markup as fetched.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Builds the download name for this icon: `{slug}-{hex}.{ext}`.
    pub fn file_name(&self, color: &FillColor, kind: OutputKind) -> String {
        file_name(&self.slug, color, kind)
    }
}

/// Builds `{slug}-{hexColorWithoutHash}.{ext}`.
pub fn file_name(slug: &str, color: &FillColor, kind: OutputKind) -> String {
    format!("{}-{}.{}", slug, color.hex_digits(), kind.extension())
}

/// What an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub enum OutputKind {
    /// The recolored markup, no rasterization.
    Svg,
    /// A single PNG image.
    #[default]
    Png,
    /// A multi-resolution Windows icon.
    Ico,
}

impl OutputKind {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Ico => "ico",
        }
    }

    /// MIME type for the download.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Ico => "image/x-icon",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "ico" => Ok(Self::Ico),
            other => Err(format!("unknown output kind `{other}`")),
        }
    }
}

/// Icon sizes for a "standard" ICO.
pub const STANDARD_ICO_SIZES: [u32; 4] = [16, 32, 48, 64];

/// Icon sizes for a "full" ICO.
pub const FULL_ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// A requested output: square pixel size and kind.
///
/// `size` is ignored for [`OutputKind::Svg`]. For [`OutputKind::Ico`] it
/// selects the size preset (see [`RasterSpec::ico_sizes`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSpec {
    pub size: u32,
    pub kind: OutputKind,
}

impl RasterSpec {
    pub fn new(size: u32, kind: OutputKind) -> Self {
        Self { size, kind }
    }

    pub fn svg() -> Self {
        Self::new(0, OutputKind::Svg)
    }

    pub fn png(size: u32) -> Self {
        Self::new(size, OutputKind::Png)
    }

    pub fn ico(size: u32) -> Self {
        Self::new(size, OutputKind::Ico)
    }

    /// The ICO size preset for this resolution: the full set from 128px
    /// upward, the standard set below.
    pub fn ico_sizes(&self) -> &'static [u32] {
        if self.size >= 128 {
            &FULL_ICO_SIZES
        } else {
            &STANDARD_ICO_SIZES
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_hash() {
        let icon = VectorIcon::new("github", "<svg/>");
        let color = FillColor::parse("#FF0000").unwrap();
        assert_eq!(icon.file_name(&color, OutputKind::Png), "github-FF0000.png");
        assert_eq!(icon.file_name(&color, OutputKind::Ico), "github-FF0000.ico");
        assert_eq!(
            file_name("x", &FillColor::BLACK, OutputKind::Svg),
            "x-000000.svg"
        );
    }

    #[test]
    fn icon_clone_shares_markup() {
        let icon = VectorIcon::new("a", "<svg/>");
        let copy = icon.clone();
        assert!(std::ptr::eq(icon.markup(), copy.markup()));
    }

    #[test]
    fn output_kind_parsing() {
        assert_eq!("PNG".parse::<OutputKind>(), Ok(OutputKind::Png));
        assert_eq!("ico".parse::<OutputKind>(), Ok(OutputKind::Ico));
        assert!("gif".parse::<OutputKind>().is_err());
        assert_eq!(OutputKind::Svg.to_string(), "svg");
    }

    #[test]
    fn ico_preset_follows_resolution() {
        assert_eq!(RasterSpec::ico(64).ico_sizes(), &STANDARD_ICO_SIZES);
        assert_eq!(RasterSpec::ico(128).ico_sizes(), &FULL_ICO_SIZES);
        assert_eq!(RasterSpec::ico(1024).ico_sizes(), &FULL_ICO_SIZES);
    }
}
