//! tinticon: recolor vector icons and export them as SVG, PNG or ICO
//!
//! This crate takes an icon's SVG markup, sets its root fill color, and
//! produces downloadable files: the recolored markup, a square PNG, or a
//! multi-resolution Windows icon built from PNG frames.
//!
//! # Example
//!
//! ```
//! use tinticon::{export, FillColor, RasterSpec, VectorIcon};
//!
//! let icon = VectorIcon::new(
//!     "github",
//!     r#"<svg viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#,
//! );
//! let red = FillColor::parse("#FF0000").unwrap();
//!
//! let png = export(&icon, &red, RasterSpec::png(64)).unwrap();
//! assert_eq!(png.file_name, "github-FF0000.png");
//!
//! let ico = export(&icon, &red, RasterSpec::ico(64)).unwrap();
//! assert_eq!(ico.mime_type(), "image/x-icon");
//! ```
//!
//! # Sources and batches
//!
//! Markup comes from an [`IconSource`]. Wrap a source in [`CachedSource`]
//! to fetch each slug once per session, and use [`export_batch`] to run
//! many slugs concurrently:
//!
//! ```
//! use tinticon::{export_batch, CachedSource, ExportSettings, OutputKind, StaticSource};
//!
//! let source = CachedSource::new(
//!     StaticSource::new().with_icon("dot", r#"<svg viewBox="0 0 2 2"><circle cx="1" cy="1" r="1"/></svg>"#),
//! );
//! let settings = ExportSettings::new().with_format(OutputKind::Ico).with_resolution(32);
//!
//! let report = export_batch(&source, &["dot", "dot"], &settings);
//! assert_eq!(report.success_count(), 2);
//! assert_eq!(source.cached_len(), 1);
//! ```

mod batch;
mod color;
mod error;
mod export;
mod ico;
mod icon;
pub mod markup;
mod raster;
mod settings;
mod source;

#[cfg(feature = "wasm")]
mod wasm;

pub use batch::{BatchEntry, BatchReport, export_batch};
pub use color::FillColor;
pub use error::{ColorError, ExportError, FetchError, IcoError, ParseError, Result, SettingsError};
pub use export::{
    ExportedFile, export, export_ico, export_png, export_svg, export_with_settings, validate_sizes,
};
pub use ico::{IcoContainer, IcoDirectory, IcoEntry, IcoFrame, MAX_ICO_SIZE};
pub use icon::{FULL_ICO_SIZES, OutputKind, RasterSpec, STANDARD_ICO_SIZES, VectorIcon, file_name};
pub use raster::{Raster, encode_png, encode_rgba, rasterize};
pub use settings::{DEFAULT_RESOLUTION, ExportSettings, MAX_RESOLUTION, PREDEFINED_RESOLUTIONS};
pub use source::{CDN_BASE_URL, CachedSource, IconSource, StaticSource, cdn_url};
