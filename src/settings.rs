//! Serializable export settings.
//!
//! [`ExportSettings`] captures what the UI lets a user choose (color,
//! format, resolution) in a JSON-friendly shape, so the same value can be
//! stored by the frontend and handed to the pipeline.
//!
//! # Example
//!
//! ```
//! use tinticon::{ExportSettings, OutputKind};
//!
//! let settings = ExportSettings::new()
//!     .with_color("#1DB954")
//!     .with_format(OutputKind::Ico)
//!     .with_resolution(128);
//!
//! let json = settings.to_json().unwrap();
//! let restored = ExportSettings::from_json(&json).unwrap();
//! assert_eq!(restored.ico_sizes(), vec![16, 32, 48, 64, 128, 256]);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::FillColor;
use crate::error::SettingsError;
use crate::icon::{OutputKind, RasterSpec};

/// Resolutions offered by default.
pub const PREDEFINED_RESOLUTIONS: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Largest custom resolution accepted.
pub const MAX_RESOLUTION: u32 = 4096;

/// Resolution used when none is stored.
pub const DEFAULT_RESOLUTION: u32 = 256;

/// User-facing export settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "color": "#FF0000",
///   "format": "ico",
///   "resolution": 64,
///   "icoSizes": [16, 32, 48]
/// }
/// ```
///
/// Every field is optional when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "tsify",
    derive(tsify_next::Tsify),
    tsify(into_wasm_abi, from_wasm_abi)
)]
pub struct ExportSettings {
    /// Fill color as hex. Invalid values render black.
    pub color: String,

    /// Output format.
    pub format: OutputKind,

    /// Square pixel size for PNG output; selects the ICO size preset.
    pub resolution: u32,

    /// Explicit ICO sizes, overriding the preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ico_sizes: Option<Vec<u32>>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            color: FillColor::BLACK.to_string(),
            format: OutputKind::default(),
            resolution: DEFAULT_RESOLUTION,
            ico_sizes: None,
        }
    }
}

impl ExportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_format(mut self, format: OutputKind) -> Self {
        self.format = format;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_ico_sizes(mut self, sizes: impl Into<Vec<u32>>) -> Self {
        self.ico_sizes = Some(sizes.into());
        self
    }

    /// Checks the resolution range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(SettingsError::ResolutionOutOfRange {
                value: self.resolution,
                max: MAX_RESOLUTION,
            });
        }
        Ok(())
    }

    /// The fill color, black if the stored string is invalid.
    pub fn fill_color(&self) -> FillColor {
        FillColor::parse_or_default(Some(&self.color))
    }

    /// The requested output as a [`RasterSpec`].
    pub fn raster_spec(&self) -> RasterSpec {
        RasterSpec::new(self.resolution, self.format)
    }

    /// ICO sizes: the explicit list if set, else the resolution's preset.
    pub fn ico_sizes(&self) -> Vec<u32> {
        match &self.ico_sizes {
            Some(sizes) => sizes.clone(),
            None => self.raster_spec().ico_sizes().to_vec(),
        }
    }

    /// True if the resolution is one of [`PREDEFINED_RESOLUTIONS`].
    pub fn is_predefined_resolution(&self) -> bool {
        PREDEFINED_RESOLUTIONS.contains(&self.resolution)
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the settings to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes and validates settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|err| SettingsError::Json(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ExportSettings::default();
        assert_eq!(settings.color, "#000000");
        assert_eq!(settings.format, OutputKind::Png);
        assert_eq!(settings.resolution, 256);
        assert!(settings.validate().is_ok());
        assert!(settings.is_predefined_resolution());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let settings = ExportSettings::from_json("{}").unwrap();
        assert_eq!(settings, ExportSettings::default());
    }

    #[test]
    fn json_format_is_camel_case() {
        let json = ExportSettings::new()
            .with_format(OutputKind::Ico)
            .with_ico_sizes([16, 32])
            .to_json_pretty()
            .unwrap();

        assert!(json.contains("\"icoSizes\""));
        assert!(json.contains("\"ico\""));
        assert!(!json.contains("ico_sizes"));
    }

    #[test]
    fn ico_sizes_omitted_when_unset() {
        let json = ExportSettings::new().to_json().unwrap();
        assert!(!json.contains("icoSizes"));
    }

    #[test]
    fn rejects_out_of_range_resolution() {
        assert_eq!(
            ExportSettings::new().with_resolution(0).validate(),
            Err(SettingsError::ResolutionOutOfRange { value: 0, max: 4096 })
        );
        assert!(ExportSettings::new().with_resolution(4096).validate().is_ok());
        assert!(ExportSettings::from_json(r#"{"resolution": 5000}"#).is_err());
        assert!(matches!(
            ExportSettings::from_json("[1, 2]"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn invalid_color_renders_black() {
        let settings = ExportSettings::new().with_color("not-a-color");
        assert_eq!(settings.fill_color(), FillColor::BLACK);
    }

    #[test]
    fn ico_sizes_prefers_explicit_list() {
        let preset = ExportSettings::new().with_resolution(32);
        assert_eq!(preset.ico_sizes(), vec![16, 32, 48, 64]);

        let explicit = preset.with_ico_sizes(vec![24, 40]);
        assert_eq!(explicit.ico_sizes(), vec![24, 40]);
    }
}
