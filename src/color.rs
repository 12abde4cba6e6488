//! Fill colors for recolored icons.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::ColorError;

/// A 24-bit RGB fill color written as hex.
///
/// Accepts exactly 3 or 6 hex digits, optionally prefixed with `#`. The
/// digits are kept as given, so `#FF0000` produces `fill="#FF0000"` and
/// file names ending in `-FF0000`.
///
/// ```
/// use tinticon::FillColor;
///
/// let red = FillColor::parse("#F00").unwrap();
/// assert_eq!(red.to_string(), "#F00");
/// assert_eq!(red.rgb(), palette::Srgb::new(255, 0, 0));
///
/// // Invalid input falls back to black
/// assert_eq!(FillColor::parse_or_default(Some("tomato")), FillColor::BLACK);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillColor {
    digits: Cow<'static, str>,
    rgb: Srgb<u8>,
}

impl FillColor {
    /// Black, the fallback for absent or invalid input.
    pub const BLACK: FillColor = FillColor {
        digits: Cow::Borrowed("000000"),
        rgb: Srgb::new(0, 0, 0),
    };

    /// Parses a strict 3- or 6-digit hex color.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let digits = input.strip_prefix('#').unwrap_or(input);

        let valid_len = digits.len() == 3 || digits.len() == 6;
        if !valid_len || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError(input.to_string()));
        }

        let rgb = Srgb::<u8>::from_str(digits).map_err(|_| ColorError(input.to_string()))?;

        Ok(Self {
            digits: Cow::Owned(digits.to_string()),
            rgb,
        })
    }

    /// Parses `input`, falling back to [`FillColor::BLACK`] when it is
    /// absent or invalid.
    pub fn parse_or_default(input: Option<&str>) -> Self {
        match input {
            Some(raw) => Self::parse(raw).unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to black");
                Self::BLACK
            }),
            None => Self::BLACK,
        }
    }

    /// Creates a color from an RGB triple. Digits are lowercase.
    pub fn from_rgb(rgb: Srgb<u8>) -> Self {
        Self {
            digits: Cow::Owned(format!("{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)),
            rgb,
        }
    }

    /// The RGB triple.
    pub fn rgb(&self) -> Srgb<u8> {
        self.rgb
    }

    /// The hex digits without the leading `#`, as used in file names.
    pub fn hex_digits(&self) -> &str {
        &self.digits
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_digits())
    }
}

impl FromStr for FillColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
