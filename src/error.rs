//! Error types for the export pipeline.
//!
//! Every failure is a value scoped to one icon (or one size of one icon).
//! Nothing here is fatal to the process; batch callers collect these
//! per entry and keep going.

use thiserror::Error;

/// The icon markup could not be obtained from its source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("icon `{slug}` not found")]
    NotFound { slug: String },

    #[error("icon `{slug}` unavailable: {reason}")]
    Unavailable { slug: String, reason: String },
}

impl FetchError {
    /// The slug the fetch was attempted for.
    pub fn slug(&self) -> &str {
        match self {
            Self::NotFound { slug } | Self::Unavailable { slug, .. } => slug,
        }
    }
}

/// The markup is not a well-formed vector document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed markup at {line}:{column}: {message}")]
    Malformed {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("expected an `svg` root element, found `{found}`")]
    UnexpectedRoot { found: String },
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        Self::Malformed {
            line: pos.row,
            column: pos.col,
            message: err.to_string(),
        }
    }
}

/// A fill color string did not match the 3- or 6-digit hex pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color `{0}`")]
pub struct ColorError(pub String);

/// ICO container assembly failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IcoError {
    #[error("icon container needs at least one image")]
    Empty,

    #[error("icon container holds at most {max} images, got {count}")]
    TooManyImages { count: usize, max: usize },

    #[error("image of {size}px is {len} bytes, too large for an icon entry")]
    ImageTooLarge { size: u32, len: usize },

    #[error("size {size}px appears more than once")]
    DuplicateSize { size: u32 },

    #[error("icon frames must be between 1 and {max}px, got {size}")]
    SizeOutOfRange { size: u32, max: u32 },

    #[error("truncated icon container: {0}")]
    Truncated(&'static str),

    #[error("not an icon container: {0}")]
    InvalidHeader(&'static str),

    #[error("entry {index} points outside the container")]
    EntryOutOfBounds { index: usize },
}

/// Export settings outside their accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("resolution must be between 1 and {max}px, got {value}")]
    ResolutionOutOfRange { value: u32, max: u32 },

    #[error("malformed settings: {0}")]
    Json(String),
}

/// Everything that can go wrong exporting a single icon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to rasterize at {size}px: {reason}")]
    Rasterization { size: u32, reason: String },

    #[error("size {size}px requested more than once")]
    DuplicateSize { size: u32 },

    #[error("invalid icon size {size}px")]
    InvalidSize { size: u32 },

    #[error("no icon sizes requested")]
    EmptySizeSet,

    #[error("failed to encode PNG: {reason}")]
    Encode { reason: String },

    #[error(transparent)]
    Ico(IcoError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl From<IcoError> for ExportError {
    fn from(err: IcoError) -> Self {
        match err {
            IcoError::DuplicateSize { size } => Self::DuplicateSize { size },
            IcoError::Empty => Self::EmptySizeSet,
            IcoError::SizeOutOfRange { size, .. } => Self::InvalidSize { size },
            other => Self::Ico(other),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = ExportError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ico_duplicate_maps_to_export_duplicate() {
        let err: ExportError = IcoError::DuplicateSize { size: 32 }.into();
        assert_eq!(err, ExportError::DuplicateSize { size: 32 });
    }

    #[test]
    fn ico_size_range_maps_to_invalid_size() {
        let err: ExportError = IcoError::SizeOutOfRange { size: 512, max: 256 }.into();
        assert_eq!(err, ExportError::InvalidSize { size: 512 });
    }

    #[test]
    fn fetch_error_exposes_slug() {
        let err = FetchError::Unavailable {
            slug: "github".into(),
            reason: "timeout".into(),
        };
        assert_eq!(err.slug(), "github");
        assert_eq!(err.to_string(), "icon `github` unavailable: timeout");
    }

    #[test]
    fn malformed_markup_reports_position() {
        let err: ParseError = roxmltree::Document::parse("<svg><path></svg>")
            .unwrap_err()
            .into();
        assert!(matches!(err, ParseError::Malformed { line: 1, .. }));
    }
}
