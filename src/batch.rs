//! Exporting many icons with one set of settings.
//!
//! Each slug runs its own fetch/export pipeline on the rayon pool. A
//! failure is recorded against its slug and never affects the others.

use rayon::prelude::*;

use crate::color::FillColor;
use crate::error::ExportError;
use crate::export::{ExportedFile, export_with_settings};
use crate::settings::ExportSettings;
use crate::source::IconSource;

/// The outcome of one slug in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub slug: String,
    pub result: Result<ExportedFile, ExportError>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-slug results of a batch export, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    color: FillColor,
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// All entries, in the order the slugs were given.
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Files that exported successfully.
    pub fn succeeded(&self) -> impl Iterator<Item = &ExportedFile> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    /// Slugs that failed, with their error.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &ExportError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|err| (e.slug.as_str(), err)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The color every file in the batch was exported with.
    pub fn color(&self) -> &FillColor {
        &self.color
    }

    /// Name for an archive of the successful files: `icons-{hex}.zip`.
    pub fn archive_name(&self) -> String {
        format!("icons-{}.zip", self.color.hex_digits())
    }

    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
}

/// Fetches and exports every slug with the same settings.
///
/// Slugs are processed concurrently. Invalid settings fail every entry
/// with the same error.
///
/// ```
/// use tinticon::{export_batch, ExportSettings, OutputKind, StaticSource};
///
/// let source = StaticSource::new()
///     .with_icon("a", r#"<svg viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#)
///     .with_icon("b", r#"<svg viewBox="0 0 24 24"><circle cx="12" cy="12" r="8"/></svg>"#);
/// let settings = ExportSettings::new()
///     .with_color("#112233")
///     .with_format(OutputKind::Svg);
///
/// let report = export_batch(&source, &["a", "missing", "b"], &settings);
/// assert_eq!(report.success_count(), 2);
/// assert_eq!(report.failed().next().unwrap().0, "missing");
/// assert_eq!(report.archive_name(), "icons-112233.zip");
/// ```
pub fn export_batch<S, T>(source: &S, slugs: &[T], settings: &ExportSettings) -> BatchReport
where
    S: IconSource + ?Sized,
    T: AsRef<str> + Sync,
{
    let entries: Vec<BatchEntry> = slugs
        .par_iter()
        .map(|slug| {
            let slug = slug.as_ref();
            let result = source
                .fetch(slug)
                .map_err(ExportError::from)
                .and_then(|icon| export_with_settings(&icon, settings));

            if let Err(err) = &result {
                tracing::warn!(slug, error = %err, "icon export failed");
            }

            BatchEntry {
                slug: slug.to_string(),
                result,
            }
        })
        .collect();

    let report = BatchReport {
        color: settings.fill_color(),
        entries,
    };

    tracing::info!(
        total = report.len(),
        succeeded = report.success_count(),
        failed = report.failure_count(),
        format = %settings.format,
        "batch export finished"
    );

    report
}
