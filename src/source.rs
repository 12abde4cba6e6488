//! Where icon markup comes from.
//!
//! The transport is up to the caller: implement [`IconSource`] over
//! whatever fetch primitive the host provides. [`CachedSource`] adds the
//! per-session memoization the UI relies on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::FetchError;
use crate::icon::VectorIcon;

/// Base URL of the default icon CDN.
pub const CDN_BASE_URL: &str = "https://cdn.simpleicons.org";

/// The CDN URL serving the markup for `slug`.
pub fn cdn_url(slug: &str) -> String {
    format!("{CDN_BASE_URL}/{slug}")
}

/// A provider of icon markup keyed by slug.
///
/// Sources are shared across batch workers, hence `Send + Sync`.
pub trait IconSource: Send + Sync {
    /// Fetches the icon for `slug`.
    fn fetch(&self, slug: &str) -> Result<VectorIcon, FetchError>;
}

impl<S: IconSource + ?Sized> IconSource for &S {
    fn fetch(&self, slug: &str) -> Result<VectorIcon, FetchError> {
        (**self).fetch(slug)
    }
}

impl<S: IconSource + ?Sized> IconSource for Arc<S> {
    fn fetch(&self, slug: &str) -> Result<VectorIcon, FetchError> {
        (**self).fetch(slug)
    }
}

/// An in-memory catalog of icons.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    icons: HashMap<String, VectorIcon>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an icon.
    pub fn insert(&mut self, slug: impl Into<String>, markup: impl Into<Arc<str>>) {
        let slug = slug.into();
        let icon = VectorIcon::new(slug.as_str(), markup);
        self.icons.insert(slug, icon);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_icon(mut self, slug: impl Into<String>, markup: impl Into<Arc<str>>) -> Self {
        self.insert(slug, markup);
        self
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconSource for StaticSource {
    fn fetch(&self, slug: &str) -> Result<VectorIcon, FetchError> {
        self.icons
            .get(slug)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                slug: slug.to_string(),
            })
    }
}

/// Memoizes successful fetches of an inner source for the session.
///
/// Unbounded, no eviction. Failures are not cached, so a later call
/// retries the inner source.
#[derive(Debug, Default)]
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<HashMap<String, VectorIcon>>,
}

impl<S: IconSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached icon for `slug` without fetching.
    pub fn cached(&self, slug: &str) -> Option<VectorIcon> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(slug)
            .cloned()
    }

    /// Number of cached icons.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every cached icon.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: IconSource> IconSource for CachedSource<S> {
    fn fetch(&self, slug: &str) -> Result<VectorIcon, FetchError> {
        if let Some(icon) = self.cached(slug) {
            tracing::trace!(slug, "icon cache hit");
            return Ok(icon);
        }

        // The lock is not held across the fetch; concurrent misses for the
        // same slug may both fetch, and the first insert wins.
        let icon = self.inner.fetch(slug)?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(slug.to_string()).or_insert(icon).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches and fails for slugs starting with `bad`.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl IconSource for CountingSource {
        fn fetch(&self, slug: &str) -> Result<VectorIcon, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if slug.starts_with("bad") {
                Err(FetchError::Unavailable {
                    slug: slug.to_string(),
                    reason: "offline".into(),
                })
            } else {
                Ok(VectorIcon::new(slug, format!("<svg id=\"{slug}\"/>")))
            }
        }
    }

    #[test]
    fn static_source_lookup() {
        let source = StaticSource::new().with_icon("github", "<svg/>");
        assert_eq!(source.len(), 1);
        assert_eq!(source.fetch("github").unwrap().slug(), "github");
        assert_eq!(
            source.fetch("gitlab"),
            Err(FetchError::NotFound {
                slug: "gitlab".into()
            })
        );
    }

    #[test]
    fn cache_memoizes_successes() {
        let cached = CachedSource::new(CountingSource::default());

        let first = cached.fetch("github").unwrap();
        let second = cached.fetch("github").unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.cached_len(), 1);
    }

    #[test]
    fn cache_does_not_remember_failures() {
        let cached = CachedSource::new(CountingSource::default());

        assert!(cached.fetch("bad-icon").is_err());
        assert!(cached.fetch("bad-icon").is_err());

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
        assert!(cached.cached("bad-icon").is_none());
    }

    #[test]
    fn clear_forces_refetch() {
        let cached = CachedSource::new(CountingSource::default());
        cached.fetch("x").unwrap();
        cached.clear();
        cached.fetch("x").unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cdn_url_format() {
        assert_eq!(cdn_url("github"), "https://cdn.simpleicons.org/github");
    }
}
