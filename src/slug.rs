//! Slug derivation and rendered page lookup.
//!
//! Source files may carry a numeric ordering prefix (`01-intro.md`,
//! `2_setup.mdx`). The prefix is kept as a sort hint but is not part of the
//! canonical slug. The rendered page for a source file may live under the
//! prefixed or the stripped name, as a directory index or a flat file; the
//! [`PageLocator`] tries an ordered list of [`PathTemplate`]s until one
//! exists.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

use crate::error::{ExportError, Result};

static PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[-_]").unwrap());

/// Split a raw file stem into its ordering prefix and canonical slug.
///
/// A prefix whose digits overflow `u64` is still stripped but reported as
/// absent.
pub fn split_prefix(raw: &str) -> (Option<u64>, &str) {
    match PREFIX_RE.captures(raw) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let prefix = caps.get(1).and_then(|m| m.as_str().parse().ok());
            (prefix, &raw[whole..])
        }
        None => (None, raw),
    }
}

/// Remove an ordering prefix, if any.
pub fn strip_prefix(raw: &str) -> &str {
    split_prefix(raw).1
}

/// One candidate layout for a rendered page.
pub type PathTemplate = fn(base: &Path, raw_name: &str) -> PathBuf;

fn raw_dir_index(base: &Path, raw_name: &str) -> PathBuf {
    base.join(raw_name).join("index.html")
}

fn stripped_dir_index(base: &Path, raw_name: &str) -> PathBuf {
    base.join(strip_prefix(raw_name)).join("index.html")
}

fn raw_flat_file(base: &Path, raw_name: &str) -> PathBuf {
    base.join(format!("{raw_name}.html"))
}

fn stripped_flat_file(base: &Path, raw_name: &str) -> PathBuf {
    base.join(format!("{}.html", strip_prefix(raw_name)))
}

/// Ordered rendered-page lookup.
#[derive(Debug, Clone)]
pub struct PageLocator {
    templates: Vec<PathTemplate>,
}

impl Default for PageLocator {
    /// The four layouts produced by the site build, most specific first.
    fn default() -> Self {
        Self {
            templates: vec![
                raw_dir_index,
                stripped_dir_index,
                raw_flat_file,
                stripped_flat_file,
            ],
        }
    }
}

impl PageLocator {
    /// Append a layout, tried after all existing ones.
    pub fn with_template(mut self, template: PathTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// All candidate paths for `raw_name`, in lookup order.
    pub fn candidates(&self, base: &Path, raw_name: &str) -> Vec<PathBuf> {
        self.templates.iter().map(|t| t(base, raw_name)).collect()
    }

    /// Return the first candidate that exists on disk.
    #[instrument(level = "debug", skip(self, base))]
    pub async fn locate(&self, base: &Path, raw_name: &str) -> Result<PathBuf> {
        for candidate in self.candidates(base, raw_name) {
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                debug!(path = %candidate.display(), "Found rendered page");
                return Ok(candidate);
            }
        }
        Err(ExportError::PageNotFound {
            slug: raw_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_prefix_with_dash_and_underscore() {
        assert_eq!(split_prefix("01-intro"), (Some(1), "intro"));
        assert_eq!(split_prefix("42_deep-dive"), (Some(42), "deep-dive"));
    }

    #[test]
    fn test_split_prefix_absent() {
        assert_eq!(split_prefix("intro"), (None, "intro"));
        assert_eq!(split_prefix("2024"), (None, "2024"));
        assert_eq!(split_prefix("v2-notes"), (None, "v2-notes"));
        assert_eq!(split_prefix("-1-x"), (None, "-1-x"));
    }

    #[test]
    fn test_split_prefix_strips_only_once() {
        assert_eq!(split_prefix("01-02-nested"), (Some(1), "02-nested"));
    }

    #[test]
    fn test_split_prefix_overflow() {
        let raw = "99999999999999999999999-big";
        assert_eq!(split_prefix(raw), (None, "big"));
    }

    #[test]
    fn test_candidate_order() {
        let base = Path::new("/build/blog");
        let got = PageLocator::default().candidates(base, "01-intro");
        assert_eq!(
            got,
            vec![
                PathBuf::from("/build/blog/01-intro/index.html"),
                PathBuf::from("/build/blog/intro/index.html"),
                PathBuf::from("/build/blog/01-intro.html"),
                PathBuf::from("/build/blog/intro.html"),
            ]
        );
    }

    #[tokio::test]
    async fn test_locate_prefers_earlier_candidates() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("intro")).unwrap();
        std::fs::write(dir.path().join("intro/index.html"), "a").unwrap();
        std::fs::write(dir.path().join("01-intro.html"), "b").unwrap();

        let found = PageLocator::default()
            .locate(dir.path(), "01-intro")
            .await
            .unwrap();
        assert_eq!(found, dir.path().join("intro/index.html"));
    }

    #[tokio::test]
    async fn test_locate_flat_stripped_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("intro.html"), "x").unwrap();
        let found = PageLocator::default()
            .locate(dir.path(), "01-intro")
            .await
            .unwrap();
        assert_eq!(found, dir.path().join("intro.html"));
    }

    #[tokio::test]
    async fn test_locate_not_found() {
        let dir = TempDir::new().unwrap();
        let err = PageLocator::default()
            .locate(dir.path(), "03-missing")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::PageNotFound { ref slug } if slug == "03-missing"));
    }

    #[tokio::test]
    async fn test_custom_template_is_tried_last() {
        fn amp_layout(base: &Path, raw: &str) -> PathBuf {
            base.join("amp").join(format!("{}.html", strip_prefix(raw)))
        }
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("amp")).unwrap();
        std::fs::write(dir.path().join("amp/intro.html"), "x").unwrap();

        let locator = PageLocator::default().with_template(amp_layout);
        let found = locator.locate(dir.path(), "01-intro").await.unwrap();
        assert_eq!(found, dir.path().join("amp/intro.html"));
    }
}
