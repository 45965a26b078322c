//! Tag and author index files.
//!
//! Both indexes are arrays of aggregate entries in order of first
//! occurrence:
//!
//! ```text
//! tags.json:    [{ "id": "rust", "count": 2, "posts": [{ "title", "slug" }, ...] }]
//! authors.json: [{ "name", "title", "url", "image_url", "id", "count", "posts": [...] }]
//! ```

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::config::ExportConfig;
use crate::error::Result;
use crate::models::{AuthorEntry, TagEntry};
use crate::utils::write_file;

/// Write `<dir>/tags.json`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), count = tags.len()))]
pub async fn write_tags(dir: &Path, tags: &[TagEntry], config: &ExportConfig) -> Result<PathBuf> {
    let path = dir.join("tags.json");
    write_file(&path, config.to_json(tags)?).await?;
    info!(path = %path.display(), "Created tags index");
    Ok(path)
}

/// Write `<dir>/authors.json`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), count = authors.len()))]
pub async fn write_authors(
    dir: &Path,
    authors: &[AuthorEntry],
    config: &ExportConfig,
) -> Result<PathBuf> {
    let path = dir.join("authors.json");
    write_file(&path, config.to_json(authors)?).await?;
    info!(path = %path.display(), "Created authors index");
    Ok(path)
}
