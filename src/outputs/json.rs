//! JSON output for per-article records and list files.
//!
//! The per-article file holds the list entry plus the rendered HTML
//! (`content`) and Markdown (`content_md`) bodies. List files hold the
//! entries without either body, in master list order.

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::aggregate::paginate;
use crate::config::ExportConfig;
use crate::error::Result;
use crate::record::{FullRecord, ListEntry};
use crate::utils::write_file;

/// Write `<dir>/<slug>.json`.
#[instrument(level = "info", skip_all, fields(slug = %full.record.slug))]
pub async fn write_article_json(
    dir: &Path,
    full: &FullRecord,
    entry: &ListEntry,
    config: &ExportConfig,
) -> Result<PathBuf> {
    let value = full.to_value(entry);
    let path = dir.join(format!("{}.json", full.record.slug));
    write_file(&path, config.to_json(&value)?).await?;
    info!(path = %path.display(), "Created JSON file");
    Ok(path)
}

async fn write_list(path: PathBuf, entries: &[ListEntry], config: &ExportConfig) -> Result<PathBuf> {
    write_file(&path, config.to_json(entries)?).await?;
    info!(path = %path.display(), count = entries.len(), "Created list file");
    Ok(path)
}

/// Write `list-<n>.json` pages (when pagination is enabled) and the full
/// `list.json`. Returns the written paths, pages first.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), count = entries.len()))]
pub async fn write_lists(
    dir: &Path,
    entries: &[ListEntry],
    config: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if config.enable_pagination {
        for (number, page) in paginate(entries, config.pagination_size) {
            let path = dir.join(format!("list-{number}.json"));
            written.push(write_list(path, page, config).await?);
        }
    }
    written.push(write_list(dir.join("list.json"), entries, config).await?);
    Ok(written)
}
