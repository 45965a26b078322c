//! The export run.
//!
//! For each configured export path:
//! 1. **Scan**: list `.md`/`.mdx` sources, sorted by file name
//! 2. **Parse**: split front matter from body, derive slug and prefix
//! 3. **Resolve**: locate and read the rendered page, extract its content
//! 4. **Admit**: apply exclusion rules, build the record, write its files
//! 5. **Index**: sort, paginate and write the list, tag and author files
//!
//! A missing rendered page skips that article only. Any failure to read the
//! sources or to write output aborts the run. Bytes that are not valid UTF-8
//! are replaced rather than treated as read failures.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::aggregate::IndexAggregator;
use crate::authors::AuthorRegistry;
use crate::config::ExportConfig;
use crate::content::extract_content;
use crate::error::{ExportError, Result};
use crate::outputs::{indexes, json, markdown};
use crate::record::{Admission, ArticleSource, ListEntry, RecordBuilder, RecordDefaults};
use crate::slug::PageLocator;
use crate::utils::ensure_writable_dir;

const SOURCE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Per export path counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPathSummary {
    pub export_path: String,
    /// Source files found.
    pub found: usize,
    /// Records written and indexed.
    pub admitted: usize,
    /// Articles left out by a draft, empty content or excluded tag rule.
    pub excluded: usize,
    /// Articles whose rendered page could not be located or read.
    pub skipped: usize,
    pub files_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub output_root: PathBuf,
    pub paths: Vec<ExportPathSummary>,
}

impl RunSummary {
    pub fn admitted(&self) -> usize {
        self.paths.iter().map(|p| p.admitted).sum()
    }

    pub fn skipped(&self) -> usize {
        self.paths.iter().map(|p| p.skipped).sum()
    }

    pub fn excluded(&self) -> usize {
        self.paths.iter().map(|p| p.excluded).sum()
    }
}

/// List article sources in `dir`, sorted by file name.
pub async fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| ExportError::ReadSource {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir).await.map_err(read_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        let is_source = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if is_source && entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode file bytes, replacing invalid UTF-8 sequences.
fn decode_lossy(path: &Path, bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        warn!(file = %path.display(), error = %e, "File is not valid UTF-8; invalid bytes replaced");
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}

async fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .await
        .map_err(|source| ExportError::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decode_lossy(path, bytes))
}

async fn load_page(locator: &PageLocator, page_dir: &Path, raw_name: &str) -> Result<String> {
    let path = locator.locate(page_dir, raw_name).await?;
    match fs::read(&path).await {
        Ok(bytes) => Ok(decode_lossy(&path, bytes)),
        Err(source) => Err(ExportError::ReadPage { path, source }),
    }
}

/// Shared state for one run.
struct Exporter<'a> {
    config: &'a ExportConfig,
    site_dir: &'a Path,
    build_dir: &'a Path,
    output_root: PathBuf,
    locator: PageLocator,
    admission: Admission,
    builder: RecordBuilder<'a>,
}

impl Exporter<'_> {
    #[instrument(level = "info", skip(self))]
    async fn export_path(&self, export_path: &str) -> Result<ExportPathSummary> {
        let source_dir = self.site_dir.join(export_path);
        let page_dir = self.build_dir.join(export_path);
        let out_dir = self.output_root.join(export_path);

        let sources = list_sources(&source_dir).await?;
        info!(count = sources.len(), %export_path, "Found source files");

        let mut summary = ExportPathSummary {
            export_path: export_path.to_string(),
            found: sources.len(),
            ..ExportPathSummary::default()
        };
        let mut aggregator = IndexAggregator::new();
        let mut slugs = HashSet::new();

        for path in &sources {
            let raw_name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = read_source(path).await?;
            let source = ArticleSource::parse(&raw_name, &text);

            if let Some(reason) = self.admission.check_source(&source) {
                info!(slug = %source.slug, %reason, "Excluding article");
                summary.excluded += 1;
                continue;
            }

            let page = match load_page(&self.locator, &page_dir, &raw_name).await {
                Ok(page) => page,
                Err(e) if e.is_article_local() => {
                    error!(slug = %source.slug, error = %e, "Error reading rendered page; skipping article");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            let content = extract_content(&page, &self.config.default_image_path);

            if let Some(reason) = self.admission.check_content(&content) {
                info!(slug = %source.slug, %reason, "Excluding article");
                summary.excluded += 1;
                continue;
            }

            let full = self.builder.build(&source, content);
            let entry = ListEntry::merge(&full.record, &self.config.custom_fields)?;
            if !slugs.insert(full.record.slug.clone()) {
                warn!(slug = %full.record.slug, file = %path.display(), "Duplicate slug; later file overwrites earlier output");
            }

            json::write_article_json(&out_dir, &full, &entry, self.config).await?;
            markdown::write_article_markdown(
                &out_dir,
                &full.record.slug,
                &source.front_matter,
                &full.content_md,
            )
            .await?;
            summary.files_written += 2;

            aggregator.admit(entry, &full.record, source.author_id());
        }
        summary.admitted = aggregator.len();
        if aggregator.is_empty() {
            warn!(%export_path, "No articles admitted");
        }

        aggregator.sort(&self.config.sort_by, self.config.sort_order);
        summary.files_written += json::write_lists(&out_dir, aggregator.records(), self.config)
            .await?
            .len();

        if self.config.include_tags_list {
            indexes::write_tags(&out_dir, aggregator.tags(), self.config).await?;
            summary.files_written += 1;
        }
        if self.config.include_authors_list {
            indexes::write_authors(&out_dir, aggregator.authors(), self.config).await?;
            summary.files_written += 1;
        }

        info!(
            %export_path,
            found = summary.found,
            admitted = summary.admitted,
            excluded = summary.excluded,
            skipped = summary.skipped,
            "Finished export path"
        );
        Ok(summary)
    }
}

/// Export every configured path from `site_dir`, reading rendered pages from
/// and writing into `build_dir`.
#[instrument(level = "info", skip_all, fields(site_dir = %site_dir.display(), build_dir = %build_dir.display()))]
pub async fn run(config: &ExportConfig, site_dir: &Path, build_dir: &Path) -> Result<RunSummary> {
    let started = Instant::now();
    info!("Export started");
    config.validate()?;

    let output_root = build_dir.join(&config.output_dir);
    ensure_writable_dir(&output_root).await?;

    let registry = AuthorRegistry::load(&site_dir.join(&config.authors_file)).await;
    let defaults = RecordDefaults::from_config(config);
    let exporter = Exporter {
        config,
        site_dir,
        build_dir,
        output_root: output_root.clone(),
        locator: PageLocator::default(),
        admission: Admission::from_config(config),
        builder: RecordBuilder::new(&registry, &defaults),
    };

    let mut summary = RunSummary {
        output_root,
        paths: Vec::with_capacity(config.export_paths.len()),
    };
    for export_path in &config.export_paths {
        summary.paths.push(exporter.export_path(export_path).await?);
    }

    info!(
        admitted = summary.admitted(),
        excluded = summary.excluded(),
        skipped = summary.skipped(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Export finished"
    );
    Ok(summary)
}
