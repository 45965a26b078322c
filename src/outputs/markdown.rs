//! Markdown output: the source front matter followed by the rewritten
//! body.

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::error::Result;
use crate::frontmatter::{FrontMatter, MARKER};
use crate::utils::write_file;

/// Render `---\n<front matter>---\n\n<body>`.
pub fn render_article_markdown(front_matter: &FrontMatter, body: &str) -> String {
    format!("{MARKER}\n{}{MARKER}\n\n{body}", front_matter.to_block())
}

/// Write `<dir>/<slug>.md`.
#[instrument(level = "info", skip_all, fields(%slug))]
pub async fn write_article_markdown(
    dir: &Path,
    slug: &str,
    front_matter: &FrontMatter,
    body: &str,
) -> Result<PathBuf> {
    let path = dir.join(format!("{slug}.md"));
    write_file(&path, render_article_markdown(front_matter, body)).await?;
    info!(path = %path.display(), "Created Markdown file");
    Ok(path)
}
