//! Content extraction from rendered pages and asset path rewriting.
//!
//! The rendered page wraps the article body in a single container,
//! `<div id="__blog-post-container" class="markdown">`. Everything outside it
//! (navigation, footer, scripts) is discarded.
//!
//! Root-relative asset references (`src="/img/a.png"` in HTML,
//! `![alt](/img/a.png)` in Markdown) can be re-based onto an absolute asset
//! prefix so exported content renders outside the site. Rewriting is
//! idempotent: scheme-qualified and protocol-relative URLs never match, and
//! a reference already under a root-relative prefix is left alone.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{Html, Selector};

/// Selector for the article container in a rendered page.
pub const CONTAINER_SELECTOR: &str = "div#__blog-post-container.markdown";

static CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse(CONTAINER_SELECTOR).unwrap());
static HTML_SRC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"src="(/[^"]+)""#).unwrap());
static MD_IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\((/[^)]+)\)").unwrap());

/// Return the trimmed inner HTML of the article container, or an empty
/// string when the page has none.
pub fn extract_article_html(page: &str) -> String {
    let document = Html::parse_document(page);
    document
        .select(&CONTAINER)
        .next()
        .map(|node| node.inner_html().trim().to_string())
        .unwrap_or_default()
}

/// Extract the article container and re-base its root-relative `src`
/// references onto `asset_base`.
pub fn extract_content(page: &str, asset_base: &str) -> String {
    rewrite_html_assets(&extract_article_html(page), asset_base)
}

fn normalize_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

fn should_rewrite(path: &str, base: &str) -> bool {
    if path.starts_with("//") {
        return false;
    }
    if base.starts_with('/') && (path == base || path.starts_with(&format!("{base}/"))) {
        return false;
    }
    true
}

/// Prefix root-relative `src="/..."` references with `base`.
///
/// An empty base leaves the content untouched.
pub fn rewrite_html_assets(html: &str, base: &str) -> String {
    let base = normalize_base(base);
    if base.is_empty() {
        return html.to_string();
    }
    HTML_SRC_RE
        .replace_all(html, |caps: &Captures| {
            let path = &caps[1];
            if should_rewrite(path, base) {
                format!("src=\"{base}{path}\"")
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Prefix root-relative Markdown image targets with `base`.
///
/// An empty base leaves the content untouched.
pub fn rewrite_markdown_images(markdown: &str, base: &str) -> String {
    let base = normalize_base(base);
    if base.is_empty() {
        return markdown.to_string();
    }
    MD_IMAGE_RE
        .replace_all(markdown, |caps: &Captures| {
            let path = &caps[2];
            if should_rewrite(path, base) {
                format!("![{}]({base}{path})", &caps[1])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
