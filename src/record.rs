//! Assembly of normalized article records.
//!
//! A record combines the parsed source (front matter, body, slug), the
//! content extracted from the rendered page, and the resolved author.
//! [`Admission`] decides whether an article reaches the outputs at all.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

use crate::authors::AuthorRegistry;
use crate::config::ExportConfig;
use crate::content::rewrite_markdown_images;
use crate::dates::{format_date, parse_calendar_date};
use crate::frontmatter::{FrontMatter, parse_front_matter};
use crate::models::{ArticleRecord, AuthorInfo, PostRef};
use crate::slug::{split_prefix, strip_prefix};

/// Front matter field naming the author id.
pub const AUTHOR_FIELD: &str = "authors";

/// A parsed article source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSource {
    /// File stem as found on disk, ordering prefix included.
    pub raw_name: String,
    pub slug: String,
    pub prefix: Option<u64>,
    pub front_matter: FrontMatter,
    /// Markup with the front matter block removed.
    pub body: String,
}

impl ArticleSource {
    pub fn parse(raw_name: &str, text: &str) -> Self {
        let (prefix, slug) = split_prefix(raw_name);
        let (front_matter, body) = parse_front_matter(text);
        Self {
            raw_name: raw_name.to_string(),
            slug: slug.to_string(),
            prefix,
            front_matter,
            body,
        }
    }

    pub fn author_id(&self) -> Option<&str> {
        self.front_matter.text(AUTHOR_FIELD)
    }
}

/// Why an article was left out of every output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    Draft,
    EmptyContent,
    ExcludedTag(String),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Draft => write!(f, "draft"),
            Exclusion::EmptyContent => write!(f, "empty content"),
            Exclusion::ExcludedTag(tag) => write!(f, "excluded tag {tag}"),
        }
    }
}

/// Exclusion rules, applied before a record is written or indexed.
#[derive(Debug, Clone, Default)]
pub struct Admission {
    pub include_drafts: bool,
    pub exclude_empty_content: bool,
    pub excluded_tags: HashSet<String>,
}

impl Admission {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            include_drafts: config.include_drafts,
            exclude_empty_content: config.exclude_empty_content,
            excluded_tags: config.excluded_tags.iter().cloned().collect(),
        }
    }

    /// Rules decidable from the source alone.
    pub fn check_source(&self, source: &ArticleSource) -> Option<Exclusion> {
        if source.front_matter.is_draft() && !self.include_drafts {
            return Some(Exclusion::Draft);
        }
        source
            .front_matter
            .tags()
            .iter()
            .find(|tag| self.excluded_tags.contains(*tag))
            .map(|tag| Exclusion::ExcludedTag(tag.clone()))
    }

    /// Rules that need the extracted page content.
    pub fn check_content(&self, content: &str) -> Option<Exclusion> {
        if self.exclude_empty_content && content.trim().is_empty() {
            Some(Exclusion::EmptyContent)
        } else {
            None
        }
    }
}

/// Fallback values applied while building records.
#[derive(Debug, Clone, Default)]
pub struct RecordDefaults {
    pub default_image: String,
    pub author_fallback: AuthorInfo,
    /// Prefix for root-relative image references in Markdown bodies.
    pub asset_base: String,
}

impl RecordDefaults {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            default_image: config.default_image.clone(),
            author_fallback: config.author_fallback.clone(),
            asset_base: config.default_image_path.clone(),
        }
    }
}

/// A record together with both content representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullRecord {
    pub record: ArticleRecord,
    /// Rendered HTML body, asset paths already rewritten.
    pub content: String,
    /// Markdown body, image paths rewritten.
    pub content_md: String,
}

impl FullRecord {
    /// JSON for the per-article export: the list entry plus both bodies.
    pub fn to_value(&self, entry: &ListEntry) -> Value {
        let mut fields = entry.fields().clone();
        fields.insert("content".to_string(), Value::String(self.content.clone()));
        fields.insert(
            "content_md".to_string(),
            Value::String(self.content_md.clone()),
        );
        Value::Object(fields)
    }
}

/// A record in list form with custom fields merged last, so a custom field
/// replaces a computed one of the same name.
///
/// List files, index references and the master list sort all read the
/// merged values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ListEntry(Map<String, Value>);

impl ListEntry {
    pub fn merge(
        record: &ArticleRecord,
        custom_fields: &Map<String, Value>,
    ) -> serde_json::Result<Self> {
        let mut fields = match serde_json::to_value(record)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, field) in custom_fields {
            fields.insert(key.clone(), field.clone());
        }
        Ok(Self(fields))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Field as text; non-string values use their JSON form, missing or
    /// `null` is empty.
    fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn slug(&self) -> String {
        self.text("slug")
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.0
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_calendar_date)
    }

    pub fn post_ref(&self) -> PostRef {
        PostRef {
            title: self.text("title"),
            slug: self.slug(),
        }
    }
}

pub struct RecordBuilder<'a> {
    registry: &'a AuthorRegistry,
    defaults: &'a RecordDefaults,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(registry: &'a AuthorRegistry, defaults: &'a RecordDefaults) -> Self {
        Self { registry, defaults }
    }

    /// Registry entry for the declared author, else the fallback.
    pub fn resolve_author(&self, author_id: Option<&str>) -> AuthorInfo {
        author_id
            .and_then(|id| self.registry.lookup(id))
            .cloned()
            .unwrap_or_else(|| self.defaults.author_fallback.clone())
    }

    pub fn build(&self, source: &ArticleSource, content: String) -> FullRecord {
        let fm = &source.front_matter;
        let text = |key: &str| fm.text(key).map(str::to_string);
        let date = format_date(fm.text("date"));

        let record = ArticleRecord {
            slug: source.slug.clone(),
            title: strip_prefix(fm.text("title").unwrap_or_default()).to_string(),
            seo_title: text("seo_title"),
            seo_description: text("seo_description"),
            date: date.iso,
            date_readable: date.readable,
            excerpt: text("excerpt").unwrap_or_default(),
            image: text("image").unwrap_or_else(|| self.defaults.default_image.clone()),
            tags: fm.tags().to_vec(),
            prefix: source.prefix,
            author: self.resolve_author(source.author_id()),
        };

        FullRecord {
            record,
            content,
            content_md: rewrite_markdown_images(&source.body, &self.defaults.asset_base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SOURCE: &str = "---\n\
title: \"01-Getting Started\"\n\
date: 2024-03-07\n\
authors: jdoe\n\
tags: [\"rust\", \"intro\"]\n\
excerpt: First steps\n\
seo_title: Start here\n\
---\n\
\n\
![shot](/img/shot.png)\n";

    fn registry() -> AuthorRegistry {
        AuthorRegistry::from_yaml("jdoe:\n  name: Jane Doe\n  title: Maintainer\n").unwrap()
    }

    fn defaults() -> RecordDefaults {
        RecordDefaults {
            default_image: "/img/default.png".to_string(),
            author_fallback: AuthorInfo {
                name: "Unknown Author".to_string(),
                title: "Contributor".to_string(),
                ..AuthorInfo::default()
            },
            asset_base: "https://cdn.example.com".to_string(),
        }
    }

    #[test]
    fn test_source_parse_strips_prefix() {
        let source = ArticleSource::parse("01-getting-started", SOURCE);
        assert_eq!(source.slug, "getting-started");
        assert_eq!(source.prefix, Some(1));
        assert_eq!(source.author_id(), Some("jdoe"));
        assert_eq!(source.body, "![shot](/img/shot.png)");
    }

    #[test]
    fn test_build_record() {
        let registry = registry();
        let defaults = defaults();
        let source = ArticleSource::parse("01-getting-started", SOURCE);
        let full = RecordBuilder::new(&registry, &defaults).build(&source, "<p>x</p>".to_string());
        let r = &full.record;

        assert_eq!(r.slug, "getting-started");
        assert_eq!(r.title, "Getting Started");
        assert_eq!(r.seo_title.as_deref(), Some("Start here"));
        assert_eq!(r.seo_description, None);
        assert_eq!(r.date, "2024-03-07");
        assert_eq!(r.date_readable, "07 Mar 2024");
        assert_eq!(r.excerpt, "First steps");
        assert_eq!(r.image, "/img/default.png");
        assert_eq!(r.tags, vec!["rust", "intro"]);
        assert_eq!(r.author.name, "Jane Doe");
        assert_eq!(full.content_md, "![shot](https://cdn.example.com/img/shot.png)");
    }

    #[test]
    fn test_unknown_or_missing_author_falls_back() {
        let registry = registry();
        let defaults = defaults();
        let builder = RecordBuilder::new(&registry, &defaults);
        assert_eq!(builder.resolve_author(Some("ghost")).name, "Unknown Author");
        assert_eq!(builder.resolve_author(None).title, "Contributor");
    }

    #[test]
    fn test_custom_fields_override_and_content_added() {
        let registry = registry();
        let defaults = defaults();
        let source = ArticleSource::parse("intro", "---\ntitle: Intro\n---\nbody");
        let full = RecordBuilder::new(&registry, &defaults).build(&source, "<p>b</p>".to_string());

        let mut custom = Map::new();
        custom.insert("site".to_string(), json!("docs"));
        custom.insert("image".to_string(), json!("/override.png"));
        custom.insert("content".to_string(), json!("ignored"));

        let entry = ListEntry::merge(&full.record, &custom).unwrap();
        let list = serde_json::to_value(&entry).unwrap();
        assert_eq!(list["site"], "docs");
        assert_eq!(list["image"], "/override.png");
        assert_eq!(list["content"], "ignored");
        assert!(list.get("content_md").is_none());

        let value = full.to_value(&entry);
        assert_eq!(value["content"], "<p>b</p>");
        assert_eq!(value["content_md"], "body");
        assert_eq!(value["site"], "docs");
    }

    #[test]
    fn test_list_entry_reads_merged_fields() {
        let registry = registry();
        let defaults = defaults();
        let source = ArticleSource::parse("intro", "---\ntitle: Intro\ndate: 2024-01-01\n---\nbody");
        let full = RecordBuilder::new(&registry, &defaults).build(&source, "<p>b</p>".to_string());

        let plain = ListEntry::merge(&full.record, &Map::new()).unwrap();
        assert_eq!(plain.post_ref().title, "Intro");
        assert_eq!(plain.date(), NaiveDate::from_ymd_opt(2024, 1, 1));

        let mut custom = Map::new();
        custom.insert("title".to_string(), json!("Overridden"));
        custom.insert("date".to_string(), json!("2030-06-15"));
        let merged = ListEntry::merge(&full.record, &custom).unwrap();
        assert_eq!(
            merged.post_ref(),
            PostRef {
                title: "Overridden".to_string(),
                slug: "intro".to_string()
            }
        );
        assert_eq!(merged.date(), NaiveDate::from_ymd_opt(2030, 6, 15));

        custom.insert("date".to_string(), json!(null));
        custom.insert("title".to_string(), json!(7));
        let odd = ListEntry::merge(&full.record, &custom).unwrap();
        assert_eq!(odd.date(), None);
        assert_eq!(odd.post_ref().title, "7");
    }

    #[test]
    fn test_admission_rules() {
        let mut admission = Admission {
            include_drafts: false,
            exclude_empty_content: true,
            excluded_tags: ["internal".to_string()].into_iter().collect(),
        };
        let draft = ArticleSource::parse("d", "---\ndraft: true\n---\nx");
        let tagged = ArticleSource::parse("t", "---\ntags: [\"public\", \"internal\"]\n---\nx");
        let plain = ArticleSource::parse("p", "---\ntitle: P\n---\nx");

        assert_eq!(admission.check_source(&draft), Some(Exclusion::Draft));
        assert_eq!(
            admission.check_source(&tagged),
            Some(Exclusion::ExcludedTag("internal".to_string()))
        );
        assert_eq!(admission.check_source(&plain), None);
        assert_eq!(admission.check_content("  \n"), Some(Exclusion::EmptyContent));
        assert_eq!(admission.check_content("<p>x</p>"), None);

        admission.include_drafts = true;
        admission.exclude_empty_content = false;
        assert_eq!(admission.check_source(&draft), None);
        assert_eq!(admission.check_content(""), None);
    }
}
