//! Data models for exported articles and their aggregate indexes.
//!
//! This module defines the structures written to the export tree:
//! - [`ArticleRecord`]: the normalized per-article record
//! - [`AuthorInfo`]: author details resolved from the registry
//! - [`PostRef`]: a minimal `(title, slug)` reference used by the indexes
//! - [`TagEntry`] and [`AuthorEntry`]: aggregate index entries
//!
//! Field names are snake_case in JSON, matching the records consumed by the
//! site front end.

use serde::{Deserialize, Serialize};

/// Author details as exposed in exported records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
}

/// The normalized record for one admitted article.
///
/// This is the list form written to `list.json` and the page files. The
/// per-article JSON adds the rendered and Markdown bodies, see
/// [`crate::record::FullRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    /// Canonical slug, ordering prefix removed.
    pub slug: String,
    /// Display title, ordering prefix removed.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    /// `YYYY-MM-DD`, or empty when the article has no usable date.
    pub date: String,
    /// `DD Mon YYYY`, or empty.
    pub date_readable: String,
    pub excerpt: String,
    pub image: String,
    pub tags: Vec<String>,
    /// Numeric ordering prefix from the file name, `null` when absent.
    pub prefix: Option<u64>,
    pub author: AuthorInfo,
}

/// A `(title, slug)` reference to an admitted article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostRef {
    pub title: String,
    pub slug: String,
}

/// One entry of `tags.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub id: String,
    pub count: usize,
    pub posts: Vec<PostRef>,
}

/// One entry of `authors.json`.
///
/// The author details come from the first article seen with this author id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorEntry {
    #[serde(flatten)]
    pub info: AuthorInfo,
    pub id: String,
    pub count: usize,
    pub posts: Vec<PostRef>,
}
