//! Incremental tag and author indexes, plus sorting and pagination of the
//! admitted records.
//!
//! Records are admitted one at a time in file enumeration order. Tag and
//! author entries are created on first occurrence and keep that order in the
//! written indexes. Index references and the date sort read the merged
//! [`ListEntry`], so custom field overrides show up everywhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{ArticleRecord, AuthorEntry, TagEntry};
use crate::record::ListEntry;

/// Author bucket for articles that declare no author.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Master list sort key. Keys other than `date` leave enumeration order
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    Date,
    Other(String),
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        match value.as_str() {
            "date" => SortKey::Date,
            _ => SortKey::Other(value),
        }
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => "date".to_string(),
            SortKey::Other(other) => other,
        }
    }
}

/// `desc` sorts newest first; any other value sorts oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => "asc".to_string(),
            SortOrder::Desc => "desc".to_string(),
        }
    }
}

/// Dated records first in the requested direction; undated records last.
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Desc => b.cmp(&a),
            SortOrder::Asc => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Split `items` into pages of `size`, numbered from 1. The last page holds
/// the remainder.
pub fn paginate<T>(items: &[T], size: usize) -> impl Iterator<Item = (usize, &[T])> {
    items
        .chunks(size.max(1))
        .enumerate()
        .map(|(i, page)| (i + 1, page))
}

#[derive(Debug, Default)]
pub struct IndexAggregator {
    records: Vec<ListEntry>,
    tags: Vec<TagEntry>,
    tag_slots: HashMap<String, usize>,
    authors: Vec<AuthorEntry>,
    author_slots: HashMap<String, usize>,
}

impl IndexAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an admitted record to the master list and both indexes.
    ///
    /// Tags and author details come from `record`; the `(title, slug)`
    /// reference comes from `entry`. A tag repeated within one article counts
    /// once.
    pub fn admit(&mut self, entry: ListEntry, record: &ArticleRecord, author_id: Option<&str>) {
        let post = entry.post_ref();

        let mut seen: Vec<&str> = Vec::with_capacity(record.tags.len());
        for tag in &record.tags {
            if seen.contains(&tag.as_str()) {
                continue;
            }
            seen.push(tag);
            let slot = *self.tag_slots.entry(tag.clone()).or_insert_with(|| {
                self.tags.push(TagEntry {
                    id: tag.clone(),
                    count: 0,
                    posts: Vec::new(),
                });
                self.tags.len() - 1
            });
            let entry = &mut self.tags[slot];
            entry.count += 1;
            entry.posts.push(post.clone());
        }

        let author_id = author_id.unwrap_or(UNKNOWN_AUTHOR);
        let slot = *self
            .author_slots
            .entry(author_id.to_string())
            .or_insert_with(|| {
                self.authors.push(AuthorEntry {
                    info: record.author.clone(),
                    id: author_id.to_string(),
                    count: 0,
                    posts: Vec::new(),
                });
                self.authors.len() - 1
            });
        let author = &mut self.authors[slot];
        author.count += 1;
        author.posts.push(post);

        self.records.push(entry);
    }

    /// Stable sort of the master list; ties keep enumeration order.
    pub fn sort(&mut self, key: &SortKey, order: SortOrder) {
        match key {
            SortKey::Date => self
                .records
                .sort_by(|a, b| compare_dates(a.date(), b.date(), order)),
            SortKey::Other(_) => {}
        }
    }

    pub fn records(&self) -> &[ListEntry] {
        &self.records
    }

    pub fn tags(&self) -> &[TagEntry] {
        &self.tags
    }

    pub fn authors(&self) -> &[AuthorEntry] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
