//! Front matter parsing for article sources.
//!
//! Articles open with a metadata block fenced by two `---` marker lines.
//! The block is read line by line rather than through a full YAML grammar:
//! each line is `key: value`, split on the first colon, and each value is
//! classified into one of three token kinds before it is stored:
//!
//! - [`ValueToken::Scalar`]: a bare value, stored verbatim as text
//! - [`ValueToken::Quoted`]: a value wrapped in one layer of matching `"` or `'`
//! - [`ValueToken::List`]: a bracketed, JSON-style array of quoted strings
//!
//! Only the `tags` field is coerced into a list. Every other field, including
//! values that look numeric or boolean, stays a string.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::error;

use crate::utils::truncate_for_log;

/// The fence line opening and closing a front matter block.
pub const MARKER: &str = "---";

/// The only field coerced into a list of strings.
pub const TAGS_FIELD: &str = "tags";

/// A stored front matter value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// A classified raw value from a single `key: value` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueToken<'a> {
    Scalar(&'a str),
    /// The text between one layer of matching quotes.
    Quoted(&'a str),
    List(&'a str),
}

impl<'a> ValueToken<'a> {
    /// Classify a trimmed raw value.
    pub fn classify(value: &'a str) -> Self {
        if let Some(inner) = unquote(value) {
            return ValueToken::Quoted(inner);
        }
        if value.starts_with('[') && value.ends_with(']') {
            return ValueToken::List(value);
        }
        ValueToken::Scalar(value)
    }

    /// The value text with one layer of quotes removed.
    pub fn text(&self) -> &'a str {
        match *self {
            ValueToken::Scalar(s) | ValueToken::List(s) => s,
            ValueToken::Quoted(inner) => inner,
        }
    }
}

/// Strip exactly one layer of matching surrounding quotes.
fn unquote(value: &str) -> Option<&str> {
    let mut chars = value.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if (first == '"' || first == '\'') && first == last {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

/// Parse a JSON-style array of quoted strings, stripping one layer of quotes
/// from each element.
fn parse_tag_list(text: &str) -> Result<Vec<String>, serde_json::Error> {
    let tags: Vec<String> = serde_json::from_str(text)?;
    Ok(tags
        .into_iter()
        .map(|tag| unquote(&tag).map(str::to_string).unwrap_or(tag))
        .collect())
}

/// Ordered front matter mapping. Keys keep the position of their first
/// occurrence; a repeated key overwrites the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: Vec<(String, FieldValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text value of a field; `None` when absent or list-valued.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(FieldValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The tag list, empty when the field is missing or malformed.
    pub fn tags(&self) -> &[String] {
        match self.get(TAGS_FIELD) {
            Some(FieldValue::List(tags)) => tags,
            _ => &[],
        }
    }

    /// `draft: true` (also `yes` or `1`) marks an article as a draft.
    pub fn is_draft(&self) -> bool {
        self.text("draft").is_some_and(|v| {
            let v = v.trim();
            v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") || v == "1"
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize the block contents (without fences) in a form that
    /// [`parse_front_matter`] reads back to the same values.
    ///
    /// Text values are always wrapped in double quotes; since the parser
    /// strips exactly one layer, any single-line value survives unchanged.
    /// The tag list is written as a JSON array.
    pub fn to_block(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            match value {
                FieldValue::Text(text) => {
                    out.push_str(&format!("{key}: \"{text}\"\n"));
                }
                FieldValue::List(items) => {
                    let list = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
                    out.push_str(&format!("{key}: {list}\n"));
                }
            }
        }
        out
    }
}

impl Serialize for FrontMatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Clone, Copy)]
enum State {
    Start,
    InBlock { block_start: usize },
}

/// Locate the fenced block. Returns the block text and the remainder after
/// the closing fence.
fn split_block(raw: &str) -> Option<(&str, &str)> {
    let mut state = State::Start;
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let trimmed = line.trim();
        let next = offset + line.len();
        match state {
            State::Start if trimmed.is_empty() => {}
            State::Start if trimmed == MARKER => state = State::InBlock { block_start: next },
            State::Start => return None,
            State::InBlock { block_start } if trimmed == MARKER => {
                return Some((&raw[block_start..offset], &raw[next..]));
            }
            State::InBlock { .. } => {}
        }
        offset = next;
    }
    None
}

/// Split raw article source into front matter and body.
///
/// Without a complete leading block the metadata is empty and the text is
/// returned unchanged. Otherwise the body is the text after the closing
/// fence, trimmed.
pub fn parse_front_matter(raw: &str) -> (FrontMatter, String) {
    let Some((block, body)) = split_block(raw) else {
        return (FrontMatter::default(), raw.to_string());
    };

    let mut front_matter = FrontMatter::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }

        let token = ValueToken::classify(value);
        if key == TAGS_FIELD {
            let tags = match parse_tag_list(token.text()) {
                Ok(tags) => tags,
                Err(e) => {
                    error!(value = %truncate_for_log(value, 120), error = %e, "Error parsing tags");
                    Vec::new()
                }
            };
            front_matter.insert(key, FieldValue::List(tags));
        } else {
            front_matter.insert(key, FieldValue::Text(token.text().to_string()));
        }
    }

    (front_matter, body.trim().to_string())
}
