//! # Post Export
//!
//! A post-build step for static blogs: it scans article sources (Markdown
//! with front matter), pairs each one with its already rendered page, and
//! writes a normalized JSON and Markdown export together with paginated
//! lists, a tag index and an author index.
//!
//! ## Architecture
//!
//! The run follows a pipeline:
//! 1. **Parsing**: [`frontmatter`] splits metadata from body, [`slug`] derives
//!    the canonical slug and finds the rendered page
//! 2. **Extraction**: [`content`] isolates the article body from the page and
//!    re-bases asset paths; [`dates`] renders dates
//! 3. **Records**: [`record`] applies the exclusion rules and assembles each
//!    [`models::ArticleRecord`]
//! 4. **Indexing**: [`aggregate`] builds the tag and author indexes and the
//!    sorted, paginated master list
//! 5. **Output**: [`outputs`] writes everything under
//!    `<build>/<outputDir>/<exportPath>/`
//!
//! [`pipeline::run`] drives a whole run from an [`config::ExportConfig`].

pub mod aggregate;
pub mod authors;
pub mod config;
pub mod content;
pub mod dates;
pub mod error;
pub mod frontmatter;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod record;
pub mod slug;
pub mod utils;

pub use config::ExportConfig;
pub use error::ExportError;
pub use pipeline::{RunSummary, run};
