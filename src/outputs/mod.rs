//! Output generation for the export tree.
//!
//! This module contains submodules responsible for writing admitted articles
//! and their aggregate indexes:
//!
//! # Submodules
//!
//! - [`json`]: Per-article JSON records and the sorted list files
//! - [`markdown`]: Per-article Markdown documents with a front matter block
//! - [`indexes`]: Tag and author index files
//!
//! # Output Structure
//!
//! ```text
//! <build>/<outputDir>/<exportPath>/
//! ├── intro.json      # full record, content included
//! ├── intro.md        # front matter + rewritten Markdown body
//! ├── list.json       # every admitted record, sorted
//! ├── list-1.json     # page 1 (when pagination is enabled)
//! ├── list-2.json
//! ├── tags.json
//! └── authors.json
//! ```
//!
//! Every write creates missing parent directories. A failed write is fatal
//! to the run.

pub mod indexes;
pub mod json;
pub mod markdown;
