//! Error types for the export run.
//!
//! Only a handful of failures are recovered at article granularity (a
//! rendered page that cannot be located or read). Everything else aborts the
//! run, see [`ExportError::is_article_local`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to read config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read source {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rendered page not found for slug: {slug}")]
    PageNotFound { slug: String },

    #[error("failed to read rendered page {path}: {source}")]
    ReadPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExportError {
    /// Whether the failure only affects the article being processed.
    ///
    /// Article-local failures are logged and the article is skipped; all
    /// other failures abort the run.
    pub fn is_article_local(&self) -> bool {
        matches!(
            self,
            ExportError::PageNotFound { .. } | ExportError::ReadPage { .. }
        )
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
