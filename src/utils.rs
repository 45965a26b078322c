//! Utility functions for logging and file system operations.
//!
//! This module provides helper functions used throughout the export run:
//! - String truncation for log output
//! - Directory creation and file writes that map I/O failures to [`ExportError`]
//! - Output directory validation before the run starts

use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::error::{ExportError, Result};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```
/// use post_export::utils::truncate_for_log;
///
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Create a directory and all of its parents.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| ExportError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `contents` to `path`, creating intermediate directories first.
///
/// Any failure is fatal to the run and is returned as-is; nothing already
/// written is cleaned up.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    fs::write(path, contents)
        .await
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Wrote file");
    Ok(())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a marker file
/// inside it.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    ensure_dir(path).await?;
    let marker = path.join(".post_export_write_check");
    fs::File::create(&marker)
        .await
        .map_err(|source| ExportError::Write {
            path: marker.clone(),
            source,
        })?;
    if let Err(e) = fs::remove_file(&marker).await {
        debug!(error = %e, "Could not remove write check marker");
    }
    info!("Output directory is writable");
    Ok(())
}
