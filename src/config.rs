//! Export configuration.
//!
//! Options use the camelCase names of the site's plugin configuration and
//! are read from a YAML (or JSON) file. Every option is optional; see
//! [`ExportConfig::default`] for the values used when one is omitted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::aggregate::{SortKey, SortOrder};
use crate::error::{ExportError, Result};
use crate::models::AuthorInfo;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Source subdirectories of the site, each exported independently.
    pub export_paths: Vec<String>,
    pub pagination_size: usize,
    pub include_drafts: bool,
    /// Output directory name under the build output root.
    pub output_dir: String,
    pub minify_output: bool,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub include_tags_list: bool,
    pub include_authors_list: bool,
    /// Image used by records whose front matter has none.
    pub default_image: String,
    /// Articles carrying any of these tags are excluded entirely.
    pub excluded_tags: Vec<String>,
    /// Extra fields merged into every record, overriding computed ones.
    pub custom_fields: Map<String, Value>,
    pub enable_pagination: bool,
    /// Prefix for root-relative asset references in exported content.
    pub default_image_path: String,
    pub exclude_empty_content: bool,
    pub author_fallback: AuthorInfo,
    /// Authors registry, relative to the site directory.
    pub authors_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            export_paths: vec!["blog".to_string()],
            pagination_size: 10,
            include_drafts: false,
            output_dir: "json-output".to_string(),
            minify_output: false,
            sort_by: SortKey::Date,
            sort_order: SortOrder::Desc,
            include_tags_list: true,
            include_authors_list: true,
            default_image: String::new(),
            excluded_tags: Vec::new(),
            custom_fields: Map::new(),
            enable_pagination: true,
            default_image_path: String::new(),
            exclude_empty_content: true,
            author_fallback: AuthorInfo {
                name: "Unknown Author".to_string(),
                title: "Contributor".to_string(),
                ..AuthorInfo::default()
            },
            authors_file: PathBuf::from("blog/authors.yml"),
        }
    }
}

impl ExportConfig {
    /// Parse and validate a configuration document.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load configuration from `path`, or defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let yaml = fs::read_to_string(path)
                    .await
                    .map_err(|e| ExportError::Config {
                        path: path.to_path_buf(),
                        source: Box::new(e),
                    })?;
                let config = Self::from_yaml(&yaml).map_err(|e| ExportError::Config {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                })?;
                info!(path = %path.display(), "Loaded configuration");
                config
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pagination_size == 0 {
            return Err(ExportError::InvalidConfig(
                "paginationSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `serde_json` output honoring `minifyOutput`.
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.minify_output {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.export_paths, vec!["blog"]);
        assert_eq!(config.pagination_size, 10);
        assert!(!config.include_drafts);
        assert!(config.exclude_empty_content);
        assert_eq!(config.author_fallback.name, "Unknown Author");
        assert_eq!(config.author_fallback.title, "Contributor");
    }

    #[test]
    fn test_camel_case_yaml() {
        let yaml = "\
exportPaths: [blog, docs]
paginationSize: 5
includeDrafts: true
minifyOutput: true
sortBy: date
sortOrder: asc
excludedTags: [internal]
customFields:
  site: example
  version: 2
authorFallback:
  name: Staff
";
        let config = ExportConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.export_paths, vec!["blog", "docs"]);
        assert_eq!(config.pagination_size, 5);
        assert!(config.include_drafts);
        assert_eq!(config.sort_order, SortOrder::Asc);
        assert_eq!(config.excluded_tags, vec!["internal"]);
        assert_eq!(config.custom_fields["site"], "example");
        assert_eq!(config.custom_fields["version"], 2);
        assert_eq!(config.author_fallback.name, "Staff");
        assert_eq!(config.author_fallback.title, "");
        assert_eq!(config.output_dir, "json-output");
    }

    #[test]
    fn test_json_document_is_accepted() {
        let config =
            ExportConfig::from_yaml(r#"{"outputDir": "export", "sortBy": "title"}"#).unwrap();
        assert_eq!(config.output_dir, "export");
        assert_eq!(config.sort_by, SortKey::Other("title".to_string()));
    }

    #[test]
    fn test_to_json_minify() {
        let mut config = ExportConfig::default();
        let value = serde_json::json!({"a": [1]});
        assert!(config.to_json(&value).unwrap().contains('\n'));
        config.minify_output = true;
        assert_eq!(config.to_json(&value).unwrap(), r#"{"a":[1]}"#);
    }

    #[tokio::test]
    async fn test_load_rejects_zero_page_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.yml");
        std::fs::write(&path, "paginationSize: 0\n").unwrap();
        let err = ExportConfig::load(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ExportError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_load_without_path_is_default() {
        let config = ExportConfig::load(None).await.unwrap();
        assert_eq!(config, ExportConfig::default());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = ExportConfig::load(Some(&dir.path().join("nope.yml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Config { .. }));
    }
}
