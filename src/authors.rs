//! The site-wide authors registry.
//!
//! The registry is a YAML mapping of author id to details:
//!
//! ```yaml
//! jdoe:
//!   name: Jane Doe
//!   title: Maintainer
//!   url: https://github.com/jdoe
//!   image_url: https://github.com/jdoe.png
//! ```
//!
//! A missing or malformed registry is not fatal: it is logged and treated as
//! empty, so every article falls back to the configured author.

use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::models::AuthorInfo;

#[derive(Debug, Clone, Default)]
pub struct AuthorRegistry {
    authors: HashMap<String, AuthorInfo>,
}

impl AuthorRegistry {
    /// Parse registry YAML. Empty input is an empty registry.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let authors: HashMap<String, AuthorInfo> = serde_yaml::from_str(yaml)?;
        Ok(Self { authors })
    }

    /// Load the registry file, degrading to an empty registry on any failure.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Self {
        let yaml = match fs::read_to_string(path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Authors registry not found; using fallback author for every article");
                return Self::default();
            }
            Err(e) => {
                error!(error = %e, "Error loading authors registry");
                return Self::default();
            }
        };
        match Self::from_yaml(&yaml) {
            Ok(registry) => {
                if registry.is_empty() {
                    warn!("Authors registry has no entries");
                } else {
                    info!(count = registry.len(), "Loaded authors registry");
                }
                registry
            }
            Err(e) => {
                error!(error = %e, "Malformed authors registry; treating it as empty");
                Self::default()
            }
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&AuthorInfo> {
        self.authors.get(id)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REGISTRY: &str = "\
jdoe:
  name: Jane Doe
  title: Maintainer
  url: https://github.com/jdoe
  image_url: https://github.com/jdoe.png
bot:
  name: Release Bot
";

    #[test]
    fn test_from_yaml() {
        let registry = AuthorRegistry::from_yaml(REGISTRY).unwrap();
        assert_eq!(registry.len(), 2);
        let jane = registry.lookup("jdoe").unwrap();
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.image_url, "https://github.com/jdoe.png");
        assert_eq!(registry.lookup("bot").unwrap().title, "");
        assert!(registry.lookup("nobody").is_none());
    }

    #[test]
    fn test_empty_yaml() {
        assert!(AuthorRegistry::from_yaml("  \n").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_blank_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authors.yml");
        std::fs::write(&path, "\n").unwrap();
        assert!(AuthorRegistry::load(&path).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let registry = AuthorRegistry::load(&dir.path().join("authors.yml")).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authors.yml");
        std::fs::write(&path, "- just\n- a list\n").unwrap();
        assert!(AuthorRegistry::load(&path).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("authors.yml");
        std::fs::write(&path, REGISTRY).unwrap();
        let registry = AuthorRegistry::load(&path).await;
        assert_eq!(registry.lookup("jdoe").unwrap().title, "Maintainer");
    }
}
