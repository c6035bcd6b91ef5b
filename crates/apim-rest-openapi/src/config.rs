//! Index configuration loaded from YAML.
//!
//! Points the index at on-disk definition documents so deployments can ship
//! their own API descriptions instead of the bundled ones.
//!
//! # File format
//!
//! ```yaml
//! # Optional; the bundled store document is used when absent.
//! store_definition: api/store-api.yaml
//!
//! publisher_definition: api/publisher-api.json
//!
//! # Default tracing filter for the CLI (RUST_LOG takes precedence).
//! log_filter: apim_rest_openapi=debug
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::source::FileDefinitionSource;
use crate::surface::ApiSurface;

/// Default tracing filter when neither `RUST_LOG` nor `log_filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Resource-index configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Store API definition document.
    pub store_definition: Option<PathBuf>,

    /// Publisher API definition document.
    pub publisher_definition: Option<PathBuf>,

    /// Tracing filter directive, e.g. `info` or `apim_rest_openapi=debug`.
    pub log_filter: Option<String>,
}

impl IndexConfig {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Configured document path for `surface`.
    #[must_use]
    pub fn definition(&self, surface: ApiSurface) -> Option<&Path> {
        match surface {
            ApiSurface::Store => self.store_definition.as_deref(),
            ApiSurface::Publisher => self.publisher_definition.as_deref(),
        }
    }

    /// Tracing filter, falling back to [`DEFAULT_LOG_FILTER`].
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Definition source reading the configured paths, with bundled
    /// documents for surfaces left unset.
    #[must_use]
    pub fn source(&self) -> FileDefinitionSource {
        ApiSurface::ALL
            .into_iter()
            .fold(FileDefinitionSource::new(), |source, surface| {
                match self.definition(surface) {
                    Some(path) => source.with_path(surface, path),
                    None => source,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_defaults() {
        let config: IndexConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert!(config.store_definition.is_none());
        assert!(config.publisher_definition.is_none());
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);

        let source = config.source();
        assert!(source.path(ApiSurface::Store).is_none());
        assert!(source.path(ApiSurface::Publisher).is_none());
    }

    #[test]
    fn deserialize_full() {
        let yaml = r"
store_definition: api/store-api.yaml
publisher_definition: /etc/apim/publisher-api.json
log_filter: apim_rest_openapi=debug
";
        let config: IndexConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(
            config.definition(ApiSurface::Store),
            Some(Path::new("api/store-api.yaml"))
        );
        assert_eq!(config.log_filter(), "apim_rest_openapi=debug");

        let source = config.source();
        assert_eq!(
            source.path(ApiSurface::Publisher),
            Some(Path::new("/etc/apim/publisher-api.json"))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_yaml_ng::from_str::<IndexConfig>("store_defintion: typo.yaml\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir()
            .join(format!("apim-rest-openapi-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("index.yaml");
        std::fs::write(&path, "publisher_definition: pub.yaml\n").unwrap();

        let config = IndexConfig::load(&path).unwrap();
        assert_eq!(
            config.definition(ApiSurface::Publisher),
            Some(Path::new("pub.yaml"))
        );
        assert!(config.definition(ApiSurface::Store).is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = IndexConfig::load(Path::new("/nonexistent/index.yaml"));
        assert!(result.is_err());
    }
}
