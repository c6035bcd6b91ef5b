//! Where definition documents come from.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::surface::ApiSurface;

/// Store API definition shipped with the crate.
pub const BUNDLED_STORE_DEFINITION: &str = include_str!("../resources/store-api.yaml");

/// Publisher API definition shipped with the crate.
pub const BUNDLED_PUBLISHER_DEFINITION: &str = include_str!("../resources/publisher-api.json");

/// Supplies the raw definition document of a surface.
///
/// Called on every index miss, so a source may return different bytes over
/// time; the index only keeps the first document that parses.
pub trait DefinitionSource: Send + Sync {
    /// Raw document bytes for `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is unavailable or unreadable.
    fn load(&self, surface: ApiSurface) -> Result<Vec<u8>>;
}

/// The documents compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDefinitionSource;

impl BundledDefinitionSource {
    /// Bundled document text for `surface`.
    #[must_use]
    pub const fn document(surface: ApiSurface) -> &'static str {
        match surface {
            ApiSurface::Store => BUNDLED_STORE_DEFINITION,
            ApiSurface::Publisher => BUNDLED_PUBLISHER_DEFINITION,
        }
    }
}

impl DefinitionSource for BundledDefinitionSource {
    fn load(&self, surface: ApiSurface) -> Result<Vec<u8>> {
        Ok(Self::document(surface).as_bytes().to_vec())
    }
}

/// Reads documents from disk, falling back to the bundled ones for surfaces
/// without a configured path.
#[derive(Debug, Clone, Default)]
pub struct FileDefinitionSource {
    paths: [Option<PathBuf>; 2],
}

impl FileDefinitionSource {
    /// Source with no paths configured (bundled documents only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `surface`'s document from `path`.
    #[must_use]
    pub fn with_path(mut self, surface: ApiSurface, path: impl Into<PathBuf>) -> Self {
        self.paths[surface.slot()] = Some(path.into());
        self
    }

    /// Configured path for `surface`, if any.
    #[must_use]
    pub fn path(&self, surface: ApiSurface) -> Option<&Path> {
        self.paths[surface.slot()].as_deref()
    }
}

impl DefinitionSource for FileDefinitionSource {
    fn load(&self, surface: ApiSurface) -> Result<Vec<u8>> {
        let Some(path) = self.path(surface) else {
            tracing::debug!(surface = %surface, "no definition path configured, using bundled document");
            return BundledDefinitionSource.load(surface);
        };

        tracing::debug!(surface = %surface, path = %path.display(), "reading definition document");
        std::fs::read(path).map_err(|source| Error::DefinitionRead {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory documents, replaceable at runtime.
#[derive(Debug, Default)]
pub struct StaticDefinitionSource {
    documents: RwLock<[Option<Vec<u8>>; 2]>,
}

impl StaticDefinitionSource {
    /// Source with no documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` for `surface`.
    #[must_use]
    pub fn with_document(self, surface: ApiSurface, document: impl Into<Vec<u8>>) -> Self {
        self.replace(surface, document);
        self
    }

    /// Swap the document served for `surface`.
    pub fn replace(&self, surface: ApiSurface, document: impl Into<Vec<u8>>) {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        documents[surface.slot()] = Some(document.into());
    }
}

impl DefinitionSource for StaticDefinitionSource {
    fn load(&self, surface: ApiSurface) -> Result<Vec<u8>> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        documents[surface.slot()]
            .clone()
            .ok_or(Error::MissingDefinition { surface })
    }
}

impl<S: DefinitionSource + ?Sized> DefinitionSource for std::sync::Arc<S> {
    fn load(&self, surface: ApiSurface) -> Result<Vec<u8>> {
        (**self).load(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_documents_are_distinct() {
        let store = BundledDefinitionSource.load(ApiSurface::Store).unwrap();
        let publisher = BundledDefinitionSource.load(ApiSurface::Publisher).unwrap();
        assert!(!store.is_empty());
        assert_ne!(store, publisher);
    }

    #[test]
    fn file_source_reads_configured_path() {
        let dir = std::env::temp_dir()
            .join(format!("apim-rest-openapi-source-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("publisher.yaml");
        std::fs::write(&path, "swagger: '2.0'\n").unwrap();

        let source = FileDefinitionSource::new().with_path(ApiSurface::Publisher, &path);
        assert_eq!(source.path(ApiSurface::Publisher), Some(path.as_path()));
        assert_eq!(
            source.load(ApiSurface::Publisher).unwrap(),
            b"swagger: '2.0'\n"
        );
        assert_eq!(
            source.load(ApiSurface::Store).unwrap(),
            BUNDLED_STORE_DEFINITION.as_bytes()
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn file_source_missing_file() {
        let source =
            FileDefinitionSource::new().with_path(ApiSurface::Store, "/nonexistent/store.yaml");
        assert!(matches!(
            source.load(ApiSurface::Store),
            Err(Error::DefinitionRead { .. })
        ));
    }

    #[test]
    fn static_source_replace() {
        let source = StaticDefinitionSource::new().with_document(ApiSurface::Store, "a: 1");
        assert_eq!(source.load(ApiSurface::Store).unwrap(), b"a: 1");
        assert!(matches!(
            source.load(ApiSurface::Publisher),
            Err(Error::MissingDefinition {
                surface: ApiSurface::Publisher
            })
        ));

        source.replace(ApiSurface::Store, "a: 2");
        assert_eq!(source.load(ApiSurface::Store).unwrap(), b"a: 2");
    }
}
