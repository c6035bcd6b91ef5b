//! Lazily built, process-lifetime index of protected resources.
//!
//! [`ResourceMapIndex`] keeps one slot per [`ApiSurface`]. The first call to
//! [`get_index`](ResourceMapIndex::get_index) for a surface loads and parses
//! its document and publishes the result; every later call returns that same
//! set. Failed loads are logged and answered with an empty set, and the slot
//! stays empty so the next call tries again.
//!
//! Share an index between request handlers with `Arc<ResourceMapIndex>`.

use std::sync::OnceLock;

use crate::definition::{DefinitionParser, ScopeDefinition, Swagger2Parser};
use crate::error::Result;
use crate::resource::{ProtectedResource, ResourceSet};
use crate::source::{BundledDefinitionSource, DefinitionSource};
use crate::surface::ApiSurface;

/// Per-surface cache of parsed definition documents.
pub struct ResourceMapIndex {
    source: Box<dyn DefinitionSource>,
    parser: Box<dyn DefinitionParser>,
    slots: [OnceLock<ResourceSet>; 2],
}

impl ResourceMapIndex {
    /// Index over `source` parsed with [`Swagger2Parser`].
    #[must_use]
    pub fn new(source: impl DefinitionSource + 'static) -> Self {
        Self::with_parser(source, Swagger2Parser)
    }

    /// Index over `source` parsed with `parser`.
    #[must_use]
    pub fn with_parser(
        source: impl DefinitionSource + 'static,
        parser: impl DefinitionParser + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            parser: Box::new(parser),
            slots: [OnceLock::new(), OnceLock::new()],
        }
    }

    /// Index over the documents compiled into the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(BundledDefinitionSource)
    }

    /// Resources of `surface`, loading them on first use.
    ///
    /// Never fails: a document that cannot be loaded or parsed is logged and
    /// answered with an empty set, without being cached.
    #[must_use]
    pub fn get_index(&self, surface: ApiSurface) -> ResourceSet {
        self.try_get_index(surface).unwrap_or_else(|err| {
            tracing::error!(surface = %surface, error = %err, "failed to build resource index");
            ResourceSet::default()
        })
    }

    /// Like [`get_index`](Self::get_index), but reports load failures.
    ///
    /// # Errors
    ///
    /// Returns the source or parser error. The slot is left empty.
    pub fn try_get_index(&self, surface: ApiSurface) -> Result<ResourceSet> {
        let slot = &self.slots[surface.slot()];
        if let Some(set) = slot.get() {
            tracing::debug!(surface = %surface, "resource index cache hit");
            return Ok(set.clone());
        }

        let parsed = self.load(surface)?;
        match slot.set(parsed) {
            Ok(()) => tracing::info!(
                surface = %surface,
                resources = slot.get().map_or(0, ResourceSet::len),
                "resource index published"
            ),
            Err(_) => tracing::debug!(surface = %surface, "resource index already published"),
        }
        Ok(slot.get().cloned().unwrap_or_default())
    }

    /// Whether `surface`'s slot holds a published set.
    #[must_use]
    pub fn is_loaded(&self, surface: ApiSurface) -> bool {
        self.slots[surface.slot()].get().is_some()
    }

    /// First resource of `surface` guarding `method` on `path`.
    #[must_use]
    pub fn find(&self, surface: ApiSurface, method: &str, path: &str) -> Option<ProtectedResource> {
        self.get_index(surface).find(method, path).cloned()
    }

    /// Scope declarations of `surface`'s document. Read fresh on every call;
    /// failures are logged and answered with no scopes.
    #[must_use]
    pub fn scopes(&self, surface: ApiSurface) -> Vec<ScopeDefinition> {
        let scopes = self
            .source
            .load(surface)
            .and_then(|document| self.parser.scopes(&document));
        scopes.unwrap_or_else(|err| {
            tracing::error!(surface = %surface, error = %err, "failed to read scope definitions");
            Vec::new()
        })
    }

    fn load(&self, surface: ApiSurface) -> Result<ResourceSet> {
        let document = self.source.load(surface)?;
        tracing::debug!(surface = %surface, bytes = document.len(), "parsing definition document");
        self.parser.parse(&document)
    }
}

impl std::fmt::Debug for ResourceMapIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceMapIndex")
            .field("store_loaded", &self.is_loaded(ApiSurface::Store))
            .field("publisher_loaded", &self.is_loaded(ApiSurface::Publisher))
            .finish_non_exhaustive()
    }
}
