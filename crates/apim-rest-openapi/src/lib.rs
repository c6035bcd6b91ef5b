#![allow(clippy::doc_markdown)] // "OpenAPI" and "Swagger" proper nouns throughout
//! Protected-resource index for the management REST APIs of an API gateway.
//!
//! Each management surface (store, publisher) ships a Swagger 2.0 document
//! whose operations carry `x-scope` and `x-auth-type` extensions. This crate
//! parses those documents once, caches the result for the process lifetime,
//! and answers "which scope guards `METHOD /path`?" for request authorization.
//!
//! # Types
//!
//! - [`ResourceMapIndex`]: Per-surface cache, built lazily from a [`DefinitionSource`]
//! - [`ResourceSet`] / [`ProtectedResource`]: Parsed operations and their guards
//! - [`Swagger2Parser`]: Default [`DefinitionParser`] for JSON or YAML documents
//! - [`IndexConfig`]: YAML config pointing at on-disk documents
//!
//! # Usage
//!
//! ```
//! use apim_rest_openapi::{ApiSurface, ResourceMapIndex, StaticDefinitionSource};
//!
//! let source = StaticDefinitionSource::new().with_document(
//!     ApiSurface::Store,
//!     "paths:\n  /applications:\n    post:\n      x-scope: apim:subscribe\n",
//! );
//! let index = ResourceMapIndex::new(source);
//!
//! let resource = index.find(ApiSurface::Store, "POST", "/applications").unwrap();
//! assert_eq!(resource.required_scope(), Some("apim:subscribe"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod definition;
mod error;
mod index;
mod resource;
mod source;
mod surface;

pub use config::{IndexConfig, DEFAULT_LOG_FILTER};
pub use definition::{
    DefinitionParser, ScopeDefinition, Swagger2Parser, DEFAULT_SCOPE_ROLE, HTTP_METHODS,
};
pub use error::{Error, Result};
pub use index::ResourceMapIndex;
pub use resource::{AuthType, PathTemplate, ProtectedResource, ResourceSet};
pub use source::{
    BundledDefinitionSource, DefinitionSource, FileDefinitionSource, StaticDefinitionSource,
    BUNDLED_PUBLISHER_DEFINITION, BUNDLED_STORE_DEFINITION,
};
pub use surface::ApiSurface;
