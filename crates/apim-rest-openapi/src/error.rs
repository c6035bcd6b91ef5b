//! Typed error enum for the `apim-rest-openapi` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

use std::path::PathBuf;

use crate::surface::ApiSurface;

/// Errors produced by `apim-rest-openapi` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading the config file).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A definition document could not be read from disk.
    #[error("failed to read definition '{}'", path.display())]
    DefinitionRead {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing failure (definition document or config).
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parsing failure (definition document).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The document parsed but does not have the expected structure.
    #[error("malformed definition document: {reason}")]
    MalformedDefinition {
        /// What was wrong.
        reason: String,
    },

    /// A path key could not be compiled into a matcher.
    #[error("invalid path template '{pattern}'")]
    InvalidPathTemplate {
        /// The offending path key.
        pattern: String,
        /// Regex compilation failure.
        #[source]
        source: regex::Error,
    },

    /// The definition source has no document for the surface.
    #[error("no definition document available for the {surface} API")]
    MissingDefinition {
        /// Surface whose document is missing.
        surface: ApiSurface,
    },

    /// A surface name other than `store` or `publisher`.
    #[error("unknown API surface '{name}'; expected 'store' or 'publisher'")]
    UnknownSurface {
        /// The unrecognized name.
        name: String,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
