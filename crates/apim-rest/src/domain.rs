//! Domain errors raised by the API-management layer.
//!
//! [`ApiError`] is the closed set of failures that the classifier in
//! [`crate::classify`] knows how to tag. Wrapping happens through
//! [`ApiError::Management`], whose `source` points at the underlying failure.

use std::error::Error as StdError;

use crate::classify::ErrorKind;

/// Boxed cause carried by [`ApiError::Management`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced by API-management operations.
///
/// Variants that take `Option<String>` model failures raised without a
/// message; their [`Display`](std::fmt::Display) falls back to a generic text
/// while [`ApiError::message`] reports `None`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The caller is not allowed to perform the operation.
    #[error("{}", .message.as_deref().unwrap_or("authorization failed"))]
    AuthorizationFailed {
        /// Failure detail, if any.
        message: Option<String>,
    },

    /// The artifact registry denied access to a stored resource.
    #[error("registry denied access to '{path}'")]
    RegistryAuthorizationFailed {
        /// Registry path that was denied.
        path: String,
    },

    /// A requested API-management resource does not exist.
    #[error("{}", .message.as_deref().unwrap_or("resource not found"))]
    ResourceNotFound {
        /// Failure detail, if any.
        message: Option<String>,
    },

    /// The artifact registry has no resource at the given path.
    #[error("registry resource '{path}' not found")]
    RegistryResourceNotFound {
        /// Registry path that was looked up.
        path: String,
    },

    /// The created or updated resource conflicts with an existing one.
    #[error("{}", .message.as_deref().unwrap_or("resource already exists"))]
    ResourceAlreadyExists {
        /// Failure detail, if any.
        message: Option<String>,
    },

    /// An API with the same identifier is already registered.
    #[error("API '{identifier}' already exists")]
    DuplicateApi {
        /// `provider-name-version` identifier of the clashing API.
        identifier: String,
    },

    /// Generic management failure, optionally wrapping a deeper cause.
    #[error("{message}")]
    Management {
        /// Context describing the failed operation.
        message: String,
        /// Underlying cause.
        #[source]
        source: Option<BoxError>,
    },
}

impl ApiError {
    /// Authorization failure with a message.
    #[must_use]
    pub fn authorization_failed(message: impl Into<String>) -> Self {
        Self::AuthorizationFailed {
            message: Some(message.into()),
        }
    }

    /// Missing resource with a message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            message: Some(message.into()),
        }
    }

    /// Conflicting resource with a message.
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::ResourceAlreadyExists {
            message: Some(message.into()),
        }
    }

    /// Management failure without an underlying cause.
    #[must_use]
    pub fn management(message: impl Into<String>) -> Self {
        Self::Management {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap `cause` in a management failure carrying `message`.
    #[must_use]
    pub fn wrap(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Management {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// The classification tag of this error, ignoring any wrapped cause.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthorizationFailed { .. } | Self::RegistryAuthorizationFailed { .. } => {
                ErrorKind::AuthorizationFailure
            }
            Self::ResourceNotFound { .. } | Self::RegistryResourceNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::ResourceAlreadyExists { .. } | Self::DuplicateApi { .. } => {
                ErrorKind::AlreadyExists
            }
            Self::Management { .. } => ErrorKind::Unknown,
        }
    }

    /// The message the error was raised with, or `None` when it had none.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::AuthorizationFailed { message }
            | Self::ResourceNotFound { message }
            | Self::ResourceAlreadyExists { message } => message.clone(),
            Self::Management { message, .. } => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}
