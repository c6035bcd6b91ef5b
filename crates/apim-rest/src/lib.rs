//! Runtime helpers for the REST control plane of an API-management gateway.
//!
//! # Types
//!
//! - [`classify`] / [`find_root_cause`]: Tag a wrapped error chain by its root cause
//! - [`root_message_matches`]: Finer-grained branching on the root cause's message
//! - [`ApiError`]: Domain failures recognized by the classifier
//! - [`RestError`]: Converts failures into JSON error responses
//! - [`compute_window`]: Next/previous pages for offset/limit pagination
//! - [`RequestContext`]: Caller identity and requested tenant, passed explicitly
//! - [`is_uuid`] / [`is_url`] / [`invalid_tier_names`]: Input checks for handlers
//! - [`bearer_token`]: Access token from the `Authorization` header
//!
//! # Usage
//!
//! ```
//! use apim_rest::{classify, ApiError, ErrorKind, RestError};
//! use axum::http::StatusCode;
//!
//! let err = ApiError::wrap("failed to fetch API", ApiError::not_found("no API with id 42"));
//! assert_eq!(classify(&err).kind, ErrorKind::NotFound);
//!
//! let response = RestError::from(err);
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod classify;
mod domain;
mod pagination;
mod runtime;
mod validation;

pub use classify::{
    classify, find_root_cause, is_due_to_authorization_failure,
    is_due_to_resource_already_exists, is_due_to_resource_not_found, root_message_matches,
    ClassifiedError, ErrorKind,
};
pub use domain::{ApiError, BoxError};
pub use pagination::{compute_window, PageLinks, PageRef, PageWindow};
pub use runtime::*;
pub use validation::{find_tier, invalid_tier_names, is_url, is_uuid};
