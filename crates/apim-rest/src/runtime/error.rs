//! REST error responses: structured JSON bodies for failed management calls.

use std::error::Error as StdError;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::status_map::{default_message, error_kind_to_http_status};
use crate::classify::{classify, ErrorKind};
use crate::domain::ApiError;

/// Description used for unclassified failures; internals are not exposed.
const INTERNAL_ERROR_DESCRIPTION: &str = "The server encountered an internal error";

/// JSON body of an error response.
///
/// ```json
/// {
///   "code": 404,
///   "message": "Not Found",
///   "description": "Requested API with Id '0a3d…' not found",
///   "moreInfo": "",
///   "error": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDto {
    /// HTTP status code.
    pub code: u16,
    /// Short status text.
    pub message: String,
    /// Human-readable detail.
    pub description: String,
    /// Link or hint for further information.
    pub more_info: String,
    /// Per-field problems, e.g. constraint violations.
    pub error: Vec<ErrorListItemDto>,
}

/// One entry of [`ErrorDto::error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorListItemDto {
    /// Optional machine-readable code.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
    /// Problem description.
    pub message: String,
}

/// HTTP error response for the management REST API.
///
/// Build one with the status-specific constructors, or convert any error
/// chain with [`RestError::from_error`], which picks the status from the
/// chain's root cause.
///
/// # Examples
///
/// ```
/// use apim_rest::RestError;
/// use axum::response::IntoResponse;
///
/// let err = RestError::not_found("API", Some("0a3d"));
/// assert_eq!(err.body().description, "Requested API with Id '0a3d' not found");
/// assert_eq!(err.into_response().status(), axum::http::StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone)]
pub struct RestError {
    status: StatusCode,
    body: ErrorDto,
}

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.body.description)
    }
}

impl StdError for RestError {}

impl RestError {
    /// Create an error with `status`, its default message and `description`.
    #[must_use]
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorDto {
                code: status.as_u16(),
                message: default_message(status).to_string(),
                description: description.into(),
                more_info: String::new(),
                error: Vec::new(),
            },
        }
    }

    /// `404` for a resource type, optionally naming the missing id.
    #[must_use]
    pub fn not_found(resource: &str, id: Option<&str>) -> Self {
        let description = match id.filter(|id| !id.is_empty()) {
            Some(id) => format!("Requested {resource} with Id '{id}' not found"),
            None => format!("Requested {resource} not found"),
        };
        Self::new(StatusCode::NOT_FOUND, description)
    }

    /// `403` for a resource type, optionally naming the protected id.
    #[must_use]
    pub fn forbidden(resource: &str, id: Option<&str>) -> Self {
        let description = match id.filter(|id| !id.is_empty()) {
            Some(id) => format!("You don't have permission to access the {resource} with Id {id}"),
            None => format!("You don't have permission to access the {resource}"),
        };
        Self::new(StatusCode::FORBIDDEN, description)
    }

    /// `400` with a free-form description.
    #[must_use]
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, description)
    }

    /// `405` for a method the resource does not support.
    #[must_use]
    pub fn method_not_allowed(method: &str, resource: &str) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method {method} is not supported for {resource}"),
        )
    }

    /// `409` with a free-form description.
    #[must_use]
    pub fn conflict(description: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, description)
    }

    /// `500` with a generic description.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DESCRIPTION)
    }

    /// `400` listing each `(property path, message)` violation.
    #[must_use]
    pub fn constraint_violation<I, P, M>(violations: I) -> Self
    where
        I: IntoIterator<Item = (P, M)>,
        P: std::fmt::Display,
        M: std::fmt::Display,
    {
        let mut err = Self::new(StatusCode::BAD_REQUEST, "Constraint Violation");
        err.body.message = "Constraint Violation".to_string();
        err.body.error = violations
            .into_iter()
            .map(|(path, message)| ErrorListItemDto {
                code: None,
                message: format!("{path}: {message}"),
            })
            .collect();
        err
    }

    /// Build a response from an arbitrary error chain.
    ///
    /// The status comes from [`classify`]. Recognized kinds carry the root
    /// cause's message as description; unrecognized failures are logged and
    /// answered with a generic `500`.
    #[must_use]
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let classified = classify(err);
        if classified.kind == ErrorKind::Unknown {
            tracing::error!(error = %err, root = %classified.root_message, "unclassified failure");
            return Self::internal();
        }

        let status = error_kind_to_http_status(classified.kind);
        let description = if classified.root_message.is_empty() {
            default_message(status).to_string()
        } else {
            classified.root_message
        };
        Self::new(status, description)
    }

    /// Set the `moreInfo` field.
    #[must_use]
    pub fn with_more_info(mut self, more_info: impl Into<String>) -> Self {
        self.body.more_info = more_info.into();
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// JSON body of the response.
    #[must_use]
    pub const fn body(&self) -> &ErrorDto {
        &self.body
    }

    /// Consume the error and return its body.
    #[must_use]
    pub fn into_body(self) -> ErrorDto {
        self.body
    }
}

impl From<ApiError> for RestError {
    fn from(err: ApiError) -> Self {
        Self::from_error(&err)
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}
