//! Error kind ↔ status code mapping.

use axum::http::StatusCode;

use crate::classify::ErrorKind;

/// Map an [`ErrorKind`] to the HTTP status returned to REST callers.
///
/// # Examples
///
/// ```
/// use apim_rest::{error_kind_to_http_status, ErrorKind};
/// use axum::http::StatusCode;
///
/// assert_eq!(error_kind_to_http_status(ErrorKind::NotFound), StatusCode::NOT_FOUND);
/// assert_eq!(error_kind_to_http_status(ErrorKind::AlreadyExists), StatusCode::CONFLICT);
/// ```
#[must_use]
pub const fn error_kind_to_http_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::AuthorizationFailure => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a gRPC status code from a backend call to an [`ErrorKind`].
///
/// Only the codes that carry the same meaning as the domain taxonomy are
/// recognized; everything else is [`ErrorKind::Unknown`].
#[must_use]
pub const fn kind_for_grpc_code(code: tonic::Code) -> ErrorKind {
    match code {
        tonic::Code::PermissionDenied | tonic::Code::Unauthenticated => {
            ErrorKind::AuthorizationFailure
        }
        tonic::Code::NotFound => ErrorKind::NotFound,
        tonic::Code::AlreadyExists => ErrorKind::AlreadyExists,
        tonic::Code::Ok
        | tonic::Code::Cancelled
        | tonic::Code::Unknown
        | tonic::Code::InvalidArgument
        | tonic::Code::DeadlineExceeded
        | tonic::Code::ResourceExhausted
        | tonic::Code::FailedPrecondition
        | tonic::Code::Aborted
        | tonic::Code::OutOfRange
        | tonic::Code::Unimplemented
        | tonic::Code::Internal
        | tonic::Code::Unavailable
        | tonic::Code::DataLoss => ErrorKind::Unknown,
    }
}

/// Default `message` field for an error body with the given status.
///
/// Uses the canonical reason phrase (`"Not Found"`, `"Conflict"`, ...).
#[must_use]
pub fn default_message(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}
