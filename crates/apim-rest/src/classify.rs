//! Root-cause classification for wrapped error chains.
//!
//! Handlers usually see an error several layers removed from where it was
//! raised. [`classify`] walks [`Error::source`] to the innermost cause and tags
//! it with an [`ErrorKind`], which the REST layer turns into an HTTP status.
//!
//! Recognized root causes:
//!
//! | Root cause | Kind |
//! |------------|------|
//! | [`ApiError::AuthorizationFailed`], [`ApiError::RegistryAuthorizationFailed`] | [`ErrorKind::AuthorizationFailure`] |
//! | [`ApiError::ResourceNotFound`], [`ApiError::RegistryResourceNotFound`] | [`ErrorKind::NotFound`] |
//! | [`ApiError::ResourceAlreadyExists`], [`ApiError::DuplicateApi`] | [`ErrorKind::AlreadyExists`] |
//! | [`tonic::Status`] | by code, see [`kind_for_grpc_code`](crate::kind_for_grpc_code) |
//! | anything else | [`ErrorKind::Unknown`] |

use std::error::Error;
use std::fmt;

use regex::Regex;

use crate::domain::ApiError;
use crate::runtime::{error_kind_to_http_status, kind_for_grpc_code};

/// Coarse failure taxonomy used to pick an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller is not permitted to perform the operation.
    AuthorizationFailure,
    /// The addressed resource does not exist.
    NotFound,
    /// The resource conflicts with one that already exists.
    AlreadyExists,
    /// Anything not recognized above.
    Unknown,
}

impl ErrorKind {
    /// Canonical `SCREAMING_SNAKE_CASE` name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationFailure => "AUTHORIZATION_FAILURE",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// HTTP status answered for this kind.
    #[must_use]
    pub const fn http_status(self) -> axum::http::StatusCode {
        error_kind_to_http_status(self)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    /// Tag of the root cause.
    pub kind: ErrorKind,
    /// Message of the root cause; empty when it had none.
    pub root_message: String,
}

impl ClassifiedError {
    /// HTTP status answered for the classified kind.
    #[must_use]
    pub const fn http_status(&self) -> axum::http::StatusCode {
        self.kind.http_status()
    }
}

/// Return the innermost error in `err`'s source chain, or `err` itself when
/// it wraps nothing.
///
/// Chains of any length are followed to the end. If a `source()` leads back
/// to a link already visited, the last new link is the root.
///
/// Applying it twice yields the same error.
///
/// # Examples
///
/// ```
/// use apim_rest::{find_root_cause, ApiError};
///
/// let err = ApiError::wrap("update failed", ApiError::not_found("no such API"));
/// assert_eq!(find_root_cause(&err).to_string(), "no such API");
/// ```
#[must_use]
pub fn find_root_cause<'a>(err: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    let mut visited: Vec<*const (dyn Error + 'static)> = vec![err as *const _];
    let mut current = err;
    while let Some(next) = current.source() {
        let next_ptr: *const (dyn Error + 'static) = next;
        if visited.iter().any(|seen| std::ptr::addr_eq(*seen, next_ptr)) {
            break;
        }
        visited.push(next_ptr);
        current = next;
    }
    current
}

/// Classify `err` by the kind of its root cause.
///
/// # Examples
///
/// ```
/// use apim_rest::{classify, ApiError, ErrorKind};
///
/// let err = ApiError::wrap("lookup failed", ApiError::authorization_failed("wrong tenant"));
/// let classified = classify(&err);
/// assert_eq!(classified.kind, ErrorKind::AuthorizationFailure);
/// assert_eq!(classified.root_message, "wrong tenant");
/// ```
#[must_use]
pub fn classify(err: &(dyn Error + 'static)) -> ClassifiedError {
    let root = find_root_cause(err);
    ClassifiedError {
        kind: kind_of(root),
        root_message: root_message(root).unwrap_or_default(),
    }
}

/// Whether `err` is ultimately caused by an authorization failure.
#[must_use]
pub fn is_due_to_authorization_failure(err: &(dyn Error + 'static)) -> bool {
    kind_of(find_root_cause(err)) == ErrorKind::AuthorizationFailure
}

/// Whether `err` is ultimately caused by a missing resource.
#[must_use]
pub fn is_due_to_resource_not_found(err: &(dyn Error + 'static)) -> bool {
    kind_of(find_root_cause(err)) == ErrorKind::NotFound
}

/// Whether `err` is ultimately caused by a conflicting resource.
#[must_use]
pub fn is_due_to_resource_already_exists(err: &(dyn Error + 'static)) -> bool {
    kind_of(find_root_cause(err)) == ErrorKind::AlreadyExists
}

/// Whether the root cause's message contains a match for `pattern`.
///
/// `pattern` is a regular expression searched anywhere in the message. A
/// pattern that does not compile is matched as a literal substring. A root
/// cause without a message never matches.
#[must_use]
pub fn root_message_matches(err: &(dyn Error + 'static), pattern: &str) -> bool {
    let Some(message) = root_message(find_root_cause(err)) else {
        return false;
    };

    match Regex::new(pattern) {
        Ok(re) => re.is_match(&message),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "invalid pattern, matching literally");
            message.contains(pattern)
        }
    }
}

fn kind_of(cause: &(dyn Error + 'static)) -> ErrorKind {
    if let Some(api) = cause.downcast_ref::<ApiError>() {
        return api.kind();
    }
    if let Some(status) = cause.downcast_ref::<tonic::Status>() {
        return kind_for_grpc_code(status.code());
    }
    ErrorKind::Unknown
}

fn root_message(cause: &(dyn Error + 'static)) -> Option<String> {
    let message = if let Some(api) = cause.downcast_ref::<ApiError>() {
        api.message()?
    } else if let Some(status) = cause.downcast_ref::<tonic::Status>() {
        status.message().to_string()
    } else {
        cause.to_string()
    };

    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain error with a configurable source, standing in for foreign wrappers.
    #[derive(Debug)]
    struct Wrapper {
        label: &'static str,
        inner: Option<Box<dyn Error + Send + Sync + 'static>>,
    }

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label)
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.inner.as_deref().map(|e| e as &(dyn Error + 'static))
        }
    }

    fn wrapped(depth: usize, root: ApiError) -> Box<dyn Error + Send + Sync + 'static> {
        let mut err: Box<dyn Error + Send + Sync + 'static> = Box::new(root);
        for _ in 0..depth {
            err = Box::new(Wrapper {
                label: "layer",
                inner: Some(err),
            });
        }
        err
    }

    #[test]
    fn unwrapped_error_is_its_own_root() {
        let err = ApiError::not_found("gone");
        let root = find_root_cause(&err);
        assert!(std::ptr::addr_eq(root, &err as &dyn Error));
    }

    #[test]
    fn three_levels_reach_innermost() {
        let err = wrapped(3, ApiError::already_exists("dup"));
        let root = find_root_cause(err.as_ref());
        assert_eq!(root.to_string(), "dup");
        assert!(root.downcast_ref::<ApiError>().is_some());
    }

    #[test]
    fn root_cause_is_idempotent() {
        let err = wrapped(4, ApiError::not_found("x"));
        let once = find_root_cause(err.as_ref());
        let twice = find_root_cause(once);
        assert!(std::ptr::addr_eq(once, twice));
    }

    #[test]
    fn authorization_kind_independent_of_depth() {
        for depth in [0, 1, 2, 5] {
            let err = wrapped(depth, ApiError::authorization_failed("denied"));
            let classified = classify(err.as_ref());
            assert_eq!(
                classified.kind,
                ErrorKind::AuthorizationFailure,
                "depth {depth}"
            );
            assert_eq!(classified.root_message, "denied");
        }
    }

    #[test]
    fn deep_chain_reaches_innermost() {
        let mut err = ApiError::authorization_failed("denied");
        for layer in 0..200 {
            err = ApiError::wrap(format!("layer {layer}"), err);
        }

        assert_eq!(find_root_cause(&err).to_string(), "denied");
        let classified = classify(&err);
        assert_eq!(classified.kind, ErrorKind::AuthorizationFailure);
        assert_eq!(classified.root_message, "denied");
        assert!(root_message_matches(&err, "^denied$"));
    }

    /// Error whose source is itself.
    #[derive(Debug)]
    struct SelfCause;

    impl fmt::Display for SelfCause {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("loops")
        }
    }

    impl Error for SelfCause {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self)
        }
    }

    #[test]
    fn source_cycle_stops_at_last_new_link() {
        let err = Wrapper {
            label: "outer",
            inner: Some(Box::new(SelfCause)),
        };
        let root = find_root_cause(&err);
        assert_eq!(root.to_string(), "loops");
        assert_eq!(classify(&err).kind, ErrorKind::Unknown);
    }

    #[test]
    fn classification_table() {
        let cases: Vec<(ApiError, ErrorKind)> = vec![
            (
                ApiError::RegistryAuthorizationFailed { path: "/r".into() },
                ErrorKind::AuthorizationFailure,
            ),
            (ApiError::not_found("a"), ErrorKind::NotFound),
            (
                ApiError::RegistryResourceNotFound { path: "/r".into() },
                ErrorKind::NotFound,
            ),
            (ApiError::already_exists("b"), ErrorKind::AlreadyExists),
            (
                ApiError::DuplicateApi {
                    identifier: "admin-Pets-1.0".into(),
                },
                ErrorKind::AlreadyExists,
            ),
            (ApiError::management("c"), ErrorKind::Unknown),
        ];

        for (err, expected) in cases {
            let wrapped = ApiError::wrap("outer", err);
            assert_eq!(classify(&wrapped).kind, expected, "{wrapped:?}");
        }
    }

    #[test]
    fn wrapper_only_chain_is_unknown() {
        let err = Wrapper {
            label: "io broke",
            inner: None,
        };
        let classified = classify(&err);
        assert_eq!(classified.kind, ErrorKind::Unknown);
        assert_eq!(classified.root_message, "io broke");
    }

    #[test]
    fn grpc_status_root_is_classified_by_code() {
        let err = ApiError::wrap("backend call failed", tonic::Status::permission_denied("no"));
        assert!(is_due_to_authorization_failure(&err));

        let err = ApiError::wrap("backend call failed", tonic::Status::not_found("no"));
        assert!(is_due_to_resource_not_found(&err));

        let err = ApiError::wrap("backend call failed", tonic::Status::already_exists("no"));
        assert!(is_due_to_resource_already_exists(&err));
    }

    #[test]
    fn predicates_are_exclusive() {
        let err = ApiError::wrap("outer", ApiError::not_found("x"));
        assert!(is_due_to_resource_not_found(&err));
        assert!(!is_due_to_authorization_failure(&err));
        assert!(!is_due_to_resource_already_exists(&err));
    }

    #[test]
    fn message_match_uses_regex_search() {
        let err = ApiError::wrap(
            "outer",
            ApiError::already_exists("Application with name DefaultApplication already exists"),
        );
        assert!(root_message_matches(&err, "already exists"));
        assert!(root_message_matches(&err, "name \\w+Application"));
        assert!(!root_message_matches(&err, "^already"));
    }

    #[test]
    fn message_match_without_message_is_false() {
        let err = ApiError::wrap("outer", ApiError::ResourceNotFound { message: None });
        assert!(!root_message_matches(&err, "not found"));
        assert!(!root_message_matches(&err, ""));
    }

    #[test]
    fn empty_message_counts_as_absent() {
        let err = ApiError::wrap("outer", tonic::Status::internal(""));
        assert!(!root_message_matches(&err, ".*"));
        assert_eq!(classify(&err).root_message, "");
    }

    #[test]
    fn invalid_pattern_matches_literally() {
        let err = ApiError::not_found("missing scope [apim:api_view");
        assert!(root_message_matches(&err, "[apim:api_view"));
        assert!(!root_message_matches(&err, "[apim:api_create"));
    }

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::AuthorizationFailure.to_string(), "AUTHORIZATION_FAILURE");
        assert_eq!(ErrorKind::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(ErrorKind::AlreadyExists.as_str(), "ALREADY_EXISTS");
        assert_eq!(ErrorKind::Unknown.as_str(), "UNKNOWN");
    }
}
