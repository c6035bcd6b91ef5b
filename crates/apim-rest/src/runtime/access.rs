//! Request-level access checks: tenant ownership, read-only resources and
//! access-token extraction.

use http::header::AUTHORIZATION;
use http::{HeaderMap, Method};
use once_cell::sync::Lazy;
use regex::Regex;

use super::context::{provider_tenant_domain, RequestContext};
use super::error::RestError;
use crate::domain::ApiError;

/// Resource paths that only accept `GET`.
pub const READ_ONLY_RESOURCES: &[&str] = &["/tiers/application", "/tiers/resource"];

/// `Bearer` scheme prefix of an `Authorization` header, any letter case.
pub static BEARER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*Bearer\s+").expect("static bearer pattern must compile"));

/// Token following the first match of `scheme` in header `header_name`.
///
/// Returns `None` when the header is missing, is not visible ASCII, does not
/// match `scheme`, or carries nothing after the match.
#[must_use]
pub fn extract_access_token(
    headers: &HeaderMap,
    header_name: &str,
    scheme: &Regex,
) -> Option<String> {
    let value = headers.get(header_name)?.to_str().ok()?;
    let Some(found) = scheme.find(value) else {
        tracing::debug!(header = header_name, "auth header does not match token scheme");
        return None;
    };
    let token = value[found.end()..].trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Bearer token of the `Authorization` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    extract_access_token(headers, AUTHORIZATION.as_str(), &BEARER_PREFIX)
}

/// Ensure the caller's tenant owns the API published by `provider`.
///
/// `provider` may use the `-AT-` encoding of stored provider names.
///
/// `api_label` is only used in the failure message.
///
/// # Errors
///
/// Returns [`ApiError::AuthorizationFailed`] when the provider's tenant differs
/// from the caller's.
pub fn validate_user_tenant(
    ctx: &RequestContext,
    provider: &str,
    api_label: &str,
) -> Result<(), ApiError> {
    let provider_tenant = provider_tenant_domain(provider);
    if provider_tenant == ctx.tenant_domain() {
        return Ok(());
    }

    Err(ApiError::authorization_failed(format!(
        "User {} is not allowed to access {api_label} as it belongs to a different tenant : {provider_tenant}",
        ctx.username(),
    )))
}

/// Reject methods other than `GET` on [`READ_ONLY_RESOURCES`].
///
/// # Errors
///
/// Returns a `405` [`RestError`] for a non-`GET` call on a read-only resource.
pub fn check_allowed_method(method: &Method, resource: &str) -> Result<(), RestError> {
    if READ_ONLY_RESOURCES.contains(&resource) && *method != Method::GET {
        return Err(RestError::method_not_allowed(method.as_str(), resource));
    }
    Ok(())
}
