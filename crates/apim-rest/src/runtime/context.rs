//! Per-request caller context: who is calling and which tenant they target.
//!
//! Replaces ambient per-thread state: handlers build a [`RequestContext`]
//! from the authenticated principal and the request headers, then pass it
//! down explicitly.

use axum::http::HeaderMap;

/// Header carrying the tenant a caller wants to address.
///
/// When absent or empty, the caller's own tenant is used.
pub const REQUESTED_TENANT_HEADER: &str = "x-wso2-tenant";

/// Tenant domain of users that carry no `@domain` suffix.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

/// Encoded form of `@` used in provider names stored in registry paths.
const EMAIL_DOMAIN_SEPARATOR_REPLACEMENT: &str = "-AT-";

/// Caller identity and tenant selection for one request.
///
/// # Examples
///
/// ```
/// use apim_rest::RequestContext;
/// use axum::http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-wso2-tenant", "wso2.com".parse().unwrap());
///
/// let ctx = RequestContext::new("alice@example.com").with_headers(&headers);
/// assert_eq!(ctx.tenant_domain(), "example.com");
/// assert_eq!(ctx.requested_tenant_domain(), "wso2.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    username: String,
    tenant_domain: String,
    requested_tenant: Option<String>,
}

impl RequestContext {
    /// Context for `username`, deriving the tenant from its `@domain` suffix.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        let tenant_domain = tenant_domain_of(&username).to_string();
        Self {
            username,
            tenant_domain,
            requested_tenant: None,
        }
    }

    /// Context with an explicit tenant domain.
    #[must_use]
    pub fn with_tenant(username: impl Into<String>, tenant_domain: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            tenant_domain: tenant_domain.into(),
            requested_tenant: None,
        }
    }

    /// Record the requested tenant from [`REQUESTED_TENANT_HEADER`], if present.
    ///
    /// Values that are not valid UTF-8 or are blank are ignored.
    #[must_use]
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        self.requested_tenant = headers
            .get(REQUESTED_TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string);
        self
    }

    /// Record the requested tenant directly.
    #[must_use]
    pub fn with_requested_tenant(mut self, tenant: Option<&str>) -> Self {
        self.requested_tenant = tenant.filter(|t| !t.is_empty()).map(ToString::to_string);
        self
    }

    /// Logged-in username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Tenant domain the logged-in user belongs to.
    #[must_use]
    pub fn tenant_domain(&self) -> &str {
        &self.tenant_domain
    }

    /// Tenant the request addresses: the header value, or the user's own tenant.
    #[must_use]
    pub fn requested_tenant_domain(&self) -> &str {
        self.requested_tenant
            .as_deref()
            .unwrap_or(&self.tenant_domain)
    }
}

/// Tenant domain of a username.
///
/// `alice@example.com` → `example.com`, `admin` → [`SUPER_TENANT_DOMAIN`].
#[must_use]
pub fn tenant_domain_of(username: &str) -> &str {
    username
        .rsplit_once('@')
        .map_or(SUPER_TENANT_DOMAIN, |(_, domain)| domain)
}

/// Tenant domain of an API provider name.
///
/// Provider names are stored with `-AT-` in place of `@`; they are decoded
/// before the tenant is read, so `alice-AT-example.com` → `example.com`.
#[must_use]
pub fn provider_tenant_domain(provider: &str) -> String {
    let decoded = provider.replace(EMAIL_DOMAIN_SEPARATOR_REPLACEMENT, "@");
    tenant_domain_of(&decoded).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_username_belongs_to_super_tenant() {
        let ctx = RequestContext::new("admin");
        assert_eq!(ctx.username(), "admin");
        assert_eq!(ctx.tenant_domain(), SUPER_TENANT_DOMAIN);
        assert_eq!(ctx.requested_tenant_domain(), SUPER_TENANT_DOMAIN);
    }

    #[test]
    fn header_overrides_requested_tenant() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUESTED_TENANT_HEADER, "other.org".parse().unwrap());

        let ctx = RequestContext::new("bob@acme.io").with_headers(&headers);
        assert_eq!(ctx.tenant_domain(), "acme.io");
        assert_eq!(ctx.requested_tenant_domain(), "other.org");
    }

    #[test]
    fn blank_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUESTED_TENANT_HEADER, "   ".parse().unwrap());

        let ctx = RequestContext::new("bob@acme.io").with_headers(&headers);
        assert_eq!(ctx.requested_tenant_domain(), "acme.io");
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::HeaderName::from_bytes(b"X-WSO2-Tenant").unwrap(),
            "other.org".parse().unwrap(),
        );

        let ctx = RequestContext::new("admin").with_headers(&headers);
        assert_eq!(ctx.requested_tenant_domain(), "other.org");
    }

    #[test]
    fn explicit_requested_tenant() {
        let ctx = RequestContext::with_tenant("admin", "carbon.super")
            .with_requested_tenant(Some("t1.com"));
        assert_eq!(ctx.requested_tenant_domain(), "t1.com");

        let ctx = ctx.with_requested_tenant(Some(""));
        assert_eq!(ctx.requested_tenant_domain(), "carbon.super");
    }

    #[test]
    fn tenant_domain_of_username() {
        assert_eq!(tenant_domain_of("alice@sub@example.com"), "example.com");
        assert_eq!(tenant_domain_of("admin"), SUPER_TENANT_DOMAIN);
    }

    #[test]
    fn usernames_are_not_decoded() {
        assert_eq!(tenant_domain_of("ops-AT-team"), SUPER_TENANT_DOMAIN);
        let ctx = RequestContext::new("ops-AT-team");
        assert_eq!(ctx.tenant_domain(), SUPER_TENANT_DOMAIN);
    }

    #[test]
    fn provider_names_are_decoded() {
        assert_eq!(provider_tenant_domain("alice-AT-example.com"), "example.com");
        assert_eq!(provider_tenant_domain("alice@gmail.com-AT-wso2.com"), "wso2.com");
        assert_eq!(provider_tenant_domain("bob@acme.io"), "acme.io");
        assert_eq!(provider_tenant_domain("admin"), SUPER_TENANT_DOMAIN);
    }
}
