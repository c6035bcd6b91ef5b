//! Protected-resource descriptors and the ordered sets they live in.
//!
//! A [`ProtectedResource`] is one `(method, path template)` pair lifted from a
//! definition document together with the scope and auth type guarding it.
//! Descriptors are only produced by a [`DefinitionParser`](crate::DefinitionParser);
//! callers look them up through [`ResourceSet::find`].

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Error, Result};

/// Credential kinds an operation accepts, from the `x-auth-type` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthType {
    /// Open endpoint; no token required.
    None,
    /// Application token (client credentials).
    Application,
    /// Token issued on behalf of an end user.
    ApplicationUser,
    /// Either kind of token.
    #[default]
    ApplicationAndApplicationUser,
}

impl AuthType {
    /// Parse an `x-auth-type` value.
    ///
    /// Matching is case-insensitive. A missing value means either token kind is
    /// accepted, and so does an unrecognized one (logged at `warn`).
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::default();
        };

        match label.trim().to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "application" => Self::Application,
            "application user" => Self::ApplicationUser,
            "application & application user" | "any" => Self::ApplicationAndApplicationUser,
            _ => {
                tracing::warn!(auth_type = label, "unknown auth type, accepting any token");
                Self::default()
            }
        }
    }

    /// Canonical `x-auth-type` spelling.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Application => "Application",
            Self::ApplicationUser => "Application User",
            Self::ApplicationAndApplicationUser => "Application & Application User",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A compiled path key such as `/apis/{apiId}/documents/{documentId}`.
///
/// Each `{name}` placeholder matches one or more characters other than `/`;
/// everything else matches literally. An unclosed `{` is treated as a literal.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pattern: String,
    matcher: Regex,
}

impl PathTemplate {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPathTemplate`] if the derived expression is
    /// rejected by the regex engine (for example, it exceeds the size limit).
    pub fn new(pattern: &str) -> Result<Self> {
        let matcher = Regex::new(&template_expression(pattern)).map_err(|source| {
            Error::InvalidPathTemplate {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    /// The path key as written in the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether `path` (no query string, no base path) fits this template.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

impl PartialEq for PathTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for PathTemplate {}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Anchored expression for a path key.
fn template_expression(pattern: &str) -> String {
    let mut expr = String::with_capacity(pattern.len() + 16);
    expr.push('^');

    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        expr.push_str(&regex::escape(&rest[..open]));
        expr.push_str("[^/]+");
        rest = &rest[open + close + 1..];
    }
    expr.push_str(&regex::escape(rest));
    expr.push('$');
    expr
}

/// One operation of a definition document and what guards it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedResource {
    http_method: String,
    path: PathTemplate,
    required_scope: Option<String>,
    auth_type: AuthType,
    throttling_tier: Option<String>,
}

impl ProtectedResource {
    /// Build a descriptor. The method is stored upper-cased; an empty scope
    /// is stored as no scope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPathTemplate`] if `path` cannot be compiled.
    pub fn new(
        http_method: &str,
        path: &str,
        required_scope: Option<&str>,
        auth_type: AuthType,
        throttling_tier: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            http_method: http_method.to_ascii_uppercase(),
            path: PathTemplate::new(path)?,
            required_scope: required_scope
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            auth_type,
            throttling_tier: throttling_tier
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    /// Upper-case HTTP method, e.g. `GET`.
    #[must_use]
    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    /// Path key as written in the document.
    #[must_use]
    pub fn path_pattern(&self) -> &str {
        self.path.as_str()
    }

    /// OAuth scope a token must carry, if any.
    #[must_use]
    pub fn required_scope(&self) -> Option<&str> {
        self.required_scope.as_deref()
    }

    /// Accepted credential kinds.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    /// Throttling tier from `x-throttling-tier`, if any.
    #[must_use]
    pub fn throttling_tier(&self) -> Option<&str> {
        self.throttling_tier.as_deref()
    }

    /// Whether a request with `method` on `path` addresses this resource.
    #[must_use]
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.http_method.eq_ignore_ascii_case(method) && self.path.matches(path)
    }
}

impl fmt::Display for ProtectedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.http_method, self.path)?;
        if let Some(scope) = &self.required_scope {
            write!(f, " scope={scope}")?;
        }
        write!(f, " auth={}", self.auth_type)?;
        if let Some(tier) = &self.throttling_tier {
            write!(f, " tier={tier}")?;
        }
        Ok(())
    }
}

/// Immutable, cheaply cloned list of resources in document order.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    base_path: Option<Arc<str>>,
    resources: Arc<[ProtectedResource]>,
}

impl ResourceSet {
    /// Wrap parsed resources. A base path of `""` or `"/"` is ignored.
    #[must_use]
    pub fn new(base_path: Option<&str>, resources: Vec<ProtectedResource>) -> Self {
        let base_path = base_path
            .map(|p| p.trim_end_matches('/'))
            .filter(|p| !p.is_empty())
            .map(Arc::from);
        Self {
            base_path,
            resources: resources.into(),
        }
    }

    /// The document's `basePath`, without a trailing slash.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the set holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProtectedResource> {
        self.resources.iter()
    }

    /// Whether both handles point at the same underlying allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resources, &other.resources)
    }

    /// First resource guarding `method` on `request_path`.
    ///
    /// The query string and the base path (when the request carries it) are
    /// stripped first, as is a single trailing slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use apim_rest_openapi::{AuthType, ProtectedResource, ResourceSet};
    ///
    /// let set = ResourceSet::new(
    ///     Some("/api/am/store/v0.11"),
    ///     vec![ProtectedResource::new(
    ///         "GET", "/apis/{apiId}", Some("apim:subscribe"),
    ///         AuthType::ApplicationAndApplicationUser, None,
    ///     ).unwrap()],
    /// );
    /// let hit = set.find("get", "/api/am/store/v0.11/apis/abc?expand=true").unwrap();
    /// assert_eq!(hit.required_scope(), Some("apim:subscribe"));
    /// assert!(set.find("DELETE", "/apis/abc").is_none());
    /// ```
    #[must_use]
    pub fn find(&self, method: &str, request_path: &str) -> Option<&ProtectedResource> {
        let path = self.relative_path(request_path);
        self.resources.iter().find(|r| r.matches(method, path))
    }

    fn relative_path<'a>(&self, request_path: &'a str) -> &'a str {
        let mut path = request_path
            .split_once('?')
            .map_or(request_path, |(path, _)| path);

        if let Some(base) = self.base_path.as_deref() {
            if let Some(rest) = path.strip_prefix(base) {
                if rest.is_empty() || rest.starts_with('/') {
                    path = rest;
                }
            }
        }

        if path.is_empty() {
            return "/";
        }
        if path.len() > 1 {
            path = path.strip_suffix('/').unwrap_or(path);
        }
        path
    }
}

impl PartialEq for ResourceSet {
    fn eq(&self, other: &Self) -> bool {
        self.base_path == other.base_path && self.resources == other.resources
    }
}

impl Eq for ResourceSet {}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = &'a ProtectedResource;
    type IntoIter = std::slice::Iter<'a, ProtectedResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
