//! Runtime types used by management REST handlers.
//!
//! - [`RestError`]: structured JSON error responses
//! - [`RequestContext`]: caller identity and requested tenant
//! - [`validate_user_tenant`] / [`check_allowed_method`]: request-level checks
//! - [`bearer_token`] / [`extract_access_token`]: access token from request headers
//! - [`error_kind_to_http_status`]: maps classified errors to HTTP status codes
//! - [`kind_for_grpc_code`]: maps backend gRPC codes to error kinds

mod access;
mod context;
mod error;
mod status_map;

pub use access::{
    bearer_token, check_allowed_method, extract_access_token, validate_user_tenant, BEARER_PREFIX,
    READ_ONLY_RESOURCES,
};
pub use context::{
    provider_tenant_domain, tenant_domain_of, RequestContext, REQUESTED_TENANT_HEADER,
    SUPER_TENANT_DOMAIN,
};
pub use error::{ErrorDto, ErrorListItemDto, RestError};
pub use status_map::{default_message, error_kind_to_http_status, kind_for_grpc_code};
