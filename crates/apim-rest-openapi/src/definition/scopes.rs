//! OAuth scope declarations carried in the `x-wso2-security` extension.
//!
//! ```yaml
//! x-wso2-security:
//!   apim:
//!     x-wso2-scopes:
//!       - name: apim:api_view
//!         description: View API
//!         key: apim:api_view
//!         roles: admin,Internal/creator
//! ```

use serde::Deserialize;
use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};

/// Role assigned to a scope that lists none.
pub const DEFAULT_SCOPE_ROLE: &str = "Internal/everyone";

/// One declared scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDefinition {
    /// Scope key referenced by `x-scope` (e.g. `apim:api_view`).
    pub key: String,
    /// Display name; the key when the document omits it.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Roles allowed to request the scope.
    pub roles: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScope {
    key: Option<String>,
    name: Option<String>,
    description: Option<String>,
    roles: Option<String>,
}

impl RawScope {
    fn into_definition(self) -> Option<ScopeDefinition> {
        let key = self.key.filter(|k| !k.is_empty())?;
        let mut roles: Vec<String> = self
            .roles
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        if roles.is_empty() {
            roles.push(DEFAULT_SCOPE_ROLE.to_string());
        }

        Some(ScopeDefinition {
            name: self.name.unwrap_or_else(|| key.clone()),
            key,
            description: self.description.unwrap_or_default(),
            roles,
        })
    }
}

/// Collect scopes from every security block under `x-wso2-security`, in
/// document order. Entries without a key are skipped.
pub fn collect_scopes(root: &Mapping) -> Result<Vec<ScopeDefinition>> {
    let Some(security) = root.get("x-wso2-security").and_then(Value::as_mapping) else {
        return Ok(Vec::new());
    };

    let mut scopes = Vec::new();
    for (block_name, block) in security.iter() {
        let Some(declared) = block.as_mapping().and_then(|b| b.get("x-wso2-scopes")) else {
            continue;
        };
        let raw: Vec<RawScope> =
            serde_yaml_ng::from_value(declared.clone()).map_err(|e| Error::MalformedDefinition {
                reason: format!(
                    "invalid x-wso2-scopes in security block '{}': {e}",
                    block_name.as_str().unwrap_or("?")
                ),
            })?;
        scopes.extend(raw.into_iter().filter_map(RawScope::into_definition));
    }
    Ok(scopes)
}
