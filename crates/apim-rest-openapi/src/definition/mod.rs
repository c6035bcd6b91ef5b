//! Definition-document parsing.
//!
//! A [`DefinitionParser`] turns the raw bytes of a management API's
//! description document into a [`ResourceSet`]. [`Swagger2Parser`] reads the
//! vendor extensions used by Swagger 2.0 documents:
//!
//! | Extension | Level | Meaning |
//! |-----------|-------|---------|
//! | `x-scope` | operation | OAuth scope required to call it |
//! | `x-auth-type` | operation | accepted token kinds ([`AuthType`]) |
//! | `x-throttling-tier` | operation | rate-limit tier name |
//! | `x-wso2-security` | root | scope declarations ([`ScopeDefinition`]) |

mod helpers;
mod scopes;

pub use helpers::HTTP_METHODS;
pub use scopes::{ScopeDefinition, DEFAULT_SCOPE_ROLE};

use crate::error::Result;
use crate::resource::{AuthType, ProtectedResource, ResourceSet};

use helpers::{for_each_operation, parse_document, paths_mapping, root_mapping, str_field};

/// Extracts protected resources from a definition document.
pub trait DefinitionParser: Send + Sync {
    /// Parse `document` into its resources, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be decoded or lacks the
    /// expected structure.
    fn parse(&self, document: &[u8]) -> Result<ResourceSet>;

    /// Scope declarations of `document`. Parsers without a scope notion
    /// report none.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be decoded.
    fn scopes(&self, document: &[u8]) -> Result<Vec<ScopeDefinition>> {
        let _ = document;
        Ok(Vec::new())
    }
}

/// Parser for Swagger 2.0 documents in JSON or YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swagger2Parser;

impl DefinitionParser for Swagger2Parser {
    fn parse(&self, document: &[u8]) -> Result<ResourceSet> {
        let doc = parse_document(document)?;
        let root = root_mapping(&doc)?;
        let base_path = str_field(root, "basePath");

        let Some(paths) = paths_mapping(root)? else {
            return Ok(ResourceSet::new(base_path, Vec::new()));
        };

        let mut resources = Vec::new();
        let mut failure = None;
        for_each_operation(paths, |path, method, op| {
            if failure.is_some() {
                return;
            }
            let built = ProtectedResource::new(
                method,
                path,
                str_field(op, "x-scope"),
                AuthType::from_label(str_field(op, "x-auth-type")),
                str_field(op, "x-throttling-tier"),
            );
            match built {
                Ok(resource) => resources.push(resource),
                Err(e) => failure = Some(e),
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }

        tracing::debug!(
            resources = resources.len(),
            base_path = base_path.unwrap_or_default(),
            "parsed definition document"
        );
        Ok(ResourceSet::new(base_path, resources))
    }

    fn scopes(&self, document: &[u8]) -> Result<Vec<ScopeDefinition>> {
        let doc = parse_document(document)?;
        scopes::collect_scopes(root_mapping(&doc)?)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;

    const PETS: &str = indoc! {r#"
        swagger: "2.0"
        basePath: /api/am/store/v0.11
        paths:
          /apis:
            parameters:
              - name: limit
                in: query
            get:
              x-scope: apim:subscribe
              x-auth-type: Application & Application User
              x-throttling-tier: Unlimited
          /apis/{apiId}:
            get:
              x-auth-type: None
            delete:
              x-scope: apim:api_delete
              x-auth-type: Application User
              x-throttling-tier: Gold
    "#};

    fn summary(set: &ResourceSet) -> Vec<String> {
        set.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn extracts_operations_in_order() {
        let set = Swagger2Parser.parse(PETS.as_bytes()).unwrap();
        assert_eq!(set.base_path(), Some("/api/am/store/v0.11"));
        assert_eq!(
            summary(&set),
            vec![
                "GET /apis scope=apim:subscribe auth=Application & Application User tier=Unlimited",
                "GET /apis/{apiId} auth=None",
                "DELETE /apis/{apiId} scope=apim:api_delete auth=Application User tier=Gold",
            ]
        );
    }

    #[test]
    fn json_document() {
        let json = r#"{
            "swagger": "2.0",
            "paths": {
                "/subscriptions": {
                    "post": { "x-scope": "apim:subscribe", "x-auth-type": "Application" }
                }
            }
        }"#;
        let set = Swagger2Parser.parse(json.as_bytes()).unwrap();
        assert_eq!(set.base_path(), None);
        assert_eq!(
            summary(&set),
            vec!["POST /subscriptions scope=apim:subscribe auth=Application"]
        );
    }

    #[test]
    fn no_paths_is_empty() {
        let set = Swagger2Parser
            .parse(b"swagger: '2.0'\nbasePath: /x\n")
            .unwrap();
        assert!(set.is_empty());
        assert_eq!(set.base_path(), Some("/x"));

        let set = Swagger2Parser.parse(b"swagger: '2.0'\npaths: {}\n").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_documents() {
        for doc in ["just a string", "paths: [1, 2]", "paths: [[[invalid"] {
            assert!(Swagger2Parser.parse(doc.as_bytes()).is_err(), "{doc}");
        }
        assert!(matches!(
            Swagger2Parser.parse(b"42"),
            Err(Error::MalformedDefinition { .. })
        ));
    }

    #[test]
    fn scopes_via_parser() {
        let doc = indoc! {"
            x-wso2-security:
              apim:
                x-wso2-scopes:
                  - key: apim:api_view
                    name: apim:api_view
                    description: View API
                    roles: Internal/everyone
        "};
        let scopes = Swagger2Parser.scopes(doc.as_bytes()).unwrap();
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].key, "apim:api_view");
        assert_eq!(scopes[0].roles, vec![DEFAULT_SCOPE_ROLE]);
    }
}
