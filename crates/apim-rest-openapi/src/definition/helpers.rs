//! Read-only YAML helpers shared by the definition parsers.

use serde_yaml_ng::{Mapping, Value};

use crate::error::{Error, Result};

/// Known HTTP methods per the Swagger/OpenAPI specification.
///
/// Path items can also contain `parameters`, `summary` and vendor extensions;
/// those are skipped so callbacks only receive actual operations.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Decode a definition document.
///
/// Input whose first non-blank byte is `{` is read as JSON, anything else as
/// YAML. Both land in the same [`Value`] tree with key order preserved.
pub fn parse_document(bytes: &[u8]) -> Result<Value> {
    let first = bytes.iter().copied().find(|b| !b.is_ascii_whitespace());
    if first == Some(b'{') {
        return Ok(serde_json::from_slice::<Value>(bytes)?);
    }

    let text = std::str::from_utf8(bytes).map_err(|e| Error::MalformedDefinition {
        reason: format!("document is not valid UTF-8: {e}"),
    })?;
    Ok(serde_yaml_ng::from_str::<Value>(text)?)
}

/// The document root as a mapping.
pub fn root_mapping(doc: &Value) -> Result<&Mapping> {
    doc.as_mapping().ok_or_else(|| Error::MalformedDefinition {
        reason: "document root is not a mapping".to_string(),
    })
}

/// The `paths` mapping, `None` when the document declares no paths.
pub fn paths_mapping(root: &Mapping) -> Result<Option<&Mapping>> {
    match root.get("paths") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(paths)) => Ok(Some(paths)),
        Some(_) => Err(Error::MalformedDefinition {
            reason: "'paths' is not a mapping".to_string(),
        }),
    }
}

/// Iterate over all operations in `paths`, calling `f(path, method, operation_map)`
/// in document order.
///
/// Only iterates HTTP method keys (`get`, `post`, etc.), skipping path-level
/// metadata keys like `parameters`. Path items that are not mappings are skipped.
pub fn for_each_operation(paths: &Mapping, mut f: impl FnMut(&str, &str, &Mapping)) {
    for (path_key, path_item) in paths.iter() {
        let Some(path_str) = path_key.as_str() else {
            continue;
        };
        let Some(path_map) = path_item.as_mapping() else {
            tracing::debug!(path = path_str, "skipping path item that is not a mapping");
            continue;
        };

        for (method_key, operation) in path_map.iter() {
            let method_str = method_key.as_str().unwrap_or_default();
            if !HTTP_METHODS.contains(&method_str) {
                continue;
            }
            let Some(op_map) = operation.as_mapping() else {
                continue;
            };
            f(path_str, method_str, op_map);
        }
    }
}

/// String value of `key` in `map`, if present and a string.
pub fn str_field<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_and_yaml_decode_alike() {
        let json = br#" {"swagger": "2.0", "paths": {"/b": {}, "/a": {}}}"#;
        let yaml = b"swagger: '2.0'\npaths:\n  /b: {}\n  /a: {}\n";

        let from_json = parse_document(json).unwrap();
        let from_yaml = parse_document(yaml).unwrap();
        assert_eq!(from_json, from_yaml);

        let paths = paths_mapping(root_mapping(&from_json).unwrap())
            .unwrap()
            .unwrap();
        let keys: Vec<_> = paths.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["/b", "/a"]);
    }

    #[test]
    fn structure_checks() {
        let doc = parse_document(b"- just\n- a list\n").unwrap();
        assert!(matches!(
            root_mapping(&doc),
            Err(Error::MalformedDefinition { .. })
        ));

        let doc = parse_document(b"paths: 42\n").unwrap();
        let root = root_mapping(&doc).unwrap();
        assert!(matches!(
            paths_mapping(root),
            Err(Error::MalformedDefinition { .. })
        ));

        let doc = parse_document(b"swagger: '2.0'\n").unwrap();
        assert!(paths_mapping(root_mapping(&doc).unwrap()).unwrap().is_none());
    }

    #[test]
    fn only_http_methods_are_visited() {
        let doc = parse_document(
            b"paths:\n  /apis:\n    parameters: []\n    x-note: hi\n    get: {}\n    post: {}\n  /skip: 7\n",
        )
        .unwrap();
        let paths = paths_mapping(root_mapping(&doc).unwrap()).unwrap().unwrap();

        let mut seen = Vec::new();
        for_each_operation(paths, |path, method, _| seen.push(format!("{method} {path}")));
        assert_eq!(seen, ["get /apis", "post /apis"]);
    }

    #[test]
    fn invalid_syntax_is_an_error() {
        assert!(matches!(
            parse_document(b"paths: [[[invalid"),
            Err(Error::Yaml(_))
        ));
        assert!(matches!(parse_document(b"{\"paths\": "), Err(Error::Json(_))));
    }
}
