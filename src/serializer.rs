//! Serialization of the generated [`Document`] to YAML or JSON text.
//!
//! Field names, omission of empty values and key order are all carried by the
//! model's `serde` attributes; this module only picks the output format and
//! writes the result.

use crate::openapi::Document;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use openapi_from_comments::openapi::Document;
/// use openapi_from_comments::serializer::serialize_yaml;
///
/// let yaml = serialize_yaml(&Document::new()).unwrap();
/// assert!(yaml.starts_with("openapi:"));
/// ```
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes a document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{
        Method, Operation, Parameter, ParameterLocation, PathContainer, RefOr, Reference, Response,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.info.title = "Test API".to_string();
        doc.info.version = "1.0.0".to_string();

        let mut operation = Operation {
            summary: "Get User".to_string(),
            ..Operation::default()
        };
        operation.parameters.push(RefOr::Item(Parameter::new(
            "id",
            ParameterLocation::Path,
            "User ID.",
        )));
        operation.responses.insert(
            "200".to_string(),
            RefOr::Ref(Reference::response("UserResponse")),
        );
        doc.paths.set_operation("/user/{id}", Method::Get, operation);

        doc.components.responses.insert(
            "UserResponse".to_string(),
            Response {
                description: "A user.".to_string(),
                ..Response::default()
            },
        );
        doc
    }

    #[test]
    fn test_serialize_json_field_names_and_omissions() {
        let json = serialize_json(&sample_document()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            json!({
                "openapi": "3.0.0",
                "info": {"title": "Test API", "version": "1.0.0"},
                "paths": {
                    "/user/{id}": {
                        "get": {
                            "summary": "Get User",
                            "parameters": [{
                                "name": "id",
                                "in": "path",
                                "description": "User ID.",
                                "required": true
                            }],
                            "responses": {
                                "200": {"$ref": "#/components/responses/UserResponse"}
                            }
                        }
                    }
                },
                "components": {
                    "responses": {"UserResponse": {"description": "A user."}}
                }
            })
        );
    }

    #[test]
    fn test_serialize_yaml_keeps_document_key_order() {
        let yaml = serialize_yaml(&sample_document()).unwrap();

        let openapi = yaml.find("openapi:").unwrap();
        let info = yaml.find("info:").unwrap();
        let paths = yaml.find("paths:").unwrap();
        let components = yaml.find("components:").unwrap();
        assert!(openapi < info && info < paths && paths < components);

        assert!(yaml.contains("in: path"));
        assert!(yaml.contains("#/components/responses/UserResponse"));
        assert!(!yaml.contains("null"));
    }

    #[test]
    fn test_yaml_round_trips_to_same_document() {
        let doc = sample_document();
        let yaml = serialize_yaml(&doc).unwrap();
        let parsed: Document = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_write_to_file_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs/api/openapi.yaml");

        write_to_file("openapi: 3.0.0\n", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "openapi: 3.0.0\n");
    }
}
