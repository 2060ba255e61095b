use super::paths::Callback;
use super::reference::RefOr;
use super::security::SecurityRequirement;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The only media type annotations populate.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A schema is an opaque JSON tree, or a reference to a schema component.
pub type Schema = RefOr<Value>;

fn is_false(value: &bool) -> bool {
    !*value
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "operationId", default, skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<RefOr<Parameter>>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, RefOr<Callback>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

/// Where a parameter is read from in an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ParameterLocation::Query),
            "header" => Ok(ParameterLocation::Header),
            "path" => Ok(ParameterLocation::Path),
            "cookie" => Ok(ParameterLocation::Cookie),
            _ => Err(s.to_string()),
        }
    }
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

impl Parameter {
    /// Creates a parameter; path parameters are always required.
    pub fn new(name: &str, location: ParameterLocation, description: &str) -> Self {
        Self {
            name: name.to_string(),
            location,
            description: description.to_string(),
            required: location == ParameterLocation::Path,
            schema: None,
            examples: IndexMap::new(),
        }
    }
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
}

/// OpenAPI Response object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, Example>,
}

/// OpenAPI Example object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
}

/// Objects carrying a media-type keyed `content` map.
pub trait HasContent {
    fn content_mut(&mut self) -> &mut IndexMap<String, MediaType>;

    /// The `application/json` entry, created empty on first use.
    fn json_media_type_mut(&mut self) -> &mut MediaType {
        self.content_mut()
            .entry(JSON_MEDIA_TYPE.to_string())
            .or_default()
    }
}

impl HasContent for RequestBody {
    fn content_mut(&mut self) -> &mut IndexMap<String, MediaType> {
        &mut self.content
    }
}

impl HasContent for Response {
    fn content_mut(&mut self) -> &mut IndexMap<String, MediaType> {
        &mut self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_parameter_is_required() {
        assert!(Parameter::new("id", ParameterLocation::Path, "").required);
        assert!(!Parameter::new("q", ParameterLocation::Query, "").required);
        assert!(!Parameter::new("X-Trace", ParameterLocation::Header, "").required);
        assert!(!Parameter::new("session", ParameterLocation::Cookie, "").required);
    }

    #[test]
    fn test_parameter_location_parsing() {
        assert_eq!("cookie".parse::<ParameterLocation>(), Ok(ParameterLocation::Cookie));
        assert!("body".parse::<ParameterLocation>().is_err());
        assert!("Query".parse::<ParameterLocation>().is_err());
        assert_eq!(ParameterLocation::Path.to_string(), "path");
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let value = serde_json::to_value(Operation::default()).unwrap();
        assert_eq!(value, json!({"responses": {}}));

        let value = serde_json::to_value(Parameter::new("q", ParameterLocation::Query, "")).unwrap();
        assert_eq!(value, json!({"name": "q", "in": "query"}));

        let value = serde_json::to_value(RequestBody::default()).unwrap();
        assert_eq!(value, json!({"content": {}}));

        let value = serde_json::to_value(Response::default()).unwrap();
        assert_eq!(value, json!({"description": ""}));
    }

    #[test]
    fn test_json_media_type_created_once() {
        let mut response = Response::default();
        response.json_media_type_mut().schema = Some(RefOr::Item(json!({"type": "string"})));
        response.json_media_type_mut().examples.insert(
            "A".to_string(),
            Example {
                summary: "a".to_string(),
                value: json!(1),
                ..Example::default()
            },
        );

        assert_eq!(response.content.len(), 1);
        let media = &response.content[JSON_MEDIA_TYPE];
        assert!(media.schema.is_some());
        assert_eq!(media.examples.len(), 1);
    }

    #[test]
    fn test_operation_id_and_example_description_field_names() {
        let operation = Operation {
            summary: "Get User".to_string(),
            operation_id: "getUser".to_string(),
            ..Operation::default()
        };
        assert_eq!(
            serde_json::to_value(&operation).unwrap(),
            json!({"summary": "Get User", "operationId": "getUser", "responses": {}})
        );

        let example = Example {
            summary: "a".to_string(),
            description: "First example.".to_string(),
            value: json!(1),
        };
        assert_eq!(
            serde_json::to_value(&example).unwrap(),
            json!({"summary": "a", "description": "First example.", "value": 1})
        );
    }
}
