//! In-memory model of the generated OpenAPI 3.0 document.
//!
//! The types mirror the OpenAPI object names and serialize with `serde` using the
//! literal OpenAPI field names. Empty strings, empty collections and absent values
//! are omitted from the output rather than written as `null` or `{}`; the few
//! fields OpenAPI requires (`openapi`, `info.title`, `paths`, `responses`,
//! `content`, `description` on responses) are always written.
//!
//! Maps are [`IndexMap`]s so the output keeps the order in which annotations
//! were processed.

pub mod components;
pub mod operation;
pub mod paths;
pub mod reference;
pub mod security;

pub use components::Components;
pub use operation::{
    Example, HasContent, MediaType, Operation, Parameter, ParameterLocation, RequestBody,
    Response, Schema, JSON_MEDIA_TYPE,
};
pub use paths::{Callback, Method, PathContainer, PathItem, Paths};
pub use reference::{RefOr, Reference, ReferenceKind};
pub use security::{ApiKeyLocation, SecurityRequirement, SecurityScheme};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// OpenAPI specification version written to every document.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info::default(),
            servers: Vec::new(),
            paths: Paths::new(),
            components: Components::default(),
            security: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// OpenAPI Info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

/// OpenAPI Server object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

/// Substitution variable of a server URL template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    pub default: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// OpenAPI Tag object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}
