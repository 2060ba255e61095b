use super::operation::Operation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods an operation can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    /// Method names are matched exactly (upper case), like HTTP request lines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            "HEAD" => Ok(Method::Head),
            "PATCH" => Ok(Method::Patch),
            "TRACE" => Ok(Method::Trace),
            _ => Err(s.to_string()),
        }
    }
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    fn slot(&self, method: Method) -> &Option<Operation> {
        match method {
            Method::Get => &self.get,
            Method::Put => &self.put,
            Method::Post => &self.post,
            Method::Delete => &self.delete,
            Method::Options => &self.options,
            Method::Head => &self.head,
            Method::Patch => &self.patch,
            Method::Trace => &self.trace,
        }
    }

    fn slot_mut(&mut self, method: Method) -> &mut Option<Operation> {
        match method {
            Method::Get => &mut self.get,
            Method::Put => &mut self.put,
            Method::Post => &mut self.post,
            Method::Delete => &mut self.delete,
            Method::Options => &mut self.options,
            Method::Head => &mut self.head,
            Method::Patch => &mut self.patch,
            Method::Trace => &mut self.trace,
        }
    }

    pub fn operation(&self, method: Method) -> Option<&Operation> {
        self.slot(method).as_ref()
    }

    pub fn operation_mut(&mut self, method: Method) -> Option<&mut Operation> {
        self.slot_mut(method).as_mut()
    }

    /// Stores `operation` under `method`, returning the operation it replaced.
    pub fn set_operation(&mut self, method: Method, operation: Operation) -> Option<Operation> {
        self.slot_mut(method).replace(operation)
    }
}

/// Anything that maps URL paths to path items.
///
/// The document's top-level `paths` and every callback share this behavior,
/// so an operation can be placed in either without knowing which one it is.
pub trait PathContainer {
    fn path_items(&self) -> &IndexMap<String, PathItem>;

    fn path_items_mut(&mut self) -> &mut IndexMap<String, PathItem>;

    fn path_item(&self, path: &str) -> Option<&PathItem> {
        self.path_items().get(path)
    }

    fn operation(&self, path: &str, method: Method) -> Option<&Operation> {
        self.path_item(path)?.operation(method)
    }

    fn operation_mut(&mut self, path: &str, method: Method) -> Option<&mut Operation> {
        self.path_items_mut().get_mut(path)?.operation_mut(method)
    }

    /// Places `operation` at `path`/`method`, creating the path item on first use.
    fn set_operation(&mut self, path: &str, method: Method, operation: Operation) -> Option<Operation> {
        self.path_items_mut()
            .entry(path.to_string())
            .or_default()
            .set_operation(method, operation)
    }
}

/// The document's top-level `paths` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paths {
    items: IndexMap<String, PathItem>,
}

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PathContainer for Paths {
    fn path_items(&self) -> &IndexMap<String, PathItem> {
        &self.items
    }

    fn path_items_mut(&mut self) -> &mut IndexMap<String, PathItem> {
        &mut self.items
    }
}

/// OpenAPI Callback object: expression-keyed path items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Callback {
    items: IndexMap<String, PathItem>,
}

impl Callback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathContainer for Callback {
    fn path_items(&self) -> &IndexMap<String, PathItem> {
        &self.items
    }

    fn path_items_mut(&mut self) -> &mut IndexMap<String, PathItem> {
        &mut self.items
    }
}
