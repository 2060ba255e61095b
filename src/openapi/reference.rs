use serde::{Deserialize, Serialize};
use std::fmt;

/// The component maps a [`Reference`] can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Schemas,
    Parameters,
    RequestBodies,
    Responses,
    Callbacks,
}

impl ReferenceKind {
    /// Key of the kind under `#/components/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Schemas => "schemas",
            ReferenceKind::Parameters => "parameters",
            ReferenceKind::RequestBodies => "requestBodies",
            ReferenceKind::Responses => "responses",
            ReferenceKind::Callbacks => "callbacks",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OpenAPI Reference object (`{"$ref": "#/components/<kind>/<id>"}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl Reference {
    /// Builds a document-local reference to the component `id` of the given kind.
    pub fn new(kind: ReferenceKind, id: &str) -> Self {
        Self {
            reference: format!("#/components/{}/{}", kind, id),
        }
    }

    pub fn schema(id: &str) -> Self {
        Self::new(ReferenceKind::Schemas, id)
    }

    pub fn parameter(id: &str) -> Self {
        Self::new(ReferenceKind::Parameters, id)
    }

    pub fn request_body(id: &str) -> Self {
        Self::new(ReferenceKind::RequestBodies, id)
    }

    pub fn response(id: &str) -> Self {
        Self::new(ReferenceKind::Responses, id)
    }

    pub fn callback(id: &str) -> Self {
        Self::new(ReferenceKind::Callbacks, id)
    }
}

/// Either a reference to a component or the inline object itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(reference) => Some(reference),
            RefOr::Item(_) => None,
        }
    }
}

impl<T> From<Reference> for RefOr<T> {
    fn from(reference: Reference) -> Self {
        RefOr::Ref(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_paths() {
        assert_eq!(Reference::schema("User").reference, "#/components/schemas/User");
        assert_eq!(
            Reference::parameter("UserID").reference,
            "#/components/parameters/UserID"
        );
        assert_eq!(
            Reference::request_body("CreateUser").reference,
            "#/components/requestBodies/CreateUser"
        );
        assert_eq!(
            Reference::response("Error").reference,
            "#/components/responses/Error"
        );
        assert_eq!(
            Reference::callback("Created").reference,
            "#/components/callbacks/Created"
        );
    }

    #[test]
    fn test_reference_serializes_as_single_ref_field() {
        let value = serde_json::to_value(Reference::schema("User")).unwrap();
        assert_eq!(value, serde_json::json!({"$ref": "#/components/schemas/User"}));
    }

    #[test]
    fn test_ref_or_untagged() {
        let item: RefOr<String> = RefOr::Item("inline".to_string());
        assert_eq!(serde_json::to_value(&item).unwrap(), serde_json::json!("inline"));

        let parsed: RefOr<String> =
            serde_json::from_value(serde_json::json!({"$ref": "#/components/schemas/A"})).unwrap();
        assert_eq!(parsed.as_reference(), Some(&Reference::schema("A")));
        assert!(parsed.as_item().is_none());
    }
}
