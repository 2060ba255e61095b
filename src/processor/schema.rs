use crate::openapi::Reference;
use serde_json::{Map, Value};

/// Rewrites shorthand schema references throughout a JSON tree.
///
/// Any object whose only field is `"$ref": "#<Name>"` becomes a reference to
/// `#/components/schemas/<Name>`. Everything else is copied unchanged, keeping
/// object key order.
pub fn translate_schema_refs(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(translate_schema_object(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(translate_schema_refs).collect()),
        other => other,
    }
}

/// [`translate_schema_refs`] for a JSON object.
pub fn translate_schema_object(map: Map<String, Value>) -> Map<String, Value> {
    if let Some(id) = shorthand_ref(&map) {
        let mut reference = Map::new();
        reference.insert(
            "$ref".to_string(),
            Value::String(Reference::schema(id).reference),
        );
        return reference;
    }
    map.into_iter()
        .map(|(key, value)| (key, translate_schema_refs(value)))
        .collect()
}

fn shorthand_ref(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    let id = map.get("$ref")?.as_str()?.strip_prefix('#')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
