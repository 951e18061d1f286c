// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Declaration Invariants
//!
//! Field accessors for raw cloud-config declarations. Every accessor is a
//! pure function over a JSON object and returns a detailed
//! [`TopologyError`] naming the field, where it was found and what shape
//! was expected.
//!
//! # Rules
//!
//! - A *required* field that is absent fails `MissingField`
//! - A field that is present with the wrong shape fails `InvalidType`
//! - An explicit `null` counts as present for strings, so `az: ~` is an
//!   `InvalidType` rather than an omission
//! - `cloud_properties` follows the same rule: `cloud_properties: ~` is an
//!   `InvalidType`, only an absent key defaults to `{}`
//! - Lists treat `null` as absent and fall back to their defaults

use serde_json::{Map, Value};

use crate::errors::{TopologyError, TopologyResult};

/// Raw declaration object (one zone, network or subnet entry)
pub type Declaration = Map<String, Value>;

/// Opaque, cloud-specific properties passed through untouched
pub type CloudProperties = Map<String, Value>;

/// Human readable name of a JSON value's shape
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

fn invalid_type(field: &str, context: &str, expected: &'static str, value: &Value) -> TopologyError {
    TopologyError::InvalidType {
        field: field.to_string(),
        context: context.to_string(),
        expected,
        actual: value_kind(value).to_string(),
    }
}

/// Interpret a declaration entry as an object
pub fn require_map<'a>(value: &'a Value, field: &str, context: &str) -> TopologyResult<&'a Declaration> {
    value
        .as_object()
        .ok_or_else(|| invalid_type(field, context, "a map", value))
}

/// Required string field
pub fn required_string(declaration: &Declaration, field: &str, context: &str) -> TopologyResult<String> {
    match declaration.get(field) {
        None => Err(TopologyError::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        }),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(invalid_type(field, context, "a string", other)),
    }
}

/// Required string field that must not be empty
pub fn required_name(declaration: &Declaration, field: &str, context: &str) -> TopologyResult<String> {
    let value = required_string(declaration, field, context)?;
    if value.is_empty() {
        return Err(TopologyError::InvalidType {
            field: field.to_string(),
            context: context.to_string(),
            expected: "a non-empty string",
            actual: "empty string".to_string(),
        });
    }
    Ok(value)
}

/// Optional string field; `null` is a type error
pub fn optional_string(
    declaration: &Declaration,
    field: &str,
    context: &str,
) -> TopologyResult<Option<String>> {
    match declaration.get(field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(invalid_type(field, context, "a string", other)),
    }
}

/// Optional list field; absent and `null` yield `None`
pub fn optional_list<'a>(
    declaration: &'a Declaration,
    field: &str,
    context: &str,
) -> TopologyResult<Option<&'a Vec<Value>>> {
    match declaration.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => Ok(Some(values)),
        Some(other) => Err(invalid_type(field, context, "a list", other)),
    }
}

/// List of strings
pub fn string_list(values: &[Value], field: &str, context: &str) -> TopologyResult<Vec<String>> {
    values
        .iter()
        .map(|value| match value {
            Value::String(text) => Ok(text.clone()),
            other => Err(invalid_type(field, context, "a list of strings", other)),
        })
        .collect()
}

/// A single string or a list of strings; absent and `null` yield an empty list
pub fn string_or_list(declaration: &Declaration, field: &str, context: &str) -> TopologyResult<Vec<String>> {
    match declaration.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(value)) => Ok(vec![value.clone()]),
        Some(Value::Array(values)) => string_list(values, field, context),
        Some(other) => Err(invalid_type(field, context, "a string or a list of strings", other)),
    }
}

/// `cloud_properties` map, defaulting to `{}` when absent; `null` is a type error
pub fn cloud_properties(declaration: &Declaration, context: &str) -> TopologyResult<CloudProperties> {
    match declaration.get("cloud_properties") {
        None => Ok(CloudProperties::new()),
        Some(Value::Object(properties)) => Ok(properties.clone()),
        Some(other) => Err(invalid_type("cloud_properties", context, "a map", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declaration(value: Value) -> Declaration {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_string() {
        let decl = declaration(json!({"name": "z1", "count": 3}));

        assert_eq!(required_string(&decl, "name", "zone").unwrap(), "z1");
        assert!(matches!(
            required_string(&decl, "missing", "zone"),
            Err(TopologyError::MissingField { .. })
        ));
        assert!(matches!(
            required_string(&decl, "count", "zone"),
            Err(TopologyError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_required_name_rejects_empty() {
        let decl = declaration(json!({"name": ""}));
        assert!(matches!(
            required_name(&decl, "name", "zone"),
            Err(TopologyError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_optional_string_null_is_invalid() {
        let decl = declaration(json!({"az": null}));
        assert!(matches!(
            optional_string(&decl, "az", "subnet"),
            Err(TopologyError::InvalidType { .. })
        ));
        assert_eq!(optional_string(&decl, "cpi", "subnet").unwrap(), None);
    }

    #[test]
    fn test_string_or_list() {
        let decl = declaration(json!({
            "one": "10.0.0.1",
            "many": ["10.0.0.1", "10.0.0.2"],
            "bad": [1, 2],
        }));

        assert_eq!(string_or_list(&decl, "one", "subnet").unwrap(), vec!["10.0.0.1"]);
        assert_eq!(string_or_list(&decl, "many", "subnet").unwrap().len(), 2);
        assert!(string_or_list(&decl, "absent", "subnet").unwrap().is_empty());
        assert!(string_or_list(&decl, "bad", "subnet").is_err());
    }

    #[test]
    fn test_cloud_properties_defaults_and_type() {
        let empty = declaration(json!({}));
        assert!(cloud_properties(&empty, "zone").unwrap().is_empty());

        let valid = declaration(json!({"cloud_properties": {"foo": "bar"}}));
        assert_eq!(cloud_properties(&valid, "zone").unwrap()["foo"], json!("bar"));

        let invalid = declaration(json!({"cloud_properties": "not_hash"}));
        let err = cloud_properties(&invalid, "zone").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Property 'cloud_properties' in zone must be a map, got string"
        );
    }

    #[test]
    fn test_cloud_properties_null_is_invalid() {
        let null = declaration(json!({"cloud_properties": null}));
        assert_eq!(
            cloud_properties(&null, "zone").unwrap_err().to_string(),
            "Property 'cloud_properties' in zone must be a map, got null"
        );
    }
}
