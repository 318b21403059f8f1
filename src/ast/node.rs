//! Field access helpers over generically parsed YAML nodes.
//!
//! Every sub-decoder reads mapping fields the same way: absent and null
//! fields mean "zero value", scalars coerce to text, and anything else is
//! reported against the field's own path.

use serde_yaml::{Mapping, Value};

use super::error::DecodeError;
use super::path::NodePath;

/// Strips YAML tags, returning the underlying value.
#[must_use]
pub fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Textual form of a scalar node; `None` for null, sequences and mappings.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns `true` when the node is a scalar (null excluded).
#[must_use]
pub fn is_scalar(value: &Value) -> bool {
    scalar_text(value).is_some()
}

/// Returns the mapping behind a node, if it is one.
#[must_use]
pub fn as_mapping(value: &Value) -> Option<&Mapping> {
    match untag(value) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}

/// Looks up `key` in `map`, treating an explicit null like an absent key.
#[must_use]
pub fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).map(untag).filter(|v| !v.is_null())
}

/// Non-empty scalar text stored under `key`.
#[must_use]
pub fn marker_text(map: &Mapping, key: &str) -> Option<String> {
    field(map, key).and_then(scalar_text).filter(|s| !s.is_empty())
}

/// Decodes an optional boolean field; absent means `false`.
///
/// # Errors
///
/// Returns a decode error when the field holds anything but a boolean.
pub fn bool_field(map: &Mapping, key: &str, path: &NodePath) -> Result<bool, DecodeError> {
    let Some(value) = field(map, key) else {
        return Ok(false);
    };
    serde_yaml::from_value::<bool>(value.clone()).map_err(|e| {
        DecodeError::new(&path.key(key)).with_type_message("bool", value).with_cause(e)
    })
}

/// Decodes an optional text field.
///
/// # Errors
///
/// Returns a decode error when the field is not a scalar.
pub fn text_field(map: &Mapping, key: &str, path: &NodePath) -> Result<Option<String>, DecodeError> {
    match field(map, key) {
        None => Ok(None),
        Some(value) => scalar_text(value)
            .map(Some)
            .ok_or_else(|| DecodeError::new(&path.key(key)).with_type_message("string", value)),
    }
}

/// Decodes an optional list of strings; absent means empty.
///
/// # Errors
///
/// Returns a decode error when the field is not a sequence of scalars.
pub fn string_list_field(
    map: &Mapping,
    key: &str,
    path: &NodePath,
) -> Result<Vec<String>, DecodeError> {
    let Some(value) = field(map, key) else {
        return Ok(Vec::new());
    };
    let field_path = path.key(key);
    let Value::Sequence(items) = value else {
        return Err(DecodeError::new(&field_path).with_type_message("[]string", value));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            scalar_text(item).ok_or_else(|| {
                DecodeError::new(&field_path.index(i)).with_type_message("string", item)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::error::DecodeErrorKind;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn scalar_text_coerces_numbers_and_bools() {
        assert_eq!(scalar_text(&serde_yaml::from_str("42").unwrap()), Some("42".into()));
        assert_eq!(scalar_text(&Value::Bool(false)), Some("false".into()));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&serde_yaml::from_str("[1]").unwrap()), None);
    }

    #[test]
    fn tagged_scalars_are_unwrapped() {
        let value: Value = serde_yaml::from_str("!custom echo").unwrap();
        assert_eq!(scalar_text(&value), Some("echo".into()));
    }

    #[test]
    fn marker_text_ignores_empty_and_null() {
        let map = mapping("{a: '', b: ~, c: x}");
        assert_eq!(marker_text(&map, "a"), None);
        assert_eq!(marker_text(&map, "b"), None);
        assert_eq!(marker_text(&map, "c"), Some("x".into()));
        assert_eq!(marker_text(&map, "missing"), None);
    }

    #[test]
    fn bool_field_rejects_strings_with_cause() {
        use std::error::Error as _;

        let map = mapping("{silent: maybe}");
        let err = bool_field(&map, "silent", &NodePath::root()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TypeMismatch);
        assert_eq!(err.path.to_string(), "silent");
        assert!(err.source().is_some());
    }

    #[test]
    fn string_list_reports_offending_index() {
        let map = mapping("{set: [errexit, [nested]]}");
        let err = string_list_field(&map, "set", &NodePath::root()).unwrap_err();
        assert_eq!(err.path.to_string(), "set[1]");
    }

    #[test]
    fn string_list_defaults_to_empty() {
        let map = mapping("{set: ~}");
        assert!(string_list_field(&map, "set", &NodePath::root()).unwrap().is_empty());
    }
}
