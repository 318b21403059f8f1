//! Loop descriptor attached to a command (`for:`).
//!
//! Only the shape is decoded here; expanding a loop into iterations is
//! the execution engine's job.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use super::error::DecodeError;
use super::node::{as_mapping, field, scalar_text, text_field, untag};
use super::path::NodePath;
use crate::deepcopy::{self, DeepCopy};

/// What a command iterates over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum For {
    /// A named source of items, e.g. `sources` or `generates`.
    From(String),
    /// A literal list of items.
    List(Vec<Value>),
    /// The items of a variable, optionally split on a separator.
    Var {
        /// Variable name.
        var: String,
        /// Separator; whitespace when absent.
        #[serde(skip_serializing_if = "Option::is_none")]
        split: Option<String>,
        /// Name the current item is exposed under.
        #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
        as_name: Option<String>,
    },
    /// Every combination of the named value lists.
    Matrix(IndexMap<String, Vec<Value>>),
}

impl For {
    /// Decodes a `for:` node.
    ///
    /// # Errors
    ///
    /// Returns a decode error when a mapping names neither `var` nor
    /// `matrix`, names both, or when the node is null.
    pub fn decode(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        if let Some(from) = scalar_text(node) {
            return Ok(Self::From(from));
        }
        match untag(node) {
            Value::Sequence(items) => Ok(Self::List(items.clone())),
            Value::Mapping(_) => Self::decode_mapping(node, path),
            other => Err(DecodeError::new(path).with_type_message("for", other)),
        }
    }

    fn decode_mapping(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        let Some(map) = as_mapping(node) else {
            return Err(DecodeError::new(path).with_type_message("for", node));
        };
        let var = text_field(map, "var", path)?.filter(|v| !v.is_empty());
        let matrix = match field(map, "matrix") {
            Some(value) => decode_matrix(value, &path.key("matrix"))?,
            None => IndexMap::new(),
        };

        match (var, matrix.is_empty()) {
            (None, true) => Err(DecodeError::invalid_keys(path, "for")),
            (Some(_), false) => Err(DecodeError::new(path)
                .with_message("cannot use both var and matrix in for")),
            (Some(var), true) => Ok(Self::Var {
                var,
                split: text_field(map, "split", path)?,
                as_name: text_field(map, "as", path)?,
            }),
            (None, false) => Ok(Self::Matrix(matrix)),
        }
    }
}

fn decode_matrix(node: &Value, path: &NodePath) -> Result<IndexMap<String, Vec<Value>>, DecodeError> {
    let Some(map) = as_mapping(node) else {
        return Err(DecodeError::new(path).with_type_message("matrix", node));
    };
    let mut rows = IndexMap::new();
    for (key, value) in map {
        let Some(name) = scalar_text(key) else {
            return Err(DecodeError::new(path).with_type_message("matrix key", key));
        };
        let Value::Sequence(items) = untag(value) else {
            return Err(DecodeError::new(&path.key(&name)).with_type_message("matrix row", value));
        };
        rows.insert(name, items.clone());
    }
    Ok(rows)
}

impl DeepCopy for For {
    fn deep_copy(&self) -> Self {
        match self {
            Self::From(from) => Self::From(from.clone()),
            Self::List(items) => Self::List(deepcopy::slice(items)),
            Self::Var { var, split, as_name } => {
                Self::Var { var: var.clone(), split: split.clone(), as_name: as_name.clone() }
            }
            Self::Matrix(rows) => Self::Matrix(deepcopy::map(rows)),
        }
    }
}

impl<'de> Deserialize<'de> for For {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Self::decode(&node, &NodePath::root()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::error::DecodeErrorKind;

    fn decode(yaml: &str) -> Result<For, DecodeError> {
        let node: Value = serde_yaml::from_str(yaml).unwrap();
        For::decode(&node, &NodePath::root().key("for"))
    }

    #[test]
    fn scalar_is_a_named_source() {
        assert_eq!(decode("sources").unwrap(), For::From("sources".into()));
    }

    #[test]
    fn sequence_is_a_list() {
        let For::List(items) = decode("[a, 2, true]").unwrap() else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn var_with_split_and_alias() {
        let parsed = decode("{var: FILES, split: ',', as: FILE}").unwrap();
        assert_eq!(
            parsed,
            For::Var { var: "FILES".into(), split: Some(",".into()), as_name: Some("FILE".into()) }
        );
    }

    #[test]
    fn matrix_keeps_row_order() {
        let For::Matrix(rows) = decode("{matrix: {OS: [linux, windows], ARCH: [amd64]}}").unwrap()
        else {
            panic!("expected matrix");
        };
        let names: Vec<&str> = rows.keys().map(String::as_str).collect();
        assert_eq!(names, ["OS", "ARCH"]);
        assert_eq!(rows["OS"].len(), 2);
    }

    #[test]
    fn empty_mapping_has_invalid_keys() {
        let err = decode("{}").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidKeys);
        assert_eq!(err.to_string(), "for: invalid keys in for");
    }

    #[test]
    fn var_and_matrix_conflict() {
        let err = decode("{var: X, matrix: {A: [1]}}").unwrap_err();
        assert_eq!(err.message, "cannot use both var and matrix in for");
    }

    #[test]
    fn matrix_rows_must_be_lists() {
        let err = decode("{matrix: {OS: linux}}").unwrap_err();
        assert_eq!(err.path.to_string(), "for.matrix.OS");
    }

    #[test]
    fn null_is_a_type_mismatch() {
        let err = decode("~").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::TypeMismatch);
    }
}
