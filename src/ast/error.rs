//! Decode errors for configuration nodes.

use serde_yaml::Value;
use thiserror::Error;

use super::path::NodePath;

/// Broad category of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The node kind cannot represent the expected type.
    TypeMismatch,
    /// A mapping carried none of the keys that identify a legal shape.
    InvalidKeys,
    /// The node had the right kind but an unacceptable value.
    InvalidValue,
}

/// A configuration node that could not be decoded.
///
/// Carries the identity of the offending node, a human-readable message
/// and, when one exists, the lower-level error that caused it.
#[derive(Debug, Error)]
#[error("{path}: {message}")]
pub struct DecodeError {
    /// Where the node sits in the document.
    pub path: NodePath,
    /// Failure category.
    pub kind: DecodeErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Underlying structural cause.
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DecodeError {
    /// Creates a generic decode failure for the node at `path`.
    #[must_use]
    pub fn new(path: &NodePath) -> Self {
        Self {
            path: path.clone(),
            kind: DecodeErrorKind::InvalidValue,
            message: "failed to decode node".to_string(),
            cause: None,
        }
    }

    /// Replaces the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Marks the failure as a mapping with no recognised keys.
    #[must_use]
    pub fn invalid_keys(path: &NodePath, what: &str) -> Self {
        let mut err = Self::new(path).with_message(format!("invalid keys in {what}"));
        err.kind = DecodeErrorKind::InvalidKeys;
        err
    }

    /// Reports that `found` cannot be decoded as `expected`.
    #[must_use]
    pub fn with_type_message(mut self, expected: &str, found: &Value) -> Self {
        self.kind = DecodeErrorKind::TypeMismatch;
        self.message = format!("cannot unmarshal {} into {expected}", short_tag(found));
        self
    }

    /// Attaches the lower-level error that triggered this one.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// The YAML short tag naming a node's kind, e.g. `!!seq`.
#[must_use]
pub fn short_tag(value: &Value) -> String {
    match value {
        Value::Null => "!!null".to_string(),
        Value::Bool(_) => "!!bool".to_string(),
        Value::Number(n) if n.is_f64() => "!!float".to_string(),
        Value::Number(_) => "!!int".to_string(),
        Value::String(_) => "!!str".to_string(),
        Value::Sequence(_) => "!!seq".to_string(),
        Value::Mapping(_) => "!!map".to_string(),
        Value::Tagged(tagged) => tagged.tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_message_names_short_tag() {
        let node: Value = serde_yaml::from_str("[a, b]").unwrap();
        let err = DecodeError::new(&NodePath::root().key("cmds").index(0))
            .with_type_message("command", &node);

        assert_eq!(err.kind, DecodeErrorKind::TypeMismatch);
        assert_eq!(err.to_string(), "cmds[0]: cannot unmarshal !!seq into command");
    }

    #[test]
    fn invalid_keys_sets_kind() {
        let err = DecodeError::invalid_keys(&NodePath::root(), "command");
        assert_eq!(err.kind, DecodeErrorKind::InvalidKeys);
        assert_eq!(err.to_string(), "<root>: invalid keys in command");
    }

    #[test]
    fn cause_is_exposed_as_source() {
        use std::error::Error as _;

        let cause = serde_yaml::from_str::<bool>("maybe").unwrap_err();
        let err = DecodeError::new(&NodePath::root().key("silent")).with_cause(cause);
        assert!(err.source().is_some());
    }

    #[test]
    fn short_tags_cover_scalar_kinds() {
        assert_eq!(short_tag(&Value::Null), "!!null");
        assert_eq!(short_tag(&Value::Bool(true)), "!!bool");
        assert_eq!(short_tag(&serde_yaml::from_str::<Value>("1.5").unwrap()), "!!float");
        assert_eq!(short_tag(&serde_yaml::from_str::<Value>("7").unwrap()), "!!int");
        assert_eq!(short_tag(&Value::String("x".into())), "!!str");
    }
}
