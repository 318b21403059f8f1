//! Nested task-call object, as written under `defer:`.

use serde::Serialize;
use serde_yaml::Value;

use super::error::DecodeError;
use super::node::{as_mapping, bool_field, field, marker_text};
use super::path::NodePath;
use super::vars::Vars;

/// A call to another task with optional variable overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Call {
    /// Name of the called task.
    pub task: String,
    /// Variables passed to the called task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vars: Option<Vars>,
    /// Suppress echoing of the called task's commands.
    pub silent: bool,
}

impl Call {
    /// Returns `true` when `node` is a mapping naming a non-empty task.
    #[must_use]
    pub fn is_call(node: &Value) -> bool {
        as_mapping(node).and_then(|map| marker_text(map, "task")).is_some()
    }

    /// Decodes a call mapping.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the node is not a mapping with a task
    /// name, or when `vars` or `silent` are malformed.
    pub fn decode(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        let Some(map) = as_mapping(node) else {
            return Err(DecodeError::new(path).with_type_message("call", node));
        };
        let Some(task) = marker_text(map, "task") else {
            return Err(DecodeError::invalid_keys(path, "call"));
        };
        let vars = field(map, "vars").map(|v| Vars::decode(v, &path.key("vars"))).transpose()?;
        let silent = bool_field(map, "silent", path)?;
        Ok(Self { task, vars, silent })
    }
}
