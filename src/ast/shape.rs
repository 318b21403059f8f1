//! The legal shapes of a command node and the order they are tried in.
//!
//! Every field of every mapping shape is optional, so a mapping would
//! structurally fit any of them. The shape is picked by probing a marker
//! field instead: the first entry of [`SHAPES`] whose probe holds wins,
//! even when a later entry would also fit.

use std::sync::Arc;

use serde_yaml::Value;

use super::call::Call;
use super::error::DecodeError;
use super::for_loop::For;
use super::node::{
    as_mapping, bool_field, field, is_scalar, marker_text, scalar_text, string_list_field,
};
use super::path::NodePath;
use super::platform::{decode_platforms, Platform};
use super::vars::Vars;

/// A command node after shape disambiguation.
#[derive(Debug, Clone, PartialEq)]
pub enum CmdShape {
    /// A bare string: `- echo hi`.
    Literal(String),
    /// `{cmd: ..., ...}` with execution options.
    Command {
        /// Shell text.
        cmd: String,
        /// Loop descriptor.
        for_loop: Option<For>,
        /// Suppress echoing.
        silent: bool,
        /// `set -o` options.
        set: Vec<String>,
        /// `shopt -s` options.
        shopt: Vec<String>,
        /// Keep going when the command fails.
        ignore_error: bool,
        /// Platforms the command is restricted to.
        platforms: Vec<Arc<Platform>>,
    },
    /// `{defer: "text"}`.
    DeferredCommand {
        /// Shell text run after the task's other commands.
        cmd: String,
        /// Suppress echoing.
        silent: bool,
    },
    /// `{defer: {task: ...}}`.
    DeferredCall(Call),
    /// `{task: ..., ...}`.
    Call {
        /// Called task.
        task: String,
        /// Variables passed to the called task.
        vars: Option<Vars>,
        /// Loop descriptor.
        for_loop: Option<For>,
        /// Suppress echoing.
        silent: bool,
    },
}

/// One row of the decision table: a marker probe and the decoder it unlocks.
pub struct Shape {
    /// Short name used in diagnostics.
    pub name: &'static str,
    /// Returns `true` when the node carries this shape's marker.
    pub matches: fn(&Value) -> bool,
    /// Decodes the node into this shape. Only called after `matches`.
    pub build: fn(&Value, &NodePath) -> Result<CmdShape, DecodeError>,
}

/// The decision table, highest priority first.
pub static SHAPES: [Shape; 5] = [
    Shape { name: "literal", matches: is_scalar, build: build_literal },
    Shape { name: "command", matches: has_cmd, build: build_command },
    Shape { name: "deferred command", matches: has_deferred_text, build: build_deferred_command },
    Shape { name: "deferred call", matches: has_deferred_call, build: build_deferred_call },
    Shape { name: "call", matches: has_task, build: build_call },
];

/// Picks the shape of a command node and decodes it.
///
/// # Errors
///
/// Returns `invalid keys in command` for a mapping that matches no shape and
/// a type mismatch for any node that is neither a scalar nor a mapping.
/// Errors from the chosen shape's fields are returned as-is.
pub fn classify(node: &Value, path: &NodePath) -> Result<CmdShape, DecodeError> {
    if let Some(shape) = SHAPES.iter().find(|shape| (shape.matches)(node)) {
        tracing::trace!(path = %path, shape = shape.name, "matched command shape");
        return (shape.build)(node, path);
    }
    if as_mapping(node).is_some() {
        Err(DecodeError::invalid_keys(path, "command"))
    } else {
        Err(DecodeError::new(path).with_type_message("command", node))
    }
}

fn has_cmd(node: &Value) -> bool {
    as_mapping(node).and_then(|map| marker_text(map, "cmd")).is_some()
}

fn has_deferred_text(node: &Value) -> bool {
    as_mapping(node).and_then(|map| marker_text(map, "defer")).is_some()
}

fn has_deferred_call(node: &Value) -> bool {
    as_mapping(node).and_then(|map| field(map, "defer")).is_some_and(Call::is_call)
}

fn has_task(node: &Value) -> bool {
    as_mapping(node).and_then(|map| marker_text(map, "task")).is_some()
}

fn mapping<'a>(node: &'a Value, path: &NodePath) -> Result<&'a serde_yaml::Mapping, DecodeError> {
    as_mapping(node).ok_or_else(|| DecodeError::new(path).with_type_message("command", node))
}

fn marker(map: &serde_yaml::Mapping, key: &str, path: &NodePath) -> Result<String, DecodeError> {
    marker_text(map, key).ok_or_else(|| DecodeError::invalid_keys(path, "command"))
}

fn loop_spec(map: &serde_yaml::Mapping, path: &NodePath) -> Result<Option<For>, DecodeError> {
    field(map, "for").map(|v| For::decode(v, &path.key("for"))).transpose()
}

fn build_literal(node: &Value, path: &NodePath) -> Result<CmdShape, DecodeError> {
    match scalar_text(node) {
        Some(text) if !text.is_empty() => Ok(CmdShape::Literal(text)),
        Some(_) => Err(DecodeError::new(path).with_message("command must not be empty")),
        None => Err(DecodeError::new(path).with_type_message("command", node)),
    }
}

fn build_command(node: &Value, path: &NodePath) -> Result<CmdShape, DecodeError> {
    let map = mapping(node, path)?;
    Ok(CmdShape::Command {
        cmd: marker(map, "cmd", path)?,
        for_loop: loop_spec(map, path)?,
        silent: bool_field(map, "silent", path)?,
        set: string_list_field(map, "set", path)?,
        shopt: string_list_field(map, "shopt", path)?,
        ignore_error: bool_field(map, "ignore_error", path)?,
        platforms: decode_platforms(map, path)?,
    })
}

fn build_deferred_command(node: &Value, path: &NodePath) -> Result<CmdShape, DecodeError> {
    let map = mapping(node, path)?;
    Ok(CmdShape::DeferredCommand {
        cmd: marker(map, "defer", path)?,
        silent: bool_field(map, "silent", path)?,
    })
}

fn build_deferred_call(node: &Value, path: &NodePath) -> Result<CmdShape, DecodeError> {
    let map = mapping(node, path)?;
    let defer_path = path.key("defer");
    let Some(call) = field(map, "defer") else {
        return Err(DecodeError::invalid_keys(path, "command"));
    };
    Call::decode(call, &defer_path).map(CmdShape::DeferredCall)
}

fn build_call(node: &Value, path: &NodePath) -> Result<CmdShape, DecodeError> {
    let map = mapping(node, path)?;
    Ok(CmdShape::Call {
        task: marker(map, "task", path)?,
        vars: field(map, "vars").map(|v| Vars::decode(v, &path.key("vars"))).transpose()?,
        for_loop: loop_spec(map, path)?,
        silent: bool_field(map, "silent", path)?,
    })
}
