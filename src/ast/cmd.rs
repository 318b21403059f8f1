//! The unified command record.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use super::error::DecodeError;
use super::for_loop::For;
use super::path::NodePath;
use super::platform::Platform;
use super::shape::{classify, CmdShape};
use super::vars::Vars;
use crate::deepcopy::{self, DeepCopy};

/// One step of a task's command sequence.
///
/// A decoded record runs either shell text (`cmd`) or another task
/// (`task`), never both and never neither.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Cmd {
    /// Shell text to run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    /// Name of a task to call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Loop descriptor.
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_loop: Option<For>,
    /// Variables overlaid for a task call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vars: Option<Vars>,
    /// Suppress echoing of the command.
    pub silent: bool,
    /// Keep going when the command fails.
    pub ignore_error: bool,
    /// Run after the task's other commands, even when they fail.
    pub defer: bool,
    /// Options passed to `set -o`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub set: Vec<String>,
    /// Options passed to `shopt -s`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shopt: Vec<String>,
    /// Platforms the command is restricted to. Entities are shared.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<Arc<Platform>>,
}

impl Cmd {
    /// A record running `text` with no options.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self { cmd: Some(text.into()), ..Self::default() }
    }

    /// A record calling `task` with no options.
    #[must_use]
    pub fn call(task: impl Into<String>) -> Self {
        Self { task: Some(task.into()), ..Self::default() }
    }

    /// Decodes one entry of a task's `cmds:` list.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the node matches no command shape, or
    /// when a field of the matched shape is malformed.
    pub fn decode(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        classify(node, path).map(Self::from)
    }

    /// Returns `true` when the record calls another task.
    #[must_use]
    pub fn is_task_call(&self) -> bool {
        self.task.is_some()
    }

    /// Shell text, for records that run a command.
    #[must_use]
    pub fn command_text(&self) -> Option<&str> {
        self.cmd.as_deref()
    }
}

impl From<CmdShape> for Cmd {
    fn from(shape: CmdShape) -> Self {
        match shape {
            CmdShape::Literal(text) => Self::literal(text),
            CmdShape::Command { cmd, for_loop, silent, set, shopt, ignore_error, platforms } => {
                Self {
                    cmd: Some(cmd),
                    for_loop,
                    silent,
                    set,
                    shopt,
                    ignore_error,
                    platforms,
                    ..Self::default()
                }
            }
            CmdShape::DeferredCommand { cmd, silent } => {
                Self { cmd: Some(cmd), silent, defer: true, ..Self::default() }
            }
            CmdShape::DeferredCall(call) => Self {
                task: Some(call.task),
                vars: call.vars,
                silent: call.silent,
                defer: true,
                ..Self::default()
            },
            CmdShape::Call { task, vars, for_loop, silent } => {
                Self { task: Some(task), vars, for_loop, silent, ..Self::default() }
            }
        }
    }
}

impl DeepCopy for Cmd {
    fn deep_copy(&self) -> Self {
        Self {
            cmd: self.cmd.clone(),
            task: self.task.clone(),
            for_loop: self.for_loop.deep_copy(),
            vars: self.vars.deep_copy(),
            silent: self.silent,
            ignore_error: self.ignore_error,
            defer: self.defer,
            set: deepcopy::slice(&self.set),
            shopt: deepcopy::slice(&self.shopt),
            platforms: deepcopy::slice(&self.platforms),
        }
    }
}

impl Clone for Cmd {
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}

impl<'de> Deserialize<'de> for Cmd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Self::decode(&node, &NodePath::root()).map_err(serde::de::Error::custom)
    }
}
