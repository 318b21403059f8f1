//! Minimal taskfile walker.
//!
//! Reads just enough of a taskfile to feed the decoder and the composer:
//! the top-level `env:` and, per task, its `cmds:` and `env:`. Everything
//! else in the document is ignored.
//!
//! ```yaml
//! env:
//!   GREETING: hello
//! tasks:
//!   build:
//!     env: { TARGET: release }
//!     cmds:
//!       - cargo build
//!       - task: lint
//!       - defer: echo done
//!   lint: cargo clippy   # a bare string is a single command
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::ast::node::{as_mapping, field, untag};
use crate::ast::{Cmd, DecodeError, NodePath, Vars};
use crate::error::ConfigError;
use crate::ports::filesystem::FileSystem;

/// A task as far as this crate is concerned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDef {
    /// Decoded command records, in order.
    pub cmds: Vec<Cmd>,
    /// Task-level environment variables.
    pub env: Option<Vars>,
}

/// The parts of a taskfile the decoder and composer consume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taskfile {
    /// Document-level environment variables.
    pub env: Option<Vars>,
    /// Tasks by name, in document order.
    pub tasks: IndexMap<String, TaskDef>,
}

impl Taskfile {
    /// Reads and decodes the taskfile at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, is not YAML, or any
    /// command or variable fails to decode.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, ConfigError> {
        let contents = fs
            .read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let node: Value = serde_yaml::from_str(&contents)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })?;
        Ok(Self::decode(&node)?)
    }

    /// Decodes a parsed taskfile document.
    ///
    /// # Errors
    ///
    /// Returns the first decode error met while walking the document.
    pub fn decode(node: &Value) -> Result<Self, DecodeError> {
        let root = NodePath::root();
        let Some(map) = as_mapping(node) else {
            return Err(DecodeError::new(&root).with_type_message("taskfile", node));
        };

        let env = decode_env(map, &root)?;
        let mut tasks = IndexMap::new();
        if let Some(tasks_node) = field(map, "tasks") {
            let tasks_path = root.key("tasks");
            let Some(task_map) = as_mapping(tasks_node) else {
                return Err(DecodeError::new(&tasks_path).with_type_message("tasks", tasks_node));
            };
            for (key, value) in task_map {
                let Some(name) = crate::ast::node::scalar_text(key) else {
                    return Err(DecodeError::new(&tasks_path).with_type_message("task name", key));
                };
                let task = decode_task(value, &tasks_path.key(&name))?;
                tasks.insert(name, task);
            }
        }
        Ok(Self { env, tasks })
    }

    /// Looks up a task by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTask`] when no task has that name.
    pub fn task(&self, name: &str) -> Result<&TaskDef, ConfigError> {
        self.tasks.get(name).ok_or_else(|| ConfigError::MissingTask(name.to_string()))
    }

    /// The environment declared for a task: document-level variables with
    /// the task's own variables set on top. `None` when neither declares any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTask`] when no task has that name.
    pub fn task_env(&self, name: &str) -> Result<Option<Vars>, ConfigError> {
        let task = self.task(name)?;
        Ok(match (&self.env, &task.env) {
            (None, None) => None,
            (Some(global), None) => Some(global.clone()),
            (None, Some(local)) => Some(local.clone()),
            (Some(global), Some(local)) => {
                let mut merged = global.clone();
                merged.merge(local);
                Some(merged)
            }
        })
    }
}

fn decode_env(map: &Mapping, path: &NodePath) -> Result<Option<Vars>, DecodeError> {
    field(map, "env").map(|v| Vars::decode(v, &path.key("env"))).transpose()
}

fn decode_task(node: &Value, path: &NodePath) -> Result<TaskDef, DecodeError> {
    match untag(node) {
        Value::Null => Ok(TaskDef::default()),
        Value::Sequence(_) => Ok(TaskDef { cmds: decode_cmds(node, path)?, env: None }),
        Value::Mapping(map) => {
            let mut cmds = match map.get("cmds") {
                Some(list) => decode_cmds(list, &path.key("cmds"))?,
                None => Vec::new(),
            };
            if let Some(single) = field(map, "cmd") {
                cmds.insert(0, Cmd::decode(single, &path.key("cmd"))?);
            }
            Ok(TaskDef { cmds, env: decode_env(map, path)? })
        }
        _ => Ok(TaskDef { cmds: vec![Cmd::decode(node, path)?], env: None }),
    }
}

fn decode_cmds(node: &Value, path: &NodePath) -> Result<Vec<Cmd>, DecodeError> {
    match untag(node) {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => {
            items.iter().enumerate().map(|(i, item)| Cmd::decode(item, &path.index(i))).collect()
        }
        other => Err(DecodeError::new(path).with_type_message("[]command", other)),
    }
}
