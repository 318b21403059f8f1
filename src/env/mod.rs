//! Environment composition for spawned commands.
//!
//! Declared variables are appended to a snapshot of the ambient process
//! environment. Which side wins when both define a name is decided by an
//! explicit [`EnvPrecedence`], never by global state.

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::adapters::live::LiveEnvironment;
use crate::ast::node::untag;
use crate::ast::Vars;
use crate::ports::environment::Environment;

/// Prefix of variables carrying task-scoped metadata.
pub const TASK_VAR_PREFIX: &str = "TASK_";

/// Which definition wins when a declared name already exists in the
/// ambient environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvPrecedence {
    /// The ambient definition is kept and the declared one dropped.
    #[default]
    Ambient,
    /// The declared definition is appended after the ambient one, so
    /// consumers that take the last matching entry see it.
    Declared,
}

impl EnvPrecedence {
    /// Maps the `declaredWins` toggle onto a precedence.
    #[must_use]
    pub fn from_declared_wins(declared_wins: bool) -> Self {
        if declared_wins {
            Self::Declared
        } else {
            Self::Ambient
        }
    }
}

/// Merges declared variables into an ambient snapshot.
///
/// The result starts as a verbatim copy of `ambient`. Each declared
/// variable, in order, is rendered and appended as `NAME=value`, unless its
/// value is not a string, bool, integer or float (dropped silently) or,
/// under [`EnvPrecedence::Ambient`], `NAME` is already set in `ambient`.
#[must_use]
pub fn compose(
    declared: &IndexMap<String, Value>,
    ambient: &[String],
    precedence: EnvPrecedence,
) -> Vec<String> {
    let mut environ = ambient.to_vec();

    for (name, value) in declared {
        let Some(text) = render(value) else {
            tracing::trace!(name = %name, "dropping declared variable of unsupported type");
            continue;
        };
        if precedence == EnvPrecedence::Ambient && is_set(ambient, name) {
            continue;
        }
        environ.push(format!("{name}={text}"));
    }

    environ
}

/// Composes the environment for a task's declared `env:` variables.
#[must_use]
pub fn compose_vars(declared: &Vars, ambient: &[String], precedence: EnvPrecedence) -> Vec<String> {
    compose(&declared.to_cache_map(), ambient, precedence)
}

/// Composes the exec environment of a task, or `None` when the task
/// declares no environment and the inherited one should be used as-is.
#[must_use]
pub fn task_environ(
    declared: Option<&Vars>,
    ambient: &[String],
    precedence: EnvPrecedence,
) -> Option<Vec<String>> {
    declared.map(|vars| compose_vars(vars, ambient, precedence))
}

/// Reads `TASK_<key>` from the real process environment.
///
/// Unset variables read as the empty string.
#[must_use]
pub fn get_task_env(key: &str) -> String {
    task_env_from(&LiveEnvironment, key)
}

/// Reads `TASK_<key>` from `env`, or the empty string when unset.
#[must_use]
pub fn task_env_from(env: &dyn Environment, key: &str) -> String {
    env.var(&format!("{TASK_VAR_PREFIX}{key}")).unwrap_or_default()
}

/// Canonical text of an environment-compatible value.
///
/// Integers are accepted when they fit an `i64`; larger unsigned values,
/// null, sequences and mappings have no text form.
#[must_use]
pub fn render(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if n.is_f64() {
                n.as_f64().map(render_float)
            } else {
                None
            }
        }
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() && f.is_sign_positive() {
        "+Inf".to_string()
    } else if f.is_infinite() {
        "-Inf".to_string()
    } else {
        f.to_string()
    }
}

fn is_set(ambient: &[String], name: &str) -> bool {
    ambient.iter().any(|entry| entry_name(entry) == name)
}

fn entry_name(entry: &str) -> &str {
    entry.split_once('=').map_or(entry, |(name, _)| name)
}
