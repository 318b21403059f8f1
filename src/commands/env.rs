//! `taskcmd env` command.

use std::io::Write;
use std::path::Path;

use crate::config::Experiments;
use crate::context::ServiceContext;
use crate::env::{task_environ, EnvPrecedence};
use crate::taskfile::Taskfile;

/// Execute the `env` command.
///
/// Composes the task's declared environment with the inherited one and
/// prints the result, one `NAME=value` entry per line. Declared variables
/// win when `declared_wins` is set or the `ENV_PRECEDENCE` experiment is
/// enabled.
///
/// # Errors
///
/// Returns an error string if the taskfile or experiments cannot be loaded,
/// the task does not exist, or output cannot be written.
pub fn run(
    ctx: &ServiceContext,
    file: &Path,
    task: &str,
    declared_wins: bool,
    out: &mut dyn Write,
) -> Result<(), String> {
    let taskfile = Taskfile::load(ctx.fs.as_ref(), file).map_err(|e| e.to_string())?;
    let declared = taskfile.task_env(task).map_err(|e| e.to_string())?;

    let dir = file.parent().unwrap_or_else(|| Path::new("."));
    let experiments =
        Experiments::load(ctx.env.as_ref(), ctx.fs.as_ref(), dir).map_err(|e| e.to_string())?;
    let precedence = if declared_wins { EnvPrecedence::Declared } else { experiments.precedence() };

    let ambient = ctx.env.snapshot();
    let environ = task_environ(declared.as_ref(), &ambient, precedence).unwrap_or(ambient);
    for entry in &environ {
        writeln!(out, "{entry}").map_err(|e| format!("Failed to write output: {e}"))?;
    }
    Ok(())
}
