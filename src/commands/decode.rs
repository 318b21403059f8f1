//! `taskcmd decode` command.

use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;

use crate::ast::Cmd;
use crate::context::ServiceContext;
use crate::taskfile::Taskfile;

/// Execute the `decode` command.
///
/// Prints `{task: [command, ...]}` as pretty JSON, for every task or only
/// for `task` when given.
///
/// # Errors
///
/// Returns an error string if the taskfile cannot be loaded, the task does
/// not exist, or output cannot be written.
pub fn run(
    ctx: &ServiceContext,
    file: &Path,
    task: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), String> {
    let taskfile = Taskfile::load(ctx.fs.as_ref(), file).map_err(|e| e.to_string())?;

    let selected: IndexMap<&str, &[Cmd]> = match task {
        Some(name) => {
            let def = taskfile.task(name).map_err(|e| e.to_string())?;
            IndexMap::from([(name, def.cmds.as_slice())])
        }
        None => taskfile.tasks.iter().map(|(name, def)| (name.as_str(), def.cmds.as_slice())).collect(),
    };
    tracing::debug!(file = %file.display(), tasks = selected.len(), "decoded taskfile");

    let json = serde_json::to_string_pretty(&selected)
        .map_err(|e| format!("Failed to serialize commands: {e}"))?;
    writeln!(out, "{json}").map_err(|e| format!("Failed to write output: {e}"))
}
