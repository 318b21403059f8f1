//! Command dispatch and handlers.

pub mod decode;
pub mod env;

use crate::cli::Command;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler using live adapters.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let ctx = ServiceContext::live();
    let mut stdout = std::io::stdout().lock();
    dispatch_with_context(command, &ctx, &mut stdout)
}

/// Dispatch a command with the given service context, writing to `out`.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    out: &mut dyn std::io::Write,
) -> Result<(), String> {
    match command {
        Command::Decode { file, task } => decode::run(ctx, file, task.as_deref(), out),
        Command::Env { file, task, declared_wins } => env::run(ctx, file, task, *declared_wins, out),
    }
}
