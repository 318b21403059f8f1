//! Command-node decoding and environment composition for task runners.
//!
//! [`ast`] turns the polymorphic YAML nodes under a task's `cmds:` into
//! uniform [`ast::Cmd`] records. [`env`] builds the environment a command
//! is spawned with from declared variables and the inherited process
//! environment.

pub mod adapters;
pub mod ast;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod deepcopy;
pub mod env;
pub mod error;
pub mod ports;
pub mod taskfile;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // Help and version output are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_missing_file() {
        let result = run(["taskcmd", "decode", "/nonexistent/taskcmd/Taskfile.yml"]);
        assert!(result.unwrap_err().contains("/nonexistent/taskcmd/Taskfile.yml"));
    }

    #[test]
    fn run_accepts_version_flag() {
        assert!(run(["taskcmd", "--version"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["taskcmd", "unknown"]);
        assert!(result.is_err());
    }
}
