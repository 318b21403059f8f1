//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `taskcmd`.
#[derive(Debug, Parser)]
#[command(name = "taskcmd", version, about = "Inspect task commands and their environments")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode the commands of a taskfile and print them as JSON.
    Decode {
        /// Path to the taskfile.
        file: PathBuf,
        /// Only decode this task.
        #[arg(long)]
        task: Option<String>,
    },
    /// Print the environment a task's commands would run with.
    Env {
        /// Path to the taskfile.
        file: PathBuf,
        /// Task whose environment to compose.
        #[arg(long)]
        task: String,
        /// Let declared variables override inherited ones.
        #[arg(long)]
        declared_wins: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::parse_from(["taskcmd", "decode", "Taskfile.yml", "--task", "build"]);
        assert!(matches!(
            cli.command,
            Command::Decode { ref file, task: Some(ref task) }
                if file.to_str() == Some("Taskfile.yml") && task == "build"
        ));
    }

    #[test]
    fn parses_env_subcommand() {
        let cli = Cli::parse_from(["taskcmd", "env", "Taskfile.yml", "--task", "build", "--declared-wins"]);
        assert!(matches!(cli.command, Command::Env { declared_wins: true, .. }));
    }

    #[test]
    fn env_requires_task() {
        assert!(Cli::try_parse_from(["taskcmd", "env", "Taskfile.yml"]).is_err());
    }
}
