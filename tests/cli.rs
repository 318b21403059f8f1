//! Integration tests for top-level CLI behavior.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const TASKFILE: &str = "\
env:
  FOO: declared
tasks:
  build:
    env: {EXTRA: 1}
    cmds:
      - echo hello
      - task: lint
        vars: {LEVEL: strict}
      - defer: echo cleanup
  lint: cargo clippy
";

fn write_taskfile(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("Taskfile.yml");
    std::fs::write(&path, contents).expect("failed to write taskfile");
    (dir, path)
}

fn run_taskcmd(args: &[&str], file: &Path, env: &[(&str, &str)]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_taskcmd");
    Command::new(bin)
        .args(&args[..1])
        .arg(file)
        .args(&args[1..])
        .env_clear()
        .envs(env.iter().copied())
        .output()
        .expect("failed to run taskcmd binary")
}

#[test]
fn decode_prints_commands_as_json() {
    let (_dir, file) = write_taskfile(TASKFILE);
    let output = run_taskcmd(&["decode"], &file, &[]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["build"][0]["cmd"], "echo hello");
    assert_eq!(json["build"][1]["task"], "lint");
    assert_eq!(json["build"][1]["vars"]["LEVEL"]["value"], "strict");
    assert_eq!(json["build"][2]["cmd"], "echo cleanup");
    assert_eq!(json["build"][2]["defer"], true);
    assert_eq!(json["lint"][0]["cmd"], "cargo clippy");
}

#[test]
fn decode_single_task() {
    let (_dir, file) = write_taskfile(TASKFILE);
    let output = run_taskcmd(&["decode", "--task", "lint"], &file, &[]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json.get("build").is_none());
    assert_eq!(json["lint"][0]["cmd"], "cargo clippy");
}

#[test]
fn invalid_command_fails_with_node_path() {
    let (_dir, file) = write_taskfile("tasks:\n  build:\n    cmds:\n      - {foo: bar}\n");
    let output = run_taskcmd(&["decode"], &file, &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("tasks.build.cmds[0]: invalid keys in command"));
}

#[test]
fn env_keeps_inherited_values_by_default() {
    let (_dir, file) = write_taskfile(TASKFILE);
    let output = run_taskcmd(&["env", "--task", "build"], &file, &[("FOO", "ambient")]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout.lines().collect::<Vec<_>>(), ["FOO=ambient", "EXTRA=1"]);
}

#[test]
fn env_declared_wins_appends_override() {
    let (_dir, file) = write_taskfile(TASKFILE);
    let output =
        run_taskcmd(&["env", "--task", "build", "--declared-wins"], &file, &[("FOO", "ambient")]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout.lines().collect::<Vec<_>>(), ["FOO=ambient", "FOO=declared", "EXTRA=1"]);
}

#[test]
fn env_precedence_experiment_from_process_env() {
    let (_dir, file) = write_taskfile(TASKFILE);
    let output = run_taskcmd(
        &["env", "--task", "build"],
        &file,
        &[("FOO", "ambient"), ("TASK_X_ENV_PRECEDENCE", "1")],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.lines().any(|line| line == "FOO=declared"));
}

#[test]
fn env_unknown_task_fails() {
    let (_dir, file) = write_taskfile(TASKFILE);
    let output = run_taskcmd(&["env", "--task", "deploy"], &file, &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("task not found: deploy"));
}

#[test]
fn unknown_subcommand_fails() {
    let bin = env!("CARGO_BIN_EXE_taskcmd");
    let output = Command::new(bin).arg("unknown").output().expect("failed to run taskcmd binary");
    assert!(!output.status.success());
}

#[test]
fn help_lists_subcommands() {
    let bin = env!("CARGO_BIN_EXE_taskcmd");
    let output = Command::new(bin).arg("--help").output().expect("failed to run taskcmd binary");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("decode"));
    assert!(stdout.contains("env"));
}
