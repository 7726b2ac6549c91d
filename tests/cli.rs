#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn touch(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Write a tooling.toml whose tools are plain shell commands
fn write_config(root: &Path, formatter: &str, build_formatter: &str, analyzer: &str) {
    let config = format!(
        r#"
projects = ["app", "core"]

[formatter]
{formatter}

[build_formatter]
{build_formatter}

[analyzer]
{analyzer}

[ignore.format]
files = ["app/src/example_file.cpp"]

[ignore.analyze]
dirs = ["app/tests"]
"#
    );
    fs::write(root.join("tooling.toml"), config).unwrap();
}

fn setup_test_directory() -> tempfile::TempDir {
    let dir = tempdir().unwrap();

    touch(dir.path(), "app/CMakeLists.txt", "project(app)\n");
    touch(dir.path(), "app/src/main.cpp", "int main() {}\n");
    touch(dir.path(), "app/src/example_file.cpp", "int x;\n");
    touch(dir.path(), "app/tests/hello_test.cpp", "int y;\n");
    touch(dir.path(), "app/docs.md", "# docs\n");
    touch(dir.path(), "core/include/core/version.hpp", "#pragma once\n");

    dir
}

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cxx-tooling").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_format_reports_counts() {
    let dir = setup_test_directory();
    write_config(
        dir.path(),
        r#"name = "true""#,
        r#"name = "true""#,
        r#"name = "true""#,
    );

    cmd(dir.path())
        .arg("format")
        .assert()
        .success()
        .stdout(predicate::str::contains("(format): 3 accepted, 1 ignored"))
        .stdout(predicate::str::contains("(format): 1 accepted, 0 ignored"))
        .stdout(predicate::str::contains("example_file.cpp (listed file)"))
        .stdout(predicate::str::contains("Total: 4 accepted, 1 ignored"));
}

#[test]
fn test_format_runs_formatter_on_each_file() {
    let dir = setup_test_directory();
    // `sh -c script file` binds the file to $0
    write_config(
        dir.path(),
        r#"name = "sh"
flags = '''-c 'echo formatted >> "$0"' '''"#,
        r#"name = "sh"
flags = '''-c 'echo cmake >> "$0"' '''"#,
        r#"name = "false""#,
    );

    cmd(dir.path()).arg("format").assert().success();

    let main = fs::read_to_string(dir.path().join("app/src/main.cpp")).unwrap();
    assert_eq!(main, "int main() {}\nformatted\n");
    let header = fs::read_to_string(dir.path().join("core/include/core/version.hpp")).unwrap();
    assert_eq!(header, "#pragma once\nformatted\n");
    let cmake = fs::read_to_string(dir.path().join("app/CMakeLists.txt")).unwrap();
    assert_eq!(cmake, "project(app)\ncmake\n");

    // Ignored for formatting, left alone
    let ignored = fs::read_to_string(dir.path().join("app/src/example_file.cpp")).unwrap();
    assert_eq!(ignored, "int x;\n");
}

#[test]
fn test_lint_ignores_directory_subtree() {
    let dir = setup_test_directory();
    write_config(
        dir.path(),
        r#"name = "false""#,
        r#"name = "false""#,
        r#"name = "true""#,
    );

    cmd(dir.path())
        .arg("lint")
        .assert()
        .success()
        .stdout(predicate::str::contains("(analyze): 3 accepted, 1 ignored"))
        .stdout(predicate::str::contains("hello_test.cpp (under"));
}

#[test]
fn test_lint_failure_exit_code_is_propagated() {
    let dir = setup_test_directory();
    write_config(
        dir.path(),
        r#"name = "true""#,
        r#"name = "true""#,
        r#"name = "sh"
flags = "-c 'exit 3'""#,
    );

    cmd(dir.path())
        .arg("lint")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("exited with status 3"));
}

#[test]
fn test_format_failure_stops_run() {
    let dir = setup_test_directory();
    write_config(
        dir.path(),
        r#"name = "false""#,
        r#"name = "sh"
flags = '''-c 'echo cmake >> "$0"' '''"#,
        r#"name = "true""#,
    );

    cmd(dir.path()).arg("format").assert().code(1);

    // The build formatter never ran
    let cmake = fs::read_to_string(dir.path().join("app/CMakeLists.txt")).unwrap();
    assert_eq!(cmake, "project(app)\n");
}

#[test]
fn test_empty_project_runs_nothing() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("app")).unwrap();
    fs::create_dir_all(dir.path().join("core")).unwrap();
    // Any invocation would fail the run
    write_config(
        dir.path(),
        r#"name = "false""#,
        r#"name = "false""#,
        r#"name = "false""#,
    );

    cmd(dir.path())
        .arg("format")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 0 accepted, 0 ignored"));
}

#[test]
fn test_dry_run_prints_commands_without_running() {
    let dir = setup_test_directory();
    write_config(
        dir.path(),
        r#"name = "false"
flags = "-i""#,
        r#"name = "false""#,
        r#"name = "false""#,
    );

    cmd(dir.path())
        .args(["--dry-run", "format"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: false -i"))
        .stdout(predicate::str::contains("main.cpp"))
        .stdout(predicate::str::contains("Would run: false -i").count(3));
}

#[test]
fn test_missing_project_root_is_fatal() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("app")).unwrap();
    write_config(
        dir.path(),
        r#"name = "true""#,
        r#"name = "true""#,
        r#"name = "true""#,
    );

    cmd(dir.path())
        .arg("lint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project root does not exist"));
}

#[test]
fn test_explicit_config_path() {
    let dir = setup_test_directory();
    write_config(
        dir.path(),
        r#"name = "true""#,
        r#"name = "true""#,
        r#"name = "true""#,
    );
    let elsewhere = tempdir().unwrap();

    cmd(elsewhere.path())
        .arg("--config")
        .arg(dir.path().join("tooling.toml"))
        .arg("lint")
        .assert()
        .success()
        .stdout(predicate::str::contains("(analyze): 3 accepted, 1 ignored"));
}

#[test]
fn test_requires_subcommand() {
    let dir = tempdir().unwrap();
    cmd(dir.path()).assert().failure();
}
