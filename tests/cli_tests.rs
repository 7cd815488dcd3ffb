//! CLI surface smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("vidforge")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run the full seven-stage pipeline"))
        .stdout(predicate::str::contains("Inspect and manage archived runs"));
}

#[test]
fn run_requires_title_and_brief() {
    Command::cargo_bin("vidforge")
        .unwrap()
        .args(["run", "--brief", "a brief"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn history_help_lists_operations() {
    Command::cargo_bin("vidforge")
        .unwrap()
        .args(["history", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List archived runs"))
        .stdout(predicate::str::contains("Delete an archived run"));
}
