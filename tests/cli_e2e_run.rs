//! End-to-end tests for the `repo-import run` command.
//!
//! Only the argument-handling paths that fail before any network call are
//! exercised here; the wizard itself is covered by unit tests against a
//! canned lister.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the repo-import binary
fn repo_import_cmd() -> Command {
    Command::cargo_bin("repo-import").unwrap()
}

#[test]
fn test_run_help_documents_flags() {
    repo_import_cmd()
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--organization"))
        .stdout(predicate::str::contains("--pattern"))
        .stdout(predicate::str::contains("--non-interactive"));
}

#[test]
fn test_run_rejects_unknown_provider() {
    repo_import_cmd()
        .arg("run")
        .arg("--provider")
        .arg("bitbucket")
        .arg("--non-interactive")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown provider"))
        .stderr(predicate::str::contains("github, gitea"));
}

#[test]
fn test_run_non_interactive_requires_account() {
    repo_import_cmd()
        .arg("run")
        .arg("--provider")
        .arg("github")
        .arg("--non-interactive")
        .env_remove("REPO_IMPORT_IDENTITY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account is required"));
}

#[test]
fn test_run_gitea_requires_api_url() {
    repo_import_cmd()
        .arg("run")
        .arg("--provider")
        .arg("gitea")
        .arg("--identity")
        .arg("alice")
        .arg("--organization")
        .arg("acme")
        .arg("--pattern")
        .arg(".*")
        .arg("--non-interactive")
        .env_remove("REPO_IMPORT_API_URL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API endpoint is required"));
}
