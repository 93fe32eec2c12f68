//! Integration tests for packit-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn packit_cmd(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("packit");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// `a.txt` ("hi") and `b/c.txt` ("yo") inside a directory named `proj`.
fn project() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = temp.path().join("proj");
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a.txt"), "hi").unwrap();
    fs::write(root.join("b/c.txt"), "yo").unwrap();
    (temp, root)
}

fn zip_entries(path: &Path) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(String::from).collect()
}

fn zip_content(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("packit"));
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("ignore"));
}

#[test]
fn test_no_subcommand_prints_banner() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Packit an archive creator"))
        .stdout(predicate::str::contains(
            "Usage: packit <command> [flags] [arguments]",
        ))
        .stdout(predicate::str::contains("packit build"))
        .stdout(predicate::str::contains("packit ignore"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .arg("pack")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("pack"));
}

#[test]
fn test_build_without_sidecar() {
    let (_temp, root) = project();

    packit_cmd(&root)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            ".packit file does not exist so no file will be ignored",
        ))
        .stdout(predicate::str::contains("Starting to build the archive"))
        .stdout(predicate::str::contains("proj.zip"));

    let archive = root.join("proj.zip");
    assert_eq!(
        zip_entries(&archive),
        BTreeSet::from(["a.txt".to_string(), "b/c.txt".to_string()])
    );
    assert_eq!(zip_content(&archive, "a.txt"), "hi");
    assert_eq!(zip_content(&archive, "b/c.txt"), "yo");
}

#[test]
fn test_build_honors_sidecar() {
    let (_temp, root) = project();
    fs::write(root.join(".packit"), "b\n").unwrap();

    packit_cmd(&root).arg("build").assert().success();

    assert_eq!(
        zip_entries(&root.join("proj.zip")),
        BTreeSet::from(["a.txt".to_string()])
    );
}

#[test]
fn test_ignore_creates_and_appends_sidecar() {
    let temp = TempDir::new().unwrap();
    let sidecar = temp.path().join(".packit");

    packit_cmd(temp.path())
        .args(["ignore", "x.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to the .packit file"));
    assert_eq!(fs::read_to_string(&sidecar).unwrap(), "x.txt\n");

    packit_cmd(temp.path())
        .args(["ignore", "x.txt", "y.txt"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&sidecar).unwrap(), "x.txt\ny.txt\n");
}

#[test]
fn test_ignore_nothing_new_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".packit"), "x.txt\n").unwrap();

    packit_cmd(temp.path())
        .args(["ignore", "x.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to add to ignore list"));
    assert_eq!(
        fs::read_to_string(temp.path().join(".packit")).unwrap(),
        "x.txt\n"
    );
}

#[test]
fn test_ignore_without_arguments_adds_nothing() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .arg("ignore")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to add to ignore list"));
    assert!(!temp.path().join(".packit").exists());
}

#[test]
fn test_ignore_list() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".packit"), "target\nnotes.txt\n").unwrap();

    packit_cmd(temp.path())
        .args(["ignore", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("List of excludes are:"))
        .stdout(predicate::str::contains("target\nnotes.txt"));
}

#[test]
fn test_ignore_list_without_sidecar() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .args(["ignore", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".packit file does not exist"));
    assert!(!temp.path().join(".packit").exists());
}

#[test]
fn test_ignore_then_build_round_trip() {
    let (_temp, root) = project();

    packit_cmd(&root).args(["ignore", "b"]).assert().success();
    packit_cmd(&root)
        .args(["build", "-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("out.zip"));

    assert_eq!(
        zip_entries(&root.join("out.zip")),
        BTreeSet::from(["a.txt".to_string()])
    );
}

#[test]
fn test_rebuild_never_packs_previous_archive() {
    let (_temp, root) = project();

    packit_cmd(&root).arg("build").assert().success();
    packit_cmd(&root).arg("build").assert().success();

    let entries = zip_entries(&root.join("proj.zip"));
    assert!(!entries.contains("proj.zip"));
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_output_name_dots_replaced() {
    let (_temp, root) = project();

    packit_cmd(&root)
        .args(["build", "-o", "release.v1"])
        .assert()
        .success();

    assert!(root.join("release_v1.zip").exists());
}

#[test]
fn test_build_tar_gz() {
    let (_temp, root) = project();

    packit_cmd(&root)
        .args(["build", "-f", "tar.gz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proj.tar.gz"));

    let decoder = flate2::read::GzDecoder::new(File::open(root.join("proj.tar.gz")).unwrap());
    let mut archive = tar::Archive::new(decoder);
    let names: BTreeSet<String> = archive
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        BTreeSet::from(["a.txt".to_string(), "b/c.txt".to_string()])
    );
}

#[cfg(unix)]
#[test]
fn test_build_no_permissions_stores_default_mode() {
    use std::os::unix::fs::PermissionsExt;

    fn tar_mode(path: &Path, name: &str) -> u32 {
        let mut archive = tar::Archive::new(File::open(path).unwrap());
        let entry = archive
            .entries()
            .unwrap()
            .map(Result::unwrap)
            .find(|entry| entry.path().unwrap().to_string_lossy() == name)
            .unwrap();
        entry.header().mode().unwrap()
    }

    let (_temp, root) = project();
    fs::set_permissions(root.join("a.txt"), fs::Permissions::from_mode(0o600)).unwrap();

    packit_cmd(&root)
        .args(["build", "-f", "tar", "-o", "kept"])
        .assert()
        .success();
    assert_eq!(tar_mode(&root.join("kept.tar"), "a.txt"), 0o600);

    packit_cmd(&root)
        .args(["build", "-f", "tar", "-o", "plain", "--no-permissions"])
        .assert()
        .success();
    assert_eq!(tar_mode(&root.join("plain.tar"), "a.txt"), 0o644);
}

#[test]
fn test_build_unknown_format_creates_nothing() {
    let (_temp, root) = project();

    packit_cmd(&root)
        .args(["build", "-f", "rar"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("rar"));

    let created: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .filter(|name| name.to_string_lossy().starts_with("proj."))
        .collect();
    assert!(created.is_empty());
}

#[test]
fn test_build_invalid_output_name() {
    let (_temp, root) = project();

    packit_cmd(&root)
        .args(["build", "-o", "dist/out"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_build_json_output() {
    let (_temp, root) = project();

    let output = packit_cmd(&root)
        .args(["--json", "build"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "build");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["archive"], "proj.zip");
    assert_eq!(json["data"]["files_added"], 2);
}

#[test]
fn test_ignore_json_output() {
    let temp = TempDir::new().unwrap();

    let output = packit_cmd(temp.path())
        .args(["-j", "ignore", "a", "b", "a"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "ignore");
    assert_eq!(json["data"]["added"], serde_json::json!(["a", "b"]));
    assert_eq!(json["data"]["unchanged"], false);
}

#[test]
fn test_quiet_build_prints_nothing() {
    let (_temp, root) = project();

    packit_cmd(&root)
        .args(["-q", "build"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(root.join("proj.zip").exists());
}

#[test]
fn test_completion_bash() {
    let temp = TempDir::new().unwrap();
    packit_cmd(temp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("packit"));
}
