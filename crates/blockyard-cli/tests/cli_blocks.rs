use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn blockyard_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("blockyard").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "workspace.toml", "[workspace]\nname = \"acme\"\n");
    write(
        tmp.path(),
        "blocks/base/block.poly",
        r#"
name: base
template: true
config:
  image: nginx
  replicas: 1
actions:
  - name: install
    description: Install the release
    script:
      - helm install
"#,
    );
    write(
        tmp.path(),
        "blocks/web/block.poly",
        r#"
name: web
from: base
version: 1.2.0
config:
  replicas: 3
"#,
    );
    tmp
}

#[test]
fn test_blocks_list() {
    let tmp = sample_workspace();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["blocks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base [template]: 1 action(s)"))
        .stdout(predicate::str::contains("web v1.2.0 (from base): 1 action(s)"));
}

#[test]
fn test_blocks_inspect_json() {
    let tmp = sample_workspace();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path().join("blocks"))
        .args(["blocks", "inspect", "web", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"image\": \"nginx\""))
        .stdout(predicate::str::contains("\"replicas\": 3"));
}

#[test]
fn test_blocks_inspect_uses_configured_format() {
    let tmp = sample_workspace();
    write(tmp.path(), ".blockyard/config.toml", "[output]\nformat = \"toml\"\n");
    blockyard_cmd(tmp.path())
        .args(["blocks", "inspect", "web", "--workspace"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"web\""));
}

#[test]
fn test_blocks_inspect_unknown_block() {
    let tmp = sample_workspace();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["blocks", "inspect", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Block 'nope' not found"));
}

#[test]
fn test_blocks_chain() {
    let tmp = sample_workspace();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["blocks", "chain", "web"])
        .assert()
        .success()
        .stdout(predicate::str::diff("web v1.2.0\n  base (template)\n"));
}

#[test]
fn test_tree() {
    let tmp = sample_workspace();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::diff("base (template)\n└── web v1.2.0\n"));
}

#[test]
fn test_inspect_workspace_yaml() {
    let tmp = sample_workspace();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["inspect", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: acme"))
        .stdout(predicate::str::contains("image: nginx"));
}

#[test]
fn test_without_workspace_fails() {
    let tmp = TempDir::new().unwrap();
    blockyard_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["blocks", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No workspace.toml found"));
}
