use std::fs;
use std::path::Path;

use blockyard_ops::{ops_actions, ops_load};
use blockyard_util::errors::BlockyardError;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn load_sample(root: &Path) -> ops_load::Workspace {
    write(root, "workspace.toml", "[workspace]\ncontainer-root = \"/ws\"\n");
    write(
        root,
        "blocks/base/block.poly",
        r#"
name: base
template: true
actions:
  - name: install
    description: Install the chart
    script:
      - helm upgrade --install
  - name: shell
    interactive: true
    script:
      - bash
"#,
    );
    write(
        root,
        "blocks/api/block.poly",
        r#"
name: api
from: base
actions:
  - name: install
    env:
      RELEASE: api
      BLOCKYARD_ACTION: overridden
    mounts:
      - /var/run/docker.sock:/var/run/docker.sock
"#,
    );
    ops_load::load(root).unwrap()
}

#[test]
fn test_list_skips_templates() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = load_sample(tmp.path());

    let all = ops_actions::list(&ws, None).unwrap();
    assert!(all.iter().all(|a| a.block == "api"));
    let names: Vec<&str> = all.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(names, ["install", "shell"]);
    assert_eq!(all[0].description, "Install the chart");

    let base = ops_actions::list(&ws, Some("base")).unwrap();
    assert_eq!(base.len(), 2);
}

#[test]
fn test_plan_carries_env_and_mounts() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = load_sample(tmp.path());

    let plan = ops_actions::plan(&ws, "api", "install").unwrap();
    assert_eq!(plan.block, "api");
    assert_eq!(plan.script, ["helm upgrade --install"]);
    assert!(!plan.interactive);
    assert_eq!(plan.env["BLOCKYARD_WORKSPACE"], "/ws");
    assert_eq!(plan.env["BLOCKYARD_BLOCK"], "api");
    assert_eq!(plan.env["BLOCKYARD_BLOCK_WORKDIR"], "/ws/blocks/base");
    assert_eq!(plan.env["BLOCKYARD_ACTION"], "overridden");
    assert_eq!(plan.env["RELEASE"], "api");
    assert_eq!(plan.mounts.len(), 2);
    assert_eq!(
        plan.mounts[0],
        format!("{}:/ws/blocks/base", tmp.path().join("blocks/base").display())
    );
    assert_eq!(
        plan.workdir.local_path.as_deref(),
        Some(tmp.path().join("blocks/base").as_path())
    );
    assert_eq!(plan.mounts[1], "/var/run/docker.sock:/var/run/docker.sock");

    let shell = ops_actions::plan(&ws, "api", "shell").unwrap();
    assert!(shell.interactive);
}

#[test]
fn test_template_cannot_be_planned() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = load_sample(tmp.path());

    let err = ops_actions::plan(&ws, "base", "install").unwrap_err();
    assert!(err.to_string().contains("is a template"));
}

#[test]
fn test_unknown_block_or_action() {
    let tmp = tempfile::tempdir().unwrap();
    let ws = load_sample(tmp.path());

    let err = ops_actions::plan(&ws, "api", "deploy").unwrap_err();
    assert!(matches!(err, BlockyardError::ActionNotFound { .. }));
    assert_eq!(err.to_string(), "Block 'api' has no action named 'deploy'");

    let err = ops_actions::plan(&ws, "ghost", "install").unwrap_err();
    assert!(matches!(err, BlockyardError::BlockNotFound { .. }));
}
