//! End-to-end checks of the `conform` binary: output modes and exit codes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn conform(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_conform"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("run conform")
}

#[test]
fn test_passing_project_exits_zero() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("frontend")).unwrap();
    fs::write(
        root.join("frontend/App.tsx"),
        "/** @jsxImportSource hono/jsx */\nexport default () => <p/>;\n",
    )
    .unwrap();

    let out = conform(&["check", "."], root);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("— Summary — pass"), "{}", stdout);
}

#[test]
fn test_error_finding_exits_one_with_json_report() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("backend")).unwrap();
    fs::write(root.join("backend/server.ts"), "export const app = 1;\n").unwrap();

    let out = conform(&["check", ".", "--output", "json"], root);
    assert_eq!(out.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["passing"], false);
    let failed: Vec<&serde_json::Value> = json["findings"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|f| f["passed"] == false)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["rule"], "backend-default-export");
    assert_eq!(failed[0]["file"], "backend/server.ts");
}

#[test]
fn test_warning_only_exits_zero() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("package.json"), r#"{"name":"web"}"#).unwrap();

    let out = conform(&["check"], root);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("config-package-module-type"), "{}", stdout);
}

#[test]
fn test_fatal_errors_exit_two() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();

    let out = conform(&["check", "missing"], root);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing"));

    let out = conform(&["check", "empty"], root);
    assert_eq!(out.status.code(), Some(2));

    let out = conform(&["check", "empty", "--permissive"], root);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_config_override_relaxes_rule() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("backend")).unwrap();
    fs::write(root.join("backend/index.ts"), "export const app = 1;\n").unwrap();
    fs::write(
        root.join("conform.toml"),
        "[overrides.backend-default-export]\nseverity = \"warning\"\n",
    )
    .unwrap();

    let out = conform(&["check"], root);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_rules_lists_builtins() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    let out = conform(&["rules", "--output", "json"], dir.path());
    assert_eq!(out.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["rules"].as_array().unwrap().len(), 8);
}

#[test]
fn test_config_discovered_from_subdirectory_without_path() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join("conform.toml"), "output = \"json\"\n").unwrap();
    let web = root.join("apps/web");
    fs::create_dir_all(web.join("backend")).unwrap();
    fs::write(web.join("backend/index.ts"), "export default {};\n").unwrap();

    let out = conform(&["check"], &web);
    assert_eq!(out.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["passing"], true);
    assert_eq!(json["findings"][0]["file"], "backend/index.ts");
}

#[test]
fn test_unknown_output_mode_is_usage_error() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    let out = conform(&["check", "--output", "xml"], dir.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}
