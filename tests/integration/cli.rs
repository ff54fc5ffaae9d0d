//! `kit-deps` binary behavior.

use assert_cmd::Command;
use predicates::prelude::*;

use kit_deps::test_utils::ModuleTree;

/// A command isolated from the caller's home directory and environment.
fn kit_deps(tree: &ModuleTree) -> Command {
    let mut cmd = Command::cargo_bin("kit-deps").unwrap();
    cmd.env("HOME", tree.project_root())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("KIT_CONFIG")
        .env_remove("KIT_INDEX");
    cmd
}

/// app -> {log, net}; net -> {log}; log -> {}
fn small_tree() -> ModuleTree {
    let tree = ModuleTree::new().unwrap();
    tree.module("app", &["log/log.h", "net/net.h"]).unwrap();
    tree.module("net", &["log/log.h"]).unwrap();
    tree.module("log", &[]).unwrap();
    tree
}

#[test]
fn test_deps_direct_and_recursive() {
    let tree = small_tree();
    tree.project(&["net/net.h"]).unwrap();

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .arg("deps")
        .arg(tree.project_root())
        .assert()
        .success()
        .stdout("net\n");

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .args(["deps", "--recursive", "--module", "app"])
        .assert()
        .success()
        .stdout("log\nnet\n");
}

#[test]
fn test_deps_json_output() {
    let tree = small_tree();

    let output = kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .args(["deps", "-r", "--module", "net", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"root": "net", "recursive": true, "dependencies": ["log"]})
    );
}

#[test]
fn test_refs_of_single_file() {
    let tree = small_tree();
    let file = tree
        .project_file("main.c", "#include <kit/net/socket.h>\n#include <kit/log.h>\n")
        .unwrap();

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .arg("refs")
        .arg(&file)
        .assert()
        .success()
        .stdout("log/log.h\nnet/socket.h\n");
}

#[test]
fn test_unresolved_module_exits_with_error() {
    let tree = small_tree();
    tree.module("log", &["ghost/ghost.h"]).unwrap();

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .args(["deps", "--recursive", "--module", "app"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Module 'ghost' not found"));
}

#[test]
fn test_missing_index_reported() {
    let tree = small_tree();

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root().join("missing"))
        .arg("deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module index not found"));
}

#[test]
fn test_index_from_environment() {
    let tree = small_tree();

    kit_deps(&tree)
        .env("KIT_INDEX", tree.index_root())
        .args(["deps", "--module", "app"])
        .assert()
        .success()
        .stdout("log\nnet\n");
}

#[test]
fn test_index_from_config_file() {
    let tree = small_tree();
    let config = tree
        .project_file("kit.toml", &format!("index = {:?}\n", tree.index_root().display().to_string()))
        .unwrap();

    kit_deps(&tree)
        .arg("--config")
        .arg(&config)
        .args(["deps", "--module", "net"])
        .assert()
        .success()
        .stdout("log\n");

    kit_deps(&tree)
        .env("KIT_CONFIG", &config)
        .args(["deps", "--module", "net"])
        .assert()
        .success()
        .stdout("log\n");
}

#[test]
fn test_missing_explicit_config_fails() {
    let tree = small_tree();

    kit_deps(&tree)
        .arg("--config")
        .arg(tree.project_root().join("absent.toml"))
        .arg("--index")
        .arg(tree.index_root())
        .arg("deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_tree_reports_cycles() {
    let tree = small_tree();
    tree.module("log", &["app/app.h"]).unwrap();

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .args(["tree", "--module", "app"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("app\n"))
        .stdout(predicate::str::contains("(circular reference)"))
        .stdout(predicate::str::contains("Dependency cycles:"))
        .stdout(predicate::str::contains("cycle: app, log, net"));
}

#[test]
fn test_tree_of_file_outside_extension_filter() {
    let tree = small_tree();
    let inline = tree.project_file("queue.inl", "#include <kit/net/net.h>\n").unwrap();

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .arg("tree")
        .arg(&inline)
        .assert()
        .success()
        .stdout("queue.inl (file)\n└── net\n    └── log\n");

    kit_deps(&tree)
        .arg("--index")
        .arg(tree.index_root())
        .arg("deps")
        .arg(&inline)
        .assert()
        .success()
        .stdout("net\n");
}
