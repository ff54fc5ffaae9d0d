//! Transitive resolution through a directory index.

use kit_deps::core::KitError;
use kit_deps::graph::{DependencyGraph, DependencyNode};
use kit_deps::index::{InMemoryIndex, ModuleIndex};
use kit_deps::scanner::{ModuleSet, Scanner};
use kit_deps::sources::ExtensionFilter;
use kit_deps::test_utils::ModuleTree;
use std::sync::Arc;

fn modules(names: &[&str]) -> ModuleSet {
    names.iter().map(ToString::to_string).collect()
}

/// app -> {log, net}; net -> {log, str}; log -> {str}; str -> {}
fn layered_tree() -> ModuleTree {
    let tree = ModuleTree::new().unwrap();
    tree.module("app", &["log/log.h", "net/net.h"]).unwrap();
    tree.module("net", &["log/log.h", "str.h"]).unwrap();
    tree.module("log", &["str/str.h"]).unwrap();
    tree.module("str", &[]).unwrap();
    tree
}

#[tokio::test]
async fn test_closure_of_each_layer() {
    let tree = layered_tree();
    let scanner = tree.scanner();

    assert_eq!(scanner.recursive_module_dependencies("app").await.unwrap(), modules(&["log", "net", "str"]));
    assert_eq!(scanner.recursive_module_dependencies("net").await.unwrap(), modules(&["log", "str"]));
    assert_eq!(scanner.recursive_module_dependencies("str").await.unwrap(), modules(&[]));
}

#[tokio::test]
async fn test_closure_independent_of_parallelism() {
    let tree = layered_tree();
    let serial = tree.scanner().with_max_parallel(1);
    let wide = tree.scanner().with_max_parallel(64);

    for name in tree.scanner().index().modules().unwrap() {
        assert_eq!(
            serial.recursive_module_dependencies(&name).await.unwrap(),
            wide.recursive_module_dependencies(&name).await.unwrap(),
            "closure of {name} differs"
        );
    }
}

#[tokio::test]
async fn test_project_closure_through_index() {
    let tree = layered_tree();
    let project = tree.project(&["net/net.h"]).unwrap();

    let deps = tree.scanner().recursive_dependencies(&project).await.unwrap();
    assert_eq!(deps, modules(&["log", "net", "str"]));
}

#[tokio::test]
async fn test_long_cycle_terminates() {
    let tree = ModuleTree::new().unwrap();
    tree.module("a", &["b/b.h"]).unwrap();
    tree.module("b", &["c/c.h"]).unwrap();
    tree.module("c", &["d/d.h"]).unwrap();
    tree.module("d", &["a/a.h"]).unwrap();

    let scanner = tree.scanner();
    assert_eq!(scanner.recursive_module_dependencies("a").await.unwrap(), modules(&["b", "c", "d"]));
    assert_eq!(scanner.recursive_module_dependencies("c").await.unwrap(), modules(&["a", "b", "d"]));

    let graph = DependencyGraph::for_module(&scanner, "a").await.unwrap();
    let cycles = graph.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 4);
}

#[tokio::test]
async fn test_unresolved_module_deep_in_graph() {
    let tree = layered_tree();
    tree.module("str", &["ghost/ghost.h"]).unwrap();

    let err = tree.scanner().recursive_module_dependencies("app").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<KitError>(),
        Some(KitError::UnresolvedModule { name }) if name == "ghost"
    ));
}

#[tokio::test]
async fn test_tree_of_layered_modules() {
    let tree = layered_tree();
    let graph = DependencyGraph::for_module(&tree.scanner(), "app").await.unwrap();

    let expected = "\
app
├── log
│   └── str
└── net
    ├── log (*)
    └── str (*)
";
    assert_eq!(graph.to_tree_string(&DependencyNode::Module("app".to_string())), expected);
}

#[tokio::test]
async fn test_in_memory_index_maps_scattered_modules() {
    let tree = ModuleTree::new().unwrap();
    let log = tree.project_file("vendor/logging/log.c", "#include <kit/str/str.h>\n").unwrap();
    let str_dir = tree.project_root().join("third_party/strings");
    tree.project_file("third_party/strings/str.c", "").unwrap();

    let index = InMemoryIndex::new()
        .with_module("log", log.parent().unwrap())
        .with_module("str", &str_dir);
    let scanner = Scanner::new(Arc::new(index), Arc::new(ExtensionFilter::default()));

    assert_eq!(scanner.recursive_module_dependencies("log").await.unwrap(), modules(&["str"]));
    assert_eq!(scanner.index().modules().unwrap(), modules(&["log", "str"]));
}

#[tokio::test]
async fn test_every_source_of_a_module_counts() {
    let tree = layered_tree();
    tree.index_file("net/include/net/socket.h", "#pragma once\n#include <kit/fs/path.h>\n").unwrap();
    tree.module("fs", &[]).unwrap();

    let scanner = tree.scanner();
    assert_eq!(scanner.module_dependencies("net").await.unwrap(), modules(&["fs", "log", "str"]));
    assert_eq!(
        scanner.recursive_module_dependencies("app").await.unwrap(),
        modules(&["fs", "log", "net", "str"])
    );
}
