//! Reference collection over directory trees.

use kit_deps::core::KitError;
use kit_deps::scanner::{ReferenceSet, derive_modules};
use kit_deps::test_utils::{ModuleTree, init_test_logging};

fn names(refs: &ReferenceSet) -> Vec<String> {
    refs.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_directory_scan_is_idempotent() {
    init_test_logging(None);
    let tree = ModuleTree::new().unwrap();
    tree.project_file("a.c", "#include <kit/net/socket.h>\n#include <kit/log.h>\n").unwrap();
    tree.project_file("deep/er/b.hpp", "#  include <kit/str/str.h>\n").unwrap();

    let scanner = tree.scanner();
    let first = scanner.directory_references(tree.project_root()).await.unwrap();
    let second = scanner.directory_references(tree.project_root()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(names(&first), vec!["log/log.h", "net/socket.h", "str/str.h"]);
}

#[tokio::test]
async fn test_union_over_disjoint_directories() {
    let tree = ModuleTree::new().unwrap();
    tree.project_file("left/a.c", "#include <kit/net/socket.h>\n#include <kit/log/log.h>\n").unwrap();
    tree.project_file("left/nested/b.h", "#include <kit/str.h>\n").unwrap();
    tree.project_file("right/c.cpp", "#include <kit/log/log.h>\n#include <kit/fs/path.h>\n").unwrap();

    let scanner = tree.scanner();
    let root = tree.project_root();
    let all = scanner.directory_references(root).await.unwrap();
    let left = scanner.directory_references(&root.join("left")).await.unwrap();
    let right = scanner.directory_references(&root.join("right")).await.unwrap();

    let union: ReferenceSet = left.union(&right).cloned().collect();
    assert_eq!(all, union);
}

#[tokio::test]
async fn test_non_source_files_and_comments_ignored() {
    let tree = ModuleTree::new().unwrap();
    tree.project_file("README.md", "#include <kit/docs/only.h>\n").unwrap();
    tree.project_file(
        "main.c",
        "// #include <kit/commented/out.h>\n#include <stdio.h>\n  #include <kit/indented/x.h>\n",
    )
    .unwrap();

    let refs = tree.scanner().directory_references(tree.project_root()).await.unwrap();
    assert!(refs.is_empty());
}

#[tokio::test]
async fn test_direct_dependencies_from_references() {
    let tree = ModuleTree::new().unwrap();
    tree.project_file(
        "main.c",
        "#include <kit/foo/bar.h>\n#include <kit/foo/baz.h>\n#include <kit/qux/q.h>\n",
    )
    .unwrap();

    let scanner = tree.scanner();
    let refs = scanner.directory_references(tree.project_root()).await.unwrap();
    let deps = scanner.directory_dependencies(tree.project_root()).await.unwrap();

    assert_eq!(deps, derive_modules(&refs));
    assert_eq!(deps.into_iter().collect::<Vec<_>>(), vec!["foo", "qux"]);
}

#[tokio::test]
async fn test_malformed_include_fails_whole_scan() {
    let tree = ModuleTree::new().unwrap();
    tree.project_file("good.c", "#include <kit/log/log.h>\n").unwrap();
    tree.project_file("bad.c", "#include <kit/net/socket.h\n").unwrap();

    let err = tree.scanner().directory_references(tree.project_root()).await.unwrap_err();
    let kit_err = err.chain().find_map(|e| e.downcast_ref::<KitError>());
    assert!(matches!(kit_err, Some(KitError::MalformedInclude { .. })), "{err:?}");
}

#[tokio::test]
async fn test_missing_directory_is_traversal_error() {
    let tree = ModuleTree::new().unwrap();
    let missing = tree.project_root().join("nope");

    let err = tree.scanner().directory_references(&missing).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<KitError>(), Some(KitError::TraversalError { .. })));
}

#[tokio::test]
async fn test_non_utf8_source_still_scanned() {
    let tree = ModuleTree::new().unwrap();
    let path = tree.project_root().join("latin1.c");
    let mut bytes = b"/* caf\xe9 */\n".to_vec();
    bytes.extend_from_slice(b"#include <kit/log/log.h>\n");
    std::fs::write(&path, bytes).unwrap();

    let refs = tree.scanner().file_references(&path).await.unwrap();
    assert_eq!(names(&refs), vec!["log/log.h"]);
}

#[tokio::test]
async fn test_quoted_kit_include_fails_whole_scan() {
    let tree = ModuleTree::new().unwrap();
    tree.project_file("good.c", "#include <kit/log/log.h>\n").unwrap();
    tree.project_file("quoted.c", "#include \"kit/net/socket.h\"\n").unwrap();

    let err = tree.scanner().directory_references(tree.project_root()).await.unwrap_err();
    let kit_err = err.chain().find_map(|e| e.downcast_ref::<KitError>());
    assert!(
        matches!(kit_err, Some(KitError::MalformedInclude { line }) if line.contains("\"kit/net/socket.h\"")),
        "{err:?}"
    );
}
