//! Test utilities for kit-deps
//!
//! Shared by unit tests and, through the `test-utils` feature, by the
//! integration test suite.
//!
//! - [`init_test_logging`] - once-guarded tracing setup writing to the test harness
//! - [`ModuleTree`] - a temporary module index plus a project directory,
//!   populated with kit includes
//!
//! # Example
//!
//! ```rust,no_run
//! use kit_deps::test_utils::ModuleTree;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let tree = ModuleTree::new()?;
//! tree.module("log", &["str/str.h"])?;
//! tree.module("str", &[])?;
//!
//! let deps = tree.scanner().recursive_module_dependencies("log").await?;
//! assert!(deps.contains("str"));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::index::DirectoryIndex;
use crate::scanner::Scanner;
use crate::sources::ExtensionFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses the given level, or `RUST_LOG` when `None`. Does nothing when neither
/// is set. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=kit_deps=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Temporary module index and project directory.
///
/// Layout:
///
/// ```text
/// <temp>/index/<module>/src/<module>.c
/// <temp>/project/sources/main.c
/// ```
///
/// Everything is removed when the value is dropped.
pub struct ModuleTree {
    _temp: TempDir,
    index_root: PathBuf,
    project_root: PathBuf,
}

impl ModuleTree {
    /// Create an empty index and an empty project directory.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("Failed to create temp directory")?;
        let index_root = temp.path().join("index");
        let project_root = temp.path().join("project");
        std::fs::create_dir_all(&index_root)?;
        std::fs::create_dir_all(&project_root)?;

        Ok(Self {
            _temp: temp,
            index_root,
            project_root,
        })
    }

    /// Root of the module index.
    pub fn index_root(&self) -> &Path {
        &self.index_root
    }

    /// Root of the project directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Add a module whose single source file includes each of `includes`.
    ///
    /// Each entry is written as `#include <kit/{entry}>`. Returns the module
    /// directory.
    pub fn module(&self, name: &str, includes: &[&str]) -> Result<PathBuf> {
        let dir = self.index_root.join(name);
        self.write(&dir.join("src").join(format!("{name}.c")), &include_block(includes))?;
        Ok(dir)
    }

    /// Write `sources/main.c` in the project, including each of `includes`.
    ///
    /// Returns the project root.
    pub fn project(&self, includes: &[&str]) -> Result<PathBuf> {
        self.write(&self.project_root.join("sources").join("main.c"), &include_block(includes))?;
        Ok(self.project_root.clone())
    }

    /// Write an arbitrary file relative to the temp tree's index root.
    pub fn index_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.index_root.join(relative);
        self.write(&path, content)?;
        Ok(path)
    }

    /// Write an arbitrary file relative to the project root.
    pub fn project_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_root.join(relative);
        self.write(&path, content)?;
        Ok(path)
    }

    /// A scanner over this tree's index with the default source filter.
    pub fn scanner(&self) -> Scanner {
        Scanner::new(
            Arc::new(DirectoryIndex::new(&self.index_root)),
            Arc::new(ExtensionFilter::default()),
        )
        .with_max_parallel(4)
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn include_block(includes: &[&str]) -> String {
    let mut text = String::from("#include <stdio.h>\n");
    for include in includes {
        text.push_str(&format!("#include <kit/{include}>\n"));
    }
    text.push_str("\nint unused(void) { return 0; }\n");
    text
}
