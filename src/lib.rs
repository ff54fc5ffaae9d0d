//! kit-deps - dependency discovery for kit modules
//!
//! A kit module is a directory of C/C++ sources registered in a module index.
//! Sources name other modules through preprocessor includes such as
//! `#include <kit/net/socket.h>`. kit-deps reads those lines, without running
//! a compiler or preprocessor, and answers two questions:
//!
//! - which modules does this file, directory or module use directly?
//! - which modules does it need in total, following the index transitively?
//!
//! # Core Modules
//!
//! - [`scanner`] - include extraction, reference collection, module
//!   derivation and the recursive closure
//! - [`index`] - module name to source directory lookup
//! - [`sources`] - source file enumeration under a directory
//! - [`graph`] - materialized dependency graph for tree display and cycles
//! - [`config`] - `~/.kit/config.toml` loading
//! - [`cli`] - the `kit-deps` command line
//! - [`core`] - error types and user-facing error formatting
//! - [`constants`] - include syntax and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use kit_deps::index::DirectoryIndex;
//! use kit_deps::scanner::Scanner;
//! use kit_deps::sources::ExtensionFilter;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let scanner = Scanner::new(
//!     Arc::new(DirectoryIndex::open("/opt/kit/modules")?),
//!     Arc::new(ExtensionFilter::default()),
//! );
//!
//! for module in scanner.recursive_dependencies(Path::new("src")).await? {
//!     println!("{module}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod graph;
pub mod index;
pub mod scanner;
pub mod sources;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
