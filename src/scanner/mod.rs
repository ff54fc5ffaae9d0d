//! Kit include scanning and dependency discovery.
//!
//! This module turns C/C++ sources into module-level dependency sets without
//! invoking a compiler or preprocessor. Data flows leaves first:
//!
//! 1. [`reference`] - recognize one `#...kit/...>` line and normalize it into
//!    a [`Reference`] (`module/relative/path`)
//! 2. [`collector`] - apply the extractor to every line of a file or of every
//!    file under a directory, unioning the results into a [`ReferenceSet`]
//! 3. [`deriver`] - reduce references to the [`ModuleSet`] of their leading
//!    segments
//! 4. [`closure`] - expand direct dependencies through the module index until
//!    no new module appears
//!
//! [`Scanner`] ties these stages to the two collaborators it needs: a
//! [`ModuleIndex`] to locate modules and a [`SourceTraversal`] to enumerate
//! source files.
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
//!     Arc::new(DirectoryIndex::open("/home/me/.kit/modules")?),
//!     Arc::new(ExtensionFilter::default()),
//! );
//!
//! let direct = scanner.directory_dependencies(Path::new(".")).await?;
//! let all = scanner.recursive_dependencies(Path::new(".")).await?;
//! assert!(direct.is_subset(&all));
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! File reads within one collection and module expansions within one closure
//! round run concurrently, bounded by [`Scanner::max_parallel`]. Both reduce
//! through set union, so the result does not depend on completion order.

pub mod closure;
pub mod collector;
pub mod deriver;
pub mod reference;

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::constants::default_max_parallel;
use crate::index::ModuleIndex;
use crate::sources::SourceTraversal;

pub use collector::text_references;
pub use deriver::derive_modules;
pub use reference::{Reference, extract_reference, is_dependency};

/// Unique, unordered set of references. Sorted iteration keeps output stable.
pub type ReferenceSet = BTreeSet<Reference>;

/// Unique, unordered set of module names.
pub type ModuleSet = BTreeSet<String>;

/// Dependency scanner bound to a module index and a source traversal.
///
/// Holds no state between calls: every operation recomputes its result from
/// the live source trees.
#[derive(Clone)]
pub struct Scanner {
    index: Arc<dyn ModuleIndex>,
    sources: Arc<dyn SourceTraversal>,
    max_parallel: usize,
}

impl Scanner {
    /// Create a scanner with the default parallelism.
    pub fn new(index: Arc<dyn ModuleIndex>, sources: Arc<dyn SourceTraversal>) -> Self {
        Self {
            index,
            sources,
            max_parallel: default_max_parallel(),
        }
    }

    /// Bound the number of concurrent file reads and module expansions.
    #[must_use]
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Upper bound on concurrent work.
    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// The module index this scanner resolves names through.
    pub fn index(&self) -> &dyn ModuleIndex {
        self.index.as_ref()
    }

    /// References declared by a single source file.
    pub async fn file_references(&self, path: &Path) -> Result<ReferenceSet> {
        collector::read_file_references(path).await
    }

    /// References declared by every source file under `root`.
    pub async fn directory_references(&self, root: &Path) -> Result<ReferenceSet> {
        let sources = Arc::clone(&self.sources);
        let walk_root = root.to_path_buf();
        let paths = tokio::task::spawn_blocking(move || sources.list_sources(&walk_root))
            .await
            .context("Source traversal task failed")??;

        collector::collect_references(paths, self.max_parallel).await
    }

    /// References declared by an indexed module.
    pub async fn module_references(&self, name: &str) -> Result<ReferenceSet> {
        let path = self.index.resolve(name)?;
        self.directory_references(&path)
            .await
            .with_context(|| format!("Failed to scan module '{name}'"))
    }

    /// Direct module dependencies of the sources under `root`.
    pub async fn directory_dependencies(&self, root: &Path) -> Result<ModuleSet> {
        let refs = self.directory_references(root).await?;
        Ok(derive_modules(&refs))
    }

    /// Direct module dependencies of an indexed module.
    pub async fn module_dependencies(&self, name: &str) -> Result<ModuleSet> {
        let refs = self.module_references(name).await?;
        let deps = derive_modules(&refs);
        debug!("Module '{}' has {} direct dependencies", name, deps.len());
        Ok(deps)
    }

    /// Every module the sources under `root` require, directly or not.
    pub async fn recursive_dependencies(&self, root: &Path) -> Result<ModuleSet> {
        let seed = self.directory_dependencies(root).await?;
        self.transitive_closure(seed).await
    }

    /// Expand an arbitrary set of modules to everything it requires.
    ///
    /// The seed modules themselves are part of the result.
    pub async fn transitive_closure(&self, seed: ModuleSet) -> Result<ModuleSet> {
        closure::expand(self, seed, None).await
    }

    /// Every module an indexed module requires, directly or not.
    ///
    /// The module itself is never part of the result, even when it sits on a
    /// dependency cycle.
    pub async fn recursive_module_dependencies(&self, name: &str) -> Result<ModuleSet> {
        let seed = self.module_dependencies(name).await?;
        closure::expand(self, seed, Some(name)).await
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner").field("max_parallel", &self.max_parallel).finish_non_exhaustive()
    }
}
