//! Module index lookup.
//!
//! The module index maps a kit module name to the directory holding that
//! module's sources. The scanner only ever reads from it, through the
//! [`ModuleIndex`] trait, so callers can inject a filesystem-backed index or
//! an in-memory one.
//!
//! # Implementations
//!
//! - [`DirectoryIndex`] - one sub-directory per module under an index root
//!   (`~/.kit/modules/<name>` by default)
//! - [`InMemoryIndex`] - explicit name to path map
//!
//! Implementations must tolerate concurrent lookups. The scanner assumes the
//! index is a stable snapshot for the duration of one resolution.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

use crate::core::KitError;
use crate::scanner::ModuleSet;

/// Read-only name to directory lookup for kit modules.
pub trait ModuleIndex: Send + Sync {
    /// Resolve a module name to the directory of its sources.
    ///
    /// # Errors
    ///
    /// Returns [`KitError::UnresolvedModule`] when the index has no such module.
    fn resolve(&self, name: &str) -> Result<PathBuf>;

    /// List every module the index knows about.
    fn modules(&self) -> Result<ModuleSet>;
}

/// Filesystem-backed index: each module is a sub-directory of `root`.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    root: PathBuf,
}

impl DirectoryIndex {
    /// Create an index over `root` without checking that it exists.
    ///
    /// Lookups against a missing root fail with
    /// [`KitError::UnresolvedModule`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Create an index over `root`, failing when it is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(KitError::IndexNotFound {
                path: root.display().to_string(),
            }
            .into());
        }
        Ok(Self::new(root))
    }
}

/// A module name must be a single normal path component.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}

impl ModuleIndex for DirectoryIndex {
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let unresolved = || KitError::UnresolvedModule {
            name: name.to_string(),
        };

        if !is_plain_name(name) {
            return Err(unresolved().into());
        }

        let path = self.root.join(name);
        if !path.is_dir() {
            return Err(unresolved().into());
        }

        trace!("Resolved module '{}' to {}", name, path.display());
        Ok(path)
    }

    fn modules(&self) -> Result<ModuleSet> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list module index {}", self.root.display()))?;

        let mut modules = ModuleSet::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                modules.insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(modules)
    }
}

/// Index backed by an explicit map, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    entries: HashMap<String, PathBuf>,
}

impl InMemoryIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a module entry.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(name.into(), path.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with_module(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(name, path);
        self
    }
}

impl ModuleIndex for InMemoryIndex {
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        self.entries.get(name).cloned().ok_or_else(|| {
            KitError::UnresolvedModule {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn modules(&self) -> Result<ModuleSet> {
        Ok(self.entries.keys().cloned().collect())
    }
}
