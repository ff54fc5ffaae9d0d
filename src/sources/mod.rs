//! Source file discovery.
//!
//! The scanner asks a [`SourceTraversal`] for the files under a root
//! directory. Which files count as sources is the traversal's decision; the
//! default [`ExtensionFilter`] walks the tree recursively and keeps regular
//! files whose extension is in a configured list.
//!
//! Order of the returned paths carries no meaning since the scanner unions
//! their references into a set.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::DEFAULT_SOURCE_EXTENSIONS;
use crate::core::KitError;

/// Enumerates the source files under a directory tree.
pub trait SourceTraversal: Send + Sync {
    /// List every source file under `root`, recursively.
    ///
    /// # Errors
    ///
    /// Returns [`KitError::TraversalError`] when `root` or any directory below
    /// it cannot be read.
    fn list_sources(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Recursive walker keeping files by extension.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Create a filter for the given extensions (without the leading dot).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(Into::into)
                .map(|ext: String| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// The extensions this filter accepts.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns `true` if `path` has an accepted extension.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_EXTENSIONS.iter().copied())
    }
}

impl SourceTraversal for ExtensionFilter {
    fn list_sources(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| KitError::TraversalError {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;

            if entry.file_type().is_file() && self.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} source files under {}", files.len(), root.display());
        Ok(files)
    }
}
