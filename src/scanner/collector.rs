//! Reference collection for single files and whole source trees.
//!
//! Every line of every file is tested with [`is_dependency`] and, when it
//! qualifies, normalized with [`extract_reference`]. Results are unioned into
//! a [`ReferenceSet`], so duplicates collapse and file order is irrelevant.
//!
//! Collection is fail-fast: the first unreadable file or malformed include
//! aborts the whole operation and no partial set is returned.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::ReferenceSet;
use super::reference::{extract_reference, is_dependency};
use crate::core::KitError;

/// Collect the references declared in a block of source text.
///
/// # Errors
///
/// Returns [`KitError::MalformedInclude`] for the first dependency line that
/// cannot be delimited.
///
/// ```rust
/// use kit_deps::scanner::text_references;
///
/// # fn main() -> anyhow::Result<()> {
/// let refs = text_references("#include <kit/a/x.h>\n#include <stdio.h>\n#include <kit/a/x.h>\n")?;
/// assert_eq!(refs.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn text_references(text: &str) -> Result<ReferenceSet> {
    let mut refs = ReferenceSet::new();
    for line in text.lines() {
        if is_dependency(line) {
            refs.insert(extract_reference(line)?);
        }
    }
    Ok(refs)
}

/// Read one file and collect its references.
///
/// The file is decoded lossily, so sources in legacy encodings still scan.
pub async fn read_file_references(path: &Path) -> Result<ReferenceSet> {
    trace!("Scanning {}", path.display());

    let bytes = tokio::fs::read(path).await.map_err(|e| KitError::FileReadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8_lossy(&bytes);

    text_references(&text).with_context(|| format!("Invalid kit include in {}", path.display()))
}

/// Read many files concurrently and union their references.
///
/// At most `max_parallel` reads are in flight at once. The first failure
/// stops the fold and is returned.
pub async fn collect_references(paths: Vec<PathBuf>, max_parallel: usize) -> Result<ReferenceSet> {
    let file_count = paths.len();

    let refs = stream::iter(paths)
        .map(|path| async move { read_file_references(&path).await })
        .buffer_unordered(max_parallel.max(1))
        .try_fold(ReferenceSet::new(), |mut acc, file_refs| async move {
            acc.extend(file_refs);
            Ok(acc)
        })
        .await?;

    debug!("Collected {} references from {} files", refs.len(), file_count);
    Ok(refs)
}
