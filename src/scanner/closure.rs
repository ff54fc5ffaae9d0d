//! Transitive closure of module dependencies.
//!
//! Starting from a seed of direct dependencies, each round scans the modules
//! added by the previous round and folds their direct dependencies into the
//! closure. The loop stops when a round adds no module that is not already a
//! member. Termination is by membership, never by comparing set sizes.
//!
//! Every member of the closure is resolved through the module index exactly
//! once, so an unknown module anywhere in the graph fails the whole call with
//! [`KitError::UnresolvedModule`](crate::core::KitError::UnresolvedModule).
//! Cycles need no special handling: a module that is already a member is
//! never scanned again.

use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::{ModuleSet, Scanner};

/// Expand `seed` to its transitive closure.
///
/// When `start` is given it is treated as already visited (it is not scanned
/// again if the graph cycles back to it) and it is removed from the result.
pub(super) async fn expand(scanner: &Scanner, seed: ModuleSet, start: Option<&str>) -> Result<ModuleSet> {
    let mut closure = seed.clone();
    let mut pending = seed;
    if let Some(start) = start {
        pending.remove(start);
        closure.insert(start.to_string());
    }

    let mut round = 0usize;
    while !pending.is_empty() {
        round += 1;
        debug!("Closure round {}: expanding {} module(s)", round, pending.len());

        let expansions: Vec<ModuleSet> = stream::iter(pending.iter().cloned())
            .map(|module| async move { scanner.module_dependencies(&module).await })
            .buffer_unordered(scanner.max_parallel())
            .try_collect()
            .await?;

        let mut added = ModuleSet::new();
        for dep in expansions.into_iter().flatten() {
            if !closure.contains(&dep) {
                added.insert(dep);
            }
        }

        closure.extend(added.iter().cloned());
        pending = added;
    }

    if let Some(start) = start {
        closure.remove(start);
    }

    debug!("Closure reached fixed point after {} round(s) with {} module(s)", round, closure.len());
    Ok(closure)
}
