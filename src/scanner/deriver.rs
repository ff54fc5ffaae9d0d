//! Reduce references to the modules they belong to.

use super::{ModuleSet, Reference};

/// Return the distinct module names of a set of references.
///
/// Only the leading segment of each reference is kept, so the result never
/// contains path fragments. Pure and one level deep: no index lookups.
///
/// ```rust
/// use kit_deps::scanner::{derive_modules, text_references};
///
/// # fn main() -> anyhow::Result<()> {
/// let refs = text_references("#include <kit/foo/bar.h>\n#include <kit/foo/baz.h>\n#include <kit/qux/x.h>\n")?;
/// let modules = derive_modules(&refs);
/// assert_eq!(modules.into_iter().collect::<Vec<_>>(), vec!["foo", "qux"]);
/// # Ok(())
/// # }
/// ```
pub fn derive_modules<'a, I>(refs: I) -> ModuleSet
where
    I: IntoIterator<Item = &'a Reference>,
{
    refs.into_iter().map(|r| r.module().to_string()).collect()
}
