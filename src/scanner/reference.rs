//! Kit include recognition and reference normalization.
//!
//! A *dependency declaration* is a source line that begins with `#` (no
//! leading whitespace) and contains the marker `kit/`. Its *raw reference* is
//! the text between the first `kit/` and the first `>` of the line:
//!
//! ```text
//! #include <kit/module/file.h>   =>  module/file.h
//! #include <kit/file.h>          =>  file/file.h
//! ```
//!
//! A raw reference without a `/` names a bare file that belongs to the module
//! of the same name, so it is rewritten to `<stem>/<file>`. The stem is the
//! file name up to its first `.`. Downstream module resolution depends on this
//! exact mapping.
//!
//! Lines that carry the marker but cannot be delimited (no `>` after the
//! marker, or an empty reference) are rejected with
//! [`KitError::MalformedInclude`] instead of being guessed at.

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::constants::{DIRECTIVE_PREFIX, INCLUDE_TERMINATOR, KIT_INCLUDE_MARKER, REFERENCE_SEPARATOR};
use crate::core::KitError;

/// A normalized reference to one file of a kit module.
///
/// Always has the form `<module>/<relative path>` with a non-empty module
/// segment. Only produced by [`extract_reference`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    /// The module this reference belongs to (the leading path segment).
    #[must_use]
    pub fn module(&self) -> &str {
        self.0.split_once(REFERENCE_SEPARATOR).map_or(self.0.as_str(), |(module, _)| module)
    }

    /// The path of the referenced file relative to its module.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        self.0.split_once(REFERENCE_SEPARATOR).map_or("", |(_, path)| path)
    }

    /// The full `module/path` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `line` is a kit dependency declaration.
///
/// The line must begin with `#` and contain `kit/` anywhere. Leading
/// whitespace disqualifies the line, as does a commented-out include.
///
/// ```rust
/// use kit_deps::scanner::is_dependency;
///
/// assert!(is_dependency("#include <kit/foo/bar.h>"));
/// assert!(!is_dependency("// #include <kit/foo/bar.h>"));
/// assert!(!is_dependency("#include <stdio.h>"));
/// ```
#[must_use]
pub fn is_dependency(line: &str) -> bool {
    line.starts_with(DIRECTIVE_PREFIX) && line.contains(KIT_INCLUDE_MARKER)
}

/// Extract the normalized [`Reference`] from a dependency declaration.
///
/// # Errors
///
/// Returns [`KitError::MalformedInclude`] when the line has no `kit/` marker,
/// when its first `>` does not come after the marker, or when the resulting
/// reference has an empty module segment.
///
/// ```rust
/// use kit_deps::scanner::extract_reference;
///
/// # fn main() -> anyhow::Result<()> {
/// assert_eq!(extract_reference("#include <kit/foo/bar.h>")?.as_str(), "foo/bar.h");
/// assert_eq!(extract_reference("#include <kit/bar.h>")?.as_str(), "bar/bar.h");
/// # Ok(())
/// # }
/// ```
pub fn extract_reference(line: &str) -> Result<Reference> {
    let malformed = || KitError::MalformedInclude {
        line: line.to_string(),
    };

    let start = line.find(KIT_INCLUDE_MARKER).ok_or_else(malformed)? + KIT_INCLUDE_MARKER.len();
    let end = line.find(INCLUDE_TERMINATOR).ok_or_else(malformed)?;
    if end <= start {
        return Err(malformed().into());
    }

    normalize(&line[start..end]).ok_or_else(|| malformed().into())
}

/// Rewrite a raw reference into `module/path` form.
///
/// Returns `None` when the module segment would be empty.
fn normalize(raw: &str) -> Option<Reference> {
    if raw.contains(REFERENCE_SEPARATOR) {
        return raw.split_once(REFERENCE_SEPARATOR).and_then(|(module, _)| {
            (!module.is_empty()).then(|| Reference(raw.to_string()))
        });
    }

    let stem = raw.split_once('.').map_or(raw, |(stem, _)| stem);
    if stem.is_empty() {
        return None;
    }
    Some(Reference(format!("{stem}{REFERENCE_SEPARATOR}{raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_malformed(result: Result<Reference>) -> bool {
        matches!(
            result.unwrap_err().downcast_ref::<KitError>(),
            Some(KitError::MalformedInclude { .. })
        )
    }

    #[test]
    fn test_is_dependency() {
        assert!(is_dependency("#include <kit/foo/bar.h>"));
        assert!(is_dependency("#import <kit/foo.h>"));
        assert!(is_dependency("#  include <kit/foo.h>"));

        assert!(!is_dependency(" #include <kit/foo/bar.h>"));
        assert!(!is_dependency("// #include <kit/x.h>"));
        assert!(!is_dependency("#include <stdio.h>"));
        assert!(!is_dependency("#include \"local.h\""));
        assert!(!is_dependency(""));
    }

    #[test]
    fn test_marker_matches_anywhere_in_line() {
        // Any "kit/" substring qualifies, including inside a longer path
        assert!(is_dependency("#include <toolkit/x.h>"));
        assert_eq!(extract_reference("#include <toolkit/x.h>").unwrap().as_str(), "x/x.h");
    }

    #[test]
    fn test_extract_module_path() {
        let r = extract_reference("#include <kit/foo/bar.h>").unwrap();
        assert_eq!(r.as_str(), "foo/bar.h");
        assert_eq!(r.module(), "foo");
        assert_eq!(r.relative_path(), "bar.h");

        let r = extract_reference("#include <kit/net/http/client.hpp>").unwrap();
        assert_eq!(r.as_str(), "net/http/client.hpp");
        assert_eq!(r.module(), "net");
        assert_eq!(r.relative_path(), "http/client.hpp");
    }

    #[test]
    fn test_extract_bare_file() {
        assert_eq!(extract_reference("#include <kit/bar.h>").unwrap().as_str(), "bar/bar.h");
        // Stem ends at the first dot
        assert_eq!(
            extract_reference("#include <kit/vec.impl.h>").unwrap().as_str(),
            "vec/vec.impl.h"
        );
        // No extension at all keeps the whole name
        assert_eq!(extract_reference("#include <kit/list>").unwrap().as_str(), "list/list");
    }

    #[test]
    fn test_extract_ignores_trailing_text() {
        let r = extract_reference("#include <kit/foo/bar.h> // needed for bar()").unwrap();
        assert_eq!(r.as_str(), "foo/bar.h");
    }

    #[test]
    fn test_missing_terminator_is_malformed() {
        assert!(is_malformed(extract_reference("#include <kit/foo/bar.h")));
        assert!(is_malformed(extract_reference("#include \"kit/foo/bar.h\"")));
    }

    #[test]
    fn test_terminator_before_marker_is_malformed() {
        assert!(is_malformed(extract_reference("#if A > B // kit/foo.h")));
    }

    #[test]
    fn test_empty_reference_is_malformed() {
        assert!(is_malformed(extract_reference("#include <kit/>")));
        assert!(is_malformed(extract_reference("#include <kit//bar.h>")));
        assert!(is_malformed(extract_reference("#include <kit/.h>")));
    }

    #[test]
    fn test_no_marker_is_malformed() {
        assert!(is_malformed(extract_reference("#include <stdio.h>")));
    }
}
